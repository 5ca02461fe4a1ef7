use super::{
    object::{build_object, override_target_type, set_properties, target_class, TYPE_KEY},
    PropertyMapper, PropertyMappingConfiguration, TypeConverter,
};

use indexmap::IndexMap;
use stratum_core::{
    err,
    schema::Type,
    stmt::{ObjectRef, Value},
    Error, Result,
};

/// Source key carrying the identity of an existing object.
const IDENTITY_KEY: &str = "__identity";

/// Loads, modifies or creates persistable objects.
///
/// A scalar source is an identifier. An array source either names an
/// existing object under `__identity`, optionally together with properties
/// to modify, or describes a new object.
#[derive(Debug, Clone, Copy)]
pub struct PersistentObjectConverter;

impl TypeConverter for PersistentObjectConverter {
    fn supported_source_types(&self) -> &'static [&'static str] {
        &["integer", "string", "array"]
    }

    fn supports_target(&self, target: &Type, mapper: &PropertyMapper) -> bool {
        let Type::Object(class_name) = target else {
            return false;
        };

        mapper
            .reflection()
            .class_schema(class_name)
            .is_ok_and(|schema| schema.is_persistable())
    }

    fn priority(&self) -> i32 {
        20
    }

    fn can_convert_from(&self, source: &Value, _: &Type, _: &PropertyMapper) -> bool {
        !matches!(source, Value::List(_))
    }

    fn source_child_properties(&self, source: &Value) -> IndexMap<String, Value> {
        source
            .as_map()
            .map(|map| {
                map.iter()
                    .filter(|(key, _)| *key != IDENTITY_KEY && *key != TYPE_KEY)
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn type_of_child_property(
        &self,
        target: &Type,
        property: &str,
        config: &PropertyMappingConfiguration,
        mapper: &PropertyMapper,
    ) -> Result<Type> {
        if let Some(ty) = config.configuration_for(property).target_type() {
            return Ok(ty.clone());
        }

        let class_name = target_class(target)?;
        let schema = mapper.reflection().class_schema(class_name)?;

        schema
            .property_schema(property)
            .map(|declared| declared.ty.clone())
            .ok_or_else(|| {
                Error::invalid_target(
                    format!("property \"{property}\" was not found in target object of type \"{class_name}\""),
                    1297978366,
                )
            })
    }

    fn target_type_for_source(
        &self,
        source: &Value,
        target: &Type,
        config: &PropertyMappingConfiguration,
        mapper: &PropertyMapper,
    ) -> Result<Type> {
        override_target_type(source, target, config, mapper)
    }

    fn convert_from(
        &self,
        source: &Value,
        target: &Type,
        mut children: IndexMap<String, Value>,
        config: &PropertyMappingConfiguration,
        mapper: &PropertyMapper,
    ) -> Result<Value> {
        let class_name = target_class(target)?;

        let object = match source.as_map() {
            Some(map) => match map.get(IDENTITY_KEY) {
                Some(identity) => {
                    let object = fetch_object(identity, class_name, mapper)?;
                    if !children.is_empty() && !config.modification_allowed() {
                        return Err(Error::invalid_property_mapping_configuration(
                            "modification of persistent objects not allowed; to enable this, set modification_allowed on the mapping configuration",
                            1297932028,
                        ));
                    }
                    object
                }
                None => {
                    if !config.creation_allowed() {
                        return Err(Error::invalid_property_mapping_configuration(
                            "creation of objects not allowed; to enable this, set creation_allowed on the mapping configuration",
                            1476044961,
                        ));
                    }
                    build_object(&mut children, class_name, mapper)?
                }
            },
            None => fetch_object(source, class_name, mapper)?,
        };

        set_properties(&object, children, mapper)?;
        Ok(Value::Object(object))
    }
}

fn fetch_object(identity: &Value, class_name: &str, mapper: &PropertyMapper) -> Result<ObjectRef> {
    let pm = mapper
        .persistence_manager()
        .ok_or_else(|| err!("persistent objects of type `{class_name}` need a persistence manager"))?;

    let found = match identity {
        Value::I64(uid) => pm.get_object_by_identifier(&uid.to_string(), class_name)?,
        Value::String(text) if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) => {
            pm.get_object_by_identifier(text, class_name)?
        }
        Value::Map(properties) => {
            let mut query = pm.create_query_for_type(class_name)?;
            let constraints = properties
                .iter()
                .map(|(name, value)| query.equals(name, value.clone(), true))
                .collect::<Vec<_>>();
            let constraint = query.logical_and(constraints)?;
            query.matching(constraint);

            let mut objects = query.execute().to_vec()?;
            if objects.len() > 1 {
                return Err(Error::duplicate_object(class_name, format!("{properties:?}")));
            }
            objects.pop()
        }
        other => {
            return Err(Error::invalid_source(format!(
                "the identity property \"{other:?}\" is no UID"
            )))
        }
    };

    found.ok_or_else(|| Error::target_not_found(class_name, format!("{identity:?}")))
}
