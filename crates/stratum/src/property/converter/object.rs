use super::{PropertyMapper, PropertyMappingConfiguration, TypeConverter};

use indexmap::IndexMap;
use stratum_core::{
    schema::Type,
    stmt::{ObjectRef, Value},
    Error, Result,
};

/// Source key naming a subtype of the requested target type.
pub(crate) const TYPE_KEY: &str = "__type";

/// Builds objects of registered plain classes from arrays.
///
/// Entities and value objects are left to the
/// [`PersistentObjectConverter`](super::PersistentObjectConverter).
/// Constructor parameters are filled from same-named source properties;
/// the remaining properties go through setters or public properties.
#[derive(Debug, Clone, Copy)]
pub struct ObjectConverter;

impl TypeConverter for ObjectConverter {
    fn supported_source_types(&self) -> &'static [&'static str] {
        &["array"]
    }

    fn supports_target(&self, target: &Type, mapper: &PropertyMapper) -> bool {
        let Type::Object(class_name) = target else {
            return false;
        };

        mapper
            .reflection()
            .class_schema(class_name)
            .is_ok_and(|schema| !schema.is_persistable())
    }

    fn priority(&self) -> i32 {
        10
    }

    fn can_convert_from(&self, source: &Value, _: &Type, _: &PropertyMapper) -> bool {
        source.as_map().is_some()
    }

    fn source_child_properties(&self, source: &Value) -> IndexMap<String, Value> {
        source
            .as_map()
            .map(|map| {
                map.iter()
                    .filter(|(key, _)| *key != TYPE_KEY)
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

        if let Some(setter) = schema.setter(property) {
            return setter
                .first_parameter()
                .and_then(|parameter| parameter.ty.clone())
                .ok_or_else(|| {
                    Error::invalid_target(
                        format!(
                            "setter for property \"{property}\" had no type hint or documentation in target object of type \"{class_name}\""
                        ),
                        1303379158,
                    )
                });
        }

        if let Some(declared) = schema.property_schema(property).filter(|declared| declared.public) {
            return Ok(declared.ty.clone());
        }

        let Some(constructor) = schema.constructor_schema() else {
            return Err(Error::invalid_target(
                format!(
                    "type of child property \"{property}\" of class \"{class_name}\" could not be derived from constructor arguments as said class does not have a constructor defined"
                ),
                1582385098,
            ));
        };

        constructor
            .parameter(property)
            .and_then(|parameter| parameter.ty.clone())
            .ok_or_else(|| {
                Error::invalid_target(
                    format!(
                        "property \"{property}\" had no setter or constructor argument in target object of type \"{class_name}\""
                    ),
                    1303379126,
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
        _: &Value,
        target: &Type,
        mut children: IndexMap<String, Value>,
        _: &PropertyMappingConfiguration,
        mapper: &PropertyMapper,
    ) -> Result<Value> {
        let class_name = target_class(target)?;
        let object = build_object(&mut children, class_name, mapper)?;
        set_properties(&object, children, mapper)?;
        Ok(Value::Object(object))
    }
}

pub(crate) fn target_class(target: &Type) -> Result<&str> {
    match target {
        Type::Object(class_name) => Ok(class_name),
        other => Err(Error::invalid_target(
            format!("\"{other}\" is not an object type"),
            1297759968,
        )),
    }
}

/// Resolves a `__type` entry in `source` against the requested target.
pub(crate) fn override_target_type(
    source: &Value,
    target: &Type,
    config: &PropertyMappingConfiguration,
    mapper: &PropertyMapper,
) -> Result<Type> {
    let Some(requested) = source
        .as_map()
        .and_then(|map| map.get(TYPE_KEY))
        .and_then(Value::as_str)
    else {
        return Ok(target.clone());
    };

    if !config.override_target_type_allowed() {
        return Err(Error::invalid_property_mapping_configuration(
            "override of target type not allowed; to enable this, set override_target_type_allowed on the mapping configuration",
            1317050430,
        ));
    }

    let expected = target_class(target)?;
    if !mapper.reflection().is_a(requested, expected) {
        return Err(Error::invalid_data_type(requested, expected));
    }

    Ok(Type::Object(requested.to_string()))
}

/// Instantiates `class_name`, consuming the children that match
/// constructor parameters.
pub(crate) fn build_object(
    children: &mut IndexMap<String, Value>,
    class_name: &str,
    mapper: &PropertyMapper,
) -> Result<ObjectRef> {
    let schema = mapper.reflection().class_schema(class_name)?;
    let object = ObjectRef::empty(class_name);

    let Some(constructor) = schema.constructor_schema() else {
        return Ok(object);
    };

    for parameter in &constructor.parameters {
        let argument = match children.shift_remove(&parameter.name) {
            Some(value) => value,
            None if parameter.optional => parameter.default.clone(),
            None => {
                return Err(Error::invalid_target(
                    format!(
                        "missing constructor argument \"{}\" for object of type \"{class_name}\"",
                        parameter.name
                    ),
                    1268734872,
                ))
            }
        };

        object.set_property(parameter.name.as_str(), argument);
    }

    Ok(object)
}

pub(crate) fn set_properties(
    object: &ObjectRef,
    children: IndexMap<String, Value>,
    mapper: &PropertyMapper,
) -> Result<()> {
    let access = mapper.object_access();

    for (name, value) in children {
        let kind = value.kind_name();
        if !access.set_property(object, &name, value) {
            return Err(Error::invalid_target(
                format!(
                    "property \"{name}\" having a value of type \"{kind}\" could not be set in target object of type \"{}\"",
                    object.class_name()
                ),
                1304538165,
            ));
        }
    }

    Ok(())
}
