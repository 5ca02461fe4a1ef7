use super::{PropertyMapper, PropertyMappingConfiguration, TypeConverter};

use indexmap::IndexMap;
use stratum_core::{schema::Type, stmt::Value, Result};

/// Passes arrays through; an empty string becomes an empty array.
#[derive(Debug, Clone, Copy)]
pub struct ArrayConverter;

/// Converts an array of sources into a collection of objects.
#[derive(Debug, Clone, Copy)]
pub struct ObjectStorageConverter;

impl TypeConverter for ArrayConverter {
    fn supported_source_types(&self) -> &'static [&'static str] {
        &["array", "string"]
    }

    fn supports_target(&self, target: &Type, _: &PropertyMapper) -> bool {
        *target == Type::Array
    }

    fn priority(&self) -> i32 {
        10
    }

    fn can_convert_from(&self, source: &Value, _: &Type, _: &PropertyMapper) -> bool {
        source.is_collection() || source.as_str() == Some("")
    }

    fn convert_from(
        &self,
        source: &Value,
        _: &Type,
        _: IndexMap<String, Value>,
        _: &PropertyMappingConfiguration,
        _: &PropertyMapper,
    ) -> Result<Value> {
        Ok(match source {
            Value::String(_) => Value::List(vec![]),
            other => other.clone(),
        })
    }
}

impl TypeConverter for ObjectStorageConverter {
    fn supported_source_types(&self) -> &'static [&'static str] {
        &["array"]
    }

    fn supports_target(&self, target: &Type, _: &PropertyMapper) -> bool {
        matches!(target, Type::Collection(_))
    }

    fn priority(&self) -> i32 {
        10
    }

    fn source_child_properties(&self, source: &Value) -> IndexMap<String, Value> {
        match source {
            Value::List(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item.clone()))
                .collect(),
            Value::Map(map) => map.clone(),
            _ => IndexMap::new(),
        }
    }

    fn type_of_child_property(
        &self,
        target: &Type,
        property: &str,
        config: &PropertyMappingConfiguration,
        _: &PropertyMapper,
    ) -> Result<Type> {
        Ok(config
            .configuration_for(property)
            .target_type()
            .cloned()
            .or_else(|| target.element_type())
            .unwrap_or(Type::Mixed))
    }

    fn convert_from(
        &self,
        _: &Value,
        _: &Type,
        children: IndexMap<String, Value>,
        _: &PropertyMappingConfiguration,
        _: &PropertyMapper,
    ) -> Result<Value> {
        Ok(Value::List(children.into_values().collect()))
    }
}
