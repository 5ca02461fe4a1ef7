use super::{PropertyMapper, PropertyMappingConfiguration, TypeConverter};

use indexmap::IndexMap;
use stratum_core::{schema::Type, stmt::Value, Error, Result};

#[derive(Debug, Clone, Copy)]
pub struct StringConverter;

#[derive(Debug, Clone, Copy)]
pub struct IntegerConverter;

#[derive(Debug, Clone, Copy)]
pub struct FloatConverter;

#[derive(Debug, Clone, Copy)]
pub struct BooleanConverter;

impl TypeConverter for StringConverter {
    fn supported_source_types(&self) -> &'static [&'static str] {
        &["string", "integer", "float"]
    }

    fn supports_target(&self, target: &Type, _: &PropertyMapper) -> bool {
        *target == Type::String
    }

    fn priority(&self) -> i32 {
        10
    }

    fn convert_from(
        &self,
        source: &Value,
        _: &Type,
        _: IndexMap<String, Value>,
        _: &PropertyMappingConfiguration,
        _: &PropertyMapper,
    ) -> Result<Value> {
        Ok(source.to_plain_string().map(Value::String).unwrap_or_default())
    }
}

impl TypeConverter for IntegerConverter {
    fn supported_source_types(&self) -> &'static [&'static str] {
        &["integer", "string"]
    }

    fn supports_target(&self, target: &Type, _: &PropertyMapper) -> bool {
        *target == Type::Int
    }

    fn priority(&self) -> i32 {
        10
    }

    fn convert_from(
        &self,
        source: &Value,
        _: &Type,
        _: IndexMap<String, Value>,
        _: &PropertyMappingConfiguration,
        _: &PropertyMapper,
    ) -> Result<Value> {
        if source.as_str() == Some("") {
            return Ok(Value::Null);
        }

        source
            .to_integer()
            .map(Value::I64)
            .ok_or_else(|| Error::invalid_source(format!("{source:?} is no integer")))
    }
}

impl TypeConverter for FloatConverter {
    fn supported_source_types(&self) -> &'static [&'static str] {
        &["float", "integer", "string"]
    }

    fn supports_target(&self, target: &Type, _: &PropertyMapper) -> bool {
        *target == Type::Float
    }

    fn priority(&self) -> i32 {
        10
    }

    fn convert_from(
        &self,
        source: &Value,
        _: &Type,
        _: IndexMap<String, Value>,
        _: &PropertyMappingConfiguration,
        _: &PropertyMapper,
    ) -> Result<Value> {
        if source.as_str() == Some("") {
            return Ok(Value::Null);
        }

        source
            .to_float()
            .map(Value::F64)
            .ok_or_else(|| Error::invalid_source(format!("{source:?} is no float")))
    }
}

impl TypeConverter for BooleanConverter {
    fn supported_source_types(&self) -> &'static [&'static str] {
        &["boolean", "string", "integer"]
    }

    fn supports_target(&self, target: &Type, _: &PropertyMapper) -> bool {
        *target == Type::Bool
    }

    fn priority(&self) -> i32 {
        10
    }

    fn convert_from(
        &self,
        source: &Value,
        _: &Type,
        _: IndexMap<String, Value>,
        _: &PropertyMappingConfiguration,
        _: &PropertyMapper,
    ) -> Result<Value> {
        let falsy = source
            .as_str()
            .is_some_and(|text| ["false", "off", "no"].contains(&text.trim().to_lowercase().as_str()));

        Ok(Value::Bool(!falsy && source.to_bool()))
    }
}
