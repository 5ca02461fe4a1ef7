//! Type converters used by the [`PropertyMapper`](super::PropertyMapper).

mod collection;
pub use collection::{ArrayConverter, ObjectStorageConverter};

mod date_time;
pub use date_time::DateTimeConverter;

mod object;
pub use object::ObjectConverter;

mod persistent_object;
pub use persistent_object::PersistentObjectConverter;

mod scalar;
pub use scalar::{BooleanConverter, FloatConverter, IntegerConverter, StringConverter};

use super::{PropertyMapper, PropertyMappingConfiguration};

use indexmap::IndexMap;
use stratum_core::{schema::Type, stmt::Value, Result};

use std::fmt;

/// Converts one kind of source value into one family of target types.
///
/// Converting is a two-step process: the mapper first asks the converter
/// for the source's child properties and their target types, converts those
/// recursively, and then hands the converted children to
/// [`convert_from`](TypeConverter::convert_from).
pub trait TypeConverter: fmt::Debug {
    /// Kinds of source values accepted, as named by [`Value::kind_name`].
    fn supported_source_types(&self) -> &'static [&'static str];

    /// Whether the converter produces values of `target`.
    fn supports_target(&self, target: &Type, mapper: &PropertyMapper) -> bool;

    /// Converters with a higher priority are preferred.
    fn priority(&self) -> i32;

    /// Final check after source kind and target type matched.
    fn can_convert_from(&self, _source: &Value, _target: &Type, _mapper: &PropertyMapper) -> bool {
        true
    }

    fn source_child_properties(&self, _source: &Value) -> IndexMap<String, Value> {
        IndexMap::new()
    }

    fn type_of_child_property(
        &self,
        _target: &Type,
        property: &str,
        config: &PropertyMappingConfiguration,
        _mapper: &PropertyMapper,
    ) -> Result<Type> {
        Ok(config
            .configuration_for(property)
            .target_type()
            .cloned()
            .unwrap_or(Type::Mixed))
    }

    /// The type actually produced for `source`, which may refine `target`.
    fn target_type_for_source(
        &self,
        _source: &Value,
        target: &Type,
        _config: &PropertyMappingConfiguration,
        _mapper: &PropertyMapper,
    ) -> Result<Type> {
        Ok(target.clone())
    }

    fn convert_from(
        &self,
        source: &Value,
        target: &Type,
        children: IndexMap<String, Value>,
        config: &PropertyMappingConfiguration,
        mapper: &PropertyMapper,
    ) -> Result<Value>;
}

/// The converters every mapper starts with.
pub(crate) fn defaults() -> Vec<Box<dyn TypeConverter>> {
    vec![
        Box::new(StringConverter),
        Box::new(IntegerConverter),
        Box::new(FloatConverter),
        Box::new(BooleanConverter),
        Box::new(DateTimeConverter),
        Box::new(ArrayConverter),
        Box::new(ObjectStorageConverter),
        Box::new(ObjectConverter),
        Box::new(PersistentObjectConverter),
    ]
}
