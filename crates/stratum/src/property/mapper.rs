use super::{converter, PropertyMappingConfiguration, TypeConverter};
use crate::{object_access::ObjectAccess, persistence::PersistenceManager};

use indexmap::IndexMap;
use stratum_core::{schema::Type, stmt::Value, Error, Reflection, Result};

use std::sync::Arc;

/// Maps untyped source values onto typed targets.
///
/// The mapper picks the highest-priority [`TypeConverter`] for the source
/// kind and target type, maps the source's children recursively and hands
/// them to the converter.
#[derive(Debug)]
pub struct PropertyMapper {
    reflection: Arc<Reflection>,

    /// Required for persistable targets
    pm: Option<PersistenceManager>,

    converters: Vec<Box<dyn TypeConverter>>,
}

impl PropertyMapper {
    pub fn new(reflection: impl Into<Arc<Reflection>>) -> Self {
        Self {
            reflection: reflection.into(),
            pm: None,
            converters: converter::defaults(),
        }
    }

    /// A mapper that resolves persistable objects through `pm`.
    pub fn with_persistence_manager(pm: &PersistenceManager) -> Self {
        Self {
            pm: Some(pm.clone()),
            ..Self::new(pm.reflection().clone())
        }
    }

    pub fn register_converter(&mut self, converter: impl TypeConverter + 'static) -> &mut Self {
        self.converters.push(Box::new(converter));
        self
    }

    pub fn reflection(&self) -> &Reflection {
        &self.reflection
    }

    pub fn persistence_manager(&self) -> Option<&PersistenceManager> {
        self.pm.as_ref()
    }

    pub fn object_access(&self) -> ObjectAccess {
        ObjectAccess::new(self.reflection.clone())
    }

    /// Converts `source` to `target`. Without a configuration every
    /// property may be mapped and persistent objects may be created and
    /// modified.
    pub fn convert(
        &self,
        source: impl Into<Value>,
        target: impl Into<Type>,
        config: Option<&PropertyMappingConfiguration>,
    ) -> Result<Value> {
        let permissive;
        let config = match config {
            Some(config) => config,
            None => {
                permissive = PropertyMappingConfiguration::permissive();
                &permissive
            }
        };

        self.do_mapping(&source.into(), &target.into(), config)
    }

    fn do_mapping(
        &self,
        source: &Value,
        target: &Type,
        config: &PropertyMappingConfiguration,
    ) -> Result<Value> {
        if source.is_null() {
            return Ok(Value::Null);
        }

        if *target == Type::Mixed {
            return Ok(source.clone());
        }

        if let (Value::Object(object), Type::Object(class_name)) = (source, target) {
            if self.reflection.is_a(&object.class_name(), class_name) {
                return Ok(source.clone());
            }
        }

        let converter = self.find_type_converter(source, target)?;
        let target = converter.target_type_for_source(source, target, config, self)?;

        let mut children = IndexMap::new();
        for (source_name, value) in converter.source_child_properties(source) {
            let target_name = config.target_property_name(&source_name).to_string();

            if config.should_skip(&target_name) {
                continue;
            }

            if !config.should_map(&target_name) {
                if config.should_skip_unknown_properties() {
                    continue;
                }

                return Err(Error::invalid_property_mapping_configuration(
                    format!(
                        "it is not allowed to map property \"{target_name}\"; allow it on the mapping configuration to enable mapping of this property"
                    ),
                    1355155913,
                ));
            }

            let child_type = converter.type_of_child_property(&target, &target_name, config, self)?;
            let child_config = config.configuration_for(&target_name);
            let converted = self.do_mapping(&value, &child_type, &child_config)?;

            if !converted.is_null() {
                children.insert(target_name, converted);
            }
        }

        log::trace!(
            "converting {} to {target} with {converter:?}",
            source.kind_name()
        );
        converter.convert_from(source, &target, children, config, self)
    }

    fn find_type_converter(&self, source: &Value, target: &Type) -> Result<&dyn TypeConverter> {
        let kind = source.kind_name();

        self.converters
            .iter()
            .map(Box::as_ref)
            .filter(|converter| {
                converter.supported_source_types().contains(&kind)
                    && converter.supports_target(target, self)
                    && converter.can_convert_from(source, target, self)
            })
            .fold(None::<&dyn TypeConverter>, |best, candidate| match best {
                Some(best) if best.priority() >= candidate.priority() => Some(best),
                _ => Some(candidate),
            })
            .ok_or_else(|| Error::no_type_converter(kind, target.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stratum_core::schema::{ClassSchema, Parameter};

    fn mapper() -> PropertyMapper {
        PropertyMapper::new(
            Reflection::new()
                .with(
                    ClassSchema::plain("Acme\\Point")
                        .constructor([Parameter::required("x", "int"), Parameter::optional("y", "int", 0)])
                        .property("label", "string"),
                )
                .with(ClassSchema::plain("Acme\\Point3").extends("Acme\\Point").property("z", "int")),
        )
    }

    #[test]
    fn scalars() {
        let mapper = mapper();

        assert_eq!(mapper.convert("42", "int", None).unwrap(), Value::I64(42));
        assert_eq!(mapper.convert("", "int", None).unwrap(), Value::Null);
        assert_eq!(mapper.convert(7, "string", None).unwrap(), Value::from("7"));
        assert_eq!(mapper.convert("off", "bool", None).unwrap(), Value::Bool(false));
        assert_eq!(mapper.convert("1.5", "float", None).unwrap(), Value::F64(1.5));
        assert!(mapper.convert("abc", "int", None).unwrap_err().is_invalid_source());
    }

    #[test]
    fn object_with_constructor() {
        let mapper = mapper();
        let source = Value::map([("x", Value::from("3")), ("label", Value::from("origin"))]);

        let Value::Object(point) = mapper.convert(source, "Acme\\Point", None).unwrap() else {
            panic!("expected an object");
        };

        assert_eq!(point.property("x"), Some(Value::I64(3)));
        assert_eq!(point.property("y"), Some(Value::I64(0)));
        assert_eq!(point.property("label"), Some(Value::from("origin")));
    }

    #[test]
    fn missing_constructor_argument() {
        let err = mapper()
            .convert(Value::map([("label", "a")]), "Acme\\Point", None)
            .unwrap_err();

        assert_eq!(err.code(), Some(1268734872));
    }

    #[test]
    fn highest_priority_wins() {
        #[derive(Debug)]
        struct Shouting;

        impl TypeConverter for Shouting {
            fn supported_source_types(&self) -> &'static [&'static str] {
                &["string"]
            }

            fn supports_target(&self, target: &Type, _: &PropertyMapper) -> bool {
                *target == Type::String
            }

            fn priority(&self) -> i32 {
                50
            }

            fn convert_from(
                &self,
                source: &Value,
                _: &Type,
                _: IndexMap<String, Value>,
                _: &PropertyMappingConfiguration,
                _: &PropertyMapper,
            ) -> Result<Value> {
                Ok(Value::from(source.as_str().unwrap_or_default().to_uppercase()))
            }
        }

        let mut mapper = mapper();
        mapper.register_converter(Shouting);

        assert_eq!(mapper.convert("hi", "string", None).unwrap(), Value::from("HI"));
        assert_eq!(mapper.convert(5, "string", None).unwrap(), Value::from("5"));
    }

    #[test]
    fn no_converter() {
        let err = mapper().convert(Value::list([1]), "int", None).unwrap_err();
        assert!(err.is_no_type_converter());
    }
}
