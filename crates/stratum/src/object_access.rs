use indexmap::IndexMap;
use stratum_core::{
    stmt::{ObjectRef, Value},
    ClassSchema, Error, Reflection, Result,
};

use std::sync::Arc;

/// Reads and writes object properties the way accessor methods allow.
///
/// `uid` and `pid` are readable on persistable objects. Properties holding
/// a lazy relation are loaded on first read. Objects of classes without a
/// registered schema expose whatever properties they carry.
#[derive(Debug, Clone)]
pub struct ObjectAccess {
    reflection: Arc<Reflection>,
}

impl ObjectAccess {
    pub fn new(reflection: impl Into<Arc<Reflection>>) -> Self {
        Self {
            reflection: reflection.into(),
        }
    }

    fn schema(&self, object: &ObjectRef) -> Option<Arc<ClassSchema>> {
        self.reflection.class_schema(&object.class_name()).ok()
    }

    pub fn get_property(&self, object: &ObjectRef, property_name: &str) -> Result<Value> {
        if !self.is_property_gettable(object, property_name) {
            return Err(Error::property_not_accessible(
                object.class_name(),
                property_name,
            ));
        }

        match property_name {
            "uid" => return Ok(object.uid().map(Value::from).unwrap_or_default()),
            "pid" => return Ok(object.borrow().pid().map(Value::from).unwrap_or_default()),
            _ => {}
        }

        let value = object.property(property_name).unwrap_or_default();

        let Value::Deferred(deferred) = value else {
            return Ok(value);
        };

        let resolved = deferred.resolve()?;
        object.set_property(property_name, resolved.clone());
        Ok(resolved)
    }

    /// Sets a property; returns `false` when the object does not allow it.
    pub fn set_property(
        &self,
        object: &ObjectRef,
        property_name: &str,
        value: impl Into<Value>,
    ) -> bool {
        if !self.is_property_settable(object, property_name) {
            return false;
        }

        object.set_property(property_name, value);
        true
    }

    pub fn is_property_gettable(&self, object: &ObjectRef, property_name: &str) -> bool {
        match self.schema(object) {
            Some(schema) => {
                (matches!(property_name, "uid" | "pid") && schema.is_persistable())
                    || schema.is_gettable(property_name)
            }
            None => {
                matches!(property_name, "uid" | "pid")
                    || object.borrow().has_property(property_name)
            }
        }
    }

    pub fn is_property_settable(&self, object: &ObjectRef, property_name: &str) -> bool {
        match self.schema(object) {
            Some(schema) => schema.is_settable(property_name),
            None => !matches!(property_name, "uid" | "pid"),
        }
    }

    /// Names of all readable properties, sorted.
    pub fn gettable_property_names(&self, object: &ObjectRef) -> Vec<String> {
        let mut names = match self.schema(object) {
            Some(schema) => {
                let mut names = schema
                    .properties
                    .keys()
                    .filter(|name| schema.is_gettable(name))
                    .cloned()
                    .collect::<Vec<_>>();

                if schema.is_persistable() {
                    names.extend(["uid".to_string(), "pid".to_string()]);
                }

                names
            }
            None => object
                .borrow()
                .properties()
                .map(|(name, _)| name.to_string())
                .collect(),
        };

        names.sort();
        names.dedup();
        names
    }

    /// All readable properties, sorted by name.
    pub fn gettable_properties(&self, object: &ObjectRef) -> Result<IndexMap<String, Value>> {
        self.gettable_property_names(object)
            .into_iter()
            .map(|name| {
                let value = self.get_property(object, &name)?;
                Ok((name, value))
            })
            .collect()
    }
}
