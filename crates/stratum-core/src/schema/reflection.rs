use super::ClassSchema;
use crate::{Error, Result};
use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;

/// Registry of class schemas, keyed by class name.
#[derive(Debug, Default, Clone)]
pub struct Reflection {
    classes: IndexMap<String, Arc<ClassSchema>>,
}

impl Reflection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, schema: ClassSchema) -> &mut Self {
        self.classes.insert(schema.name.clone(), Arc::new(schema));
        self
    }

    pub fn with(mut self, schema: ClassSchema) -> Self {
        self.register(schema);
        self
    }

    /// Schema of `class_name`, including the properties and methods it
    /// inherits from registered ancestors.
    pub fn class_schema(&self, class_name: &str) -> Result<Arc<ClassSchema>> {
        let schema = self
            .classes
            .get(normalize(class_name))
            .ok_or_else(|| Error::invalid_class(class_name))?;

        if schema.parent.is_none() {
            return Ok(schema.clone());
        }

        let mut merged = ClassSchema::clone(schema);
        let mut visited = IndexSet::from([normalize(&schema.name)]);
        let mut parent = schema.parent.as_deref().map(normalize);

        while let Some(name) = parent {
            let Some(ancestor) = self.classes.get(name) else {
                break;
            };

            if !visited.insert(name) {
                break;
            }

            for (key, property) in &ancestor.properties {
                if !merged.properties.contains_key(key) {
                    merged.properties.insert(key.clone(), property.clone());
                }
            }

            for (key, method) in &ancestor.methods {
                if !merged.methods.contains_key(key) {
                    merged.methods.insert(key.clone(), method.clone());
                }
            }

            parent = ancestor.parent.as_deref().map(normalize);
        }

        Ok(Arc::new(merged))
    }

    pub fn has_class(&self, class_name: &str) -> bool {
        self.classes.contains_key(normalize(class_name))
    }

    pub fn classes(&self) -> impl Iterator<Item = &Arc<ClassSchema>> + '_ {
        self.classes.values()
    }

    /// Whether `class_name` is `ancestor` or inherits from it.
    ///
    /// Unknown classes only match themselves. Cyclic parent chains end the
    /// walk once a class repeats.
    pub fn is_a(&self, class_name: &str, ancestor: &str) -> bool {
        let ancestor = normalize(ancestor);
        let mut visited = IndexSet::new();
        let mut current = Some(normalize(class_name));

        while let Some(name) = current {
            if name == ancestor {
                return true;
            }

            if !visited.insert(name) {
                return false;
            }

            current = self
                .classes
                .get(name)
                .and_then(|schema| schema.parent.as_deref())
                .map(normalize);
        }

        false
    }
}

fn normalize(class_name: &str) -> &str {
    class_name.trim_start_matches('\\')
}
