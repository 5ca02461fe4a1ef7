use indexmap::{IndexMap, IndexSet};
use stratum_core::stmt::ObjectRef;

/// Identity map of one unit of work.
///
/// Keeps object and identifier in both directions, scoped by class name so
/// that tables sharing numeric identifiers never collide. Objects loaded
/// from storage are additionally tracked as reconstituted.
#[derive(Debug, Default)]
pub struct Session {
    /// Identifier of every registered object
    objects: IndexMap<ObjectRef, String>,

    /// Registered objects keyed by class name, then identifier
    identifiers: IndexMap<String, IndexMap<String, ObjectRef>>,

    reconstituted: IndexSet<ObjectRef>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `object` under `identifier`.
    ///
    /// Registering the same object again moves it to the new identifier, and
    /// an object previously registered under the identifier is replaced.
    pub fn register_object(&mut self, object: &ObjectRef, identifier: impl Into<String>) {
        let identifier = identifier.into();
        let class_name = normalize(&object.class_name()).to_string();

        if self.objects.get(object) == Some(&identifier) {
            return;
        }

        self.unregister_object(object);

        if let Some(previous) = self
            .identifiers
            .get(&class_name)
            .and_then(|objects| objects.get(&identifier))
            .cloned()
        {
            self.unregister_object(&previous);
        }

        log::trace!("register object; class={class_name}; identifier={identifier}");

        self.objects.insert(object.clone(), identifier.clone());
        self.identifiers
            .entry(class_name)
            .or_default()
            .insert(identifier, object.clone());
    }

    /// Removes `object` from both directions of the map.
    pub fn unregister_object(&mut self, object: &ObjectRef) {
        let Some(identifier) = self.objects.shift_remove(object) else {
            return;
        };

        let class_name = normalize(&object.class_name()).to_string();
        log::trace!("unregister object; class={class_name}; identifier={identifier}");

        if let Some(objects) = self.identifiers.get_mut(&class_name) {
            objects.shift_remove(&identifier);
            if objects.is_empty() {
                self.identifiers.shift_remove(&class_name);
            }
        }
    }

    pub fn has_object(&self, object: &ObjectRef) -> bool {
        self.objects.contains_key(object)
    }

    pub fn has_identifier(&self, identifier: &str, class_name: &str) -> bool {
        self.identifiers
            .get(normalize(class_name))
            .is_some_and(|objects| objects.contains_key(identifier))
    }

    pub fn get_identifier_by_object(&self, object: &ObjectRef) -> Option<&str> {
        self.objects.get(object).map(String::as_str)
    }

    pub fn get_object_by_identifier(&self, identifier: &str, class_name: &str) -> Option<ObjectRef> {
        self.identifiers
            .get(normalize(class_name))?
            .get(identifier)
            .cloned()
    }

    pub fn register_reconstituted_entity(&mut self, object: &ObjectRef) {
        self.reconstituted.insert(object.clone());
    }

    pub fn unregister_reconstituted_entity(&mut self, object: &ObjectRef) {
        self.reconstituted.shift_remove(object);
    }

    pub fn is_reconstituted_entity(&self, object: &ObjectRef) -> bool {
        self.reconstituted.contains(object)
    }

    /// Objects loaded from storage, in load order.
    pub fn reconstituted_entities(&self) -> impl Iterator<Item = &ObjectRef> + '_ {
        self.reconstituted.iter()
    }

    /// Reconstituted entities that changed since they were loaded.
    pub fn dirty_entities(&self) -> Vec<ObjectRef> {
        self.reconstituted
            .iter()
            .filter(|object| object.borrow().is_any_dirty())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Forgets every registered object.
    pub fn destroy(&mut self) {
        log::trace!("destroy session; objects={}", self.objects.len());

        self.objects.clear();
        self.identifiers.clear();
        self.reconstituted.clear();
    }
}

fn normalize(class_name: &str) -> &str {
    class_name.trim_start_matches('\\')
}
