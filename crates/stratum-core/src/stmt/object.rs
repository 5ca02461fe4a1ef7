use super::Value;
use by_address::ByAddress;
use indexmap::IndexMap;
use std::{
    cell::{Ref, RefCell, RefMut},
    fmt,
    rc::Rc,
};

/// The state of a single domain object.
///
/// Besides its declared properties a domain object carries the persistence
/// bookkeeping fields (`uid`, `pid`, language) and, once it has been
/// reconstituted from storage, a snapshot of its clean state used for dirty
/// tracking.
#[derive(Debug, Clone)]
pub struct DomainObject {
    class_name: String,
    uid: Option<i64>,
    pid: Option<i64>,
    language_uid: Option<i64>,
    localized_uid: Option<i64>,
    properties: IndexMap<String, Value>,
    clean_properties: Option<IndexMap<String, Value>>,
}

impl DomainObject {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            uid: None,
            pid: None,
            language_uid: None,
            localized_uid: None,
            properties: IndexMap::new(),
            clean_properties: None,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn uid(&self) -> Option<i64> {
        self.uid
    }

    pub fn set_uid(&mut self, uid: i64) {
        self.uid = Some(uid);
    }

    pub fn pid(&self) -> Option<i64> {
        self.pid
    }

    pub fn set_pid(&mut self, pid: i64) {
        self.pid = Some(pid);
    }

    pub fn language_uid(&self) -> Option<i64> {
        self.language_uid
    }

    pub fn set_language_uid(&mut self, language_uid: i64) {
        self.language_uid = Some(language_uid);
    }

    /// The uid of the translated record this object was overlaid with, or
    /// the object's own uid.
    pub fn localized_uid(&self) -> Option<i64> {
        self.localized_uid.or(self.uid)
    }

    pub fn set_localized_uid(&mut self, localized_uid: i64) {
        self.localized_uid = Some(localized_uid);
    }

    /// An object is new until storage assigned it a uid.
    pub fn is_new(&self) -> bool {
        self.uid.is_none()
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(name.into(), value.into());
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Records the current property values as the clean state.
    pub fn memorize_clean_state(&mut self) {
        self.clean_properties = Some(self.properties.clone());
    }

    pub fn has_clean_state(&self) -> bool {
        self.clean_properties.is_some()
    }

    /// Returns `true` if the property changed since the clean state was
    /// memorized. Without a clean state every property is dirty.
    pub fn is_dirty(&self, name: &str) -> bool {
        match &self.clean_properties {
            Some(clean) => clean.get(name) != self.properties.get(name),
            None => true,
        }
    }

    pub fn is_any_dirty(&self) -> bool {
        match &self.clean_properties {
            Some(clean) => {
                clean.len() != self.properties.len()
                    || self.properties.keys().any(|name| self.is_dirty(name))
            }
            None => true,
        }
    }
}

/// Shared handle to a [`DomainObject`].
///
/// Handles compare and hash by address: two handles are equal only when
/// they point at the same object, which is what the identity map relies on.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef(ByAddress<Rc<RefCell<DomainObject>>>);

impl ObjectRef {
    pub fn new(object: DomainObject) -> Self {
        Self(ByAddress(Rc::new(RefCell::new(object))))
    }

    /// Creates a new, empty object of the given class.
    pub fn empty(class_name: impl Into<String>) -> Self {
        Self::new(DomainObject::new(class_name))
    }

    #[track_caller]
    pub fn borrow(&self) -> Ref<'_, DomainObject> {
        self.0.borrow()
    }

    #[track_caller]
    pub fn borrow_mut(&self) -> RefMut<'_, DomainObject> {
        self.0.borrow_mut()
    }

    pub fn class_name(&self) -> String {
        self.borrow().class_name().to_string()
    }

    pub fn uid(&self) -> Option<i64> {
        self.borrow().uid()
    }

    pub fn is_new(&self) -> bool {
        self.borrow().is_new()
    }

    /// Returns a copy of the named property's raw value.
    pub fn property(&self, name: &str) -> Option<Value> {
        self.borrow().property(name).cloned()
    }

    pub fn set_property(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.borrow_mut().set_property(name, value);
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Object graphs may be cyclic; only print the identity.
        match self.0.try_borrow() {
            Ok(object) => f
                .debug_struct("ObjectRef")
                .field("class", &object.class_name())
                .field("uid", &object.uid())
                .finish(),
            Err(_) => f.write_str("ObjectRef(<borrowed>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_compare_by_address() {
        let a = ObjectRef::empty("Acme\\Post");
        let b = ObjectRef::empty("Acme\\Post");

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn dirty_tracking() {
        let mut object = DomainObject::new("Acme\\Post");
        object.set_property("title", "first");
        assert!(object.is_dirty("title"));

        object.memorize_clean_state();
        assert!(!object.is_any_dirty());

        object.set_property("title", "second");
        assert!(object.is_dirty("title"));
        assert!(object.is_any_dirty());
    }
}
