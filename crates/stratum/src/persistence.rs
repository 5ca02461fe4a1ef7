mod builder;
pub use builder::Builder;

mod settings;
pub use settings::{Features, Settings};

use crate::{
    events::{Event, EventDispatcher},
    query::{Query, QueryFactory},
    Session,
};

use indexmap::IndexSet;
use stratum_core::{
    stmt::{ObjectRef, QuerySettings, Row, Select, Value},
    Backend, ChangeSet, DataMap, DataMapFactory, Error, Reflection, Result,
};

use std::{
    cell::{Ref, RefCell, RefMut},
    fmt,
    rc::{Rc, Weak},
    sync::Arc,
};

/// Entry point of the persistence layer for one unit of work.
///
/// Cloning produces another handle to the same unit of work.
#[derive(Clone)]
pub struct PersistenceManager {
    inner: Rc<Inner>,
}

/// A handle that does not keep the unit of work alive.
#[derive(Clone)]
pub(crate) struct WeakPersistenceManager {
    inner: Weak<Inner>,
}

struct Inner {
    backend: Box<dyn Backend>,
    data_map_factory: DataMapFactory,
    settings: Settings,
    session: RefCell<Session>,
    added: RefCell<IndexSet<ObjectRef>>,
    removed: RefCell<IndexSet<ObjectRef>>,
    changed: RefCell<IndexSet<ObjectRef>>,
    dispatcher: Option<Rc<dyn EventDispatcher>>,
}

impl PersistenceManager {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn session(&self) -> Ref<'_, Session> {
        self.inner.session.borrow()
    }

    pub fn session_mut(&self) -> RefMut<'_, Session> {
        self.inner.session.borrow_mut()
    }

    pub fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub fn data_map_factory(&self) -> &DataMapFactory {
        &self.inner.data_map_factory
    }

    pub fn reflection(&self) -> &Arc<Reflection> {
        self.inner.data_map_factory.reflection()
    }

    pub fn data_map(&self, class_name: &str) -> Result<Arc<DataMap>> {
        self.inner.data_map_factory.build_data_map(class_name)
    }

    /// Schedules a new object for insertion.
    pub fn add(&self, object: &ObjectRef) {
        self.inner.removed.borrow_mut().shift_remove(object);
        self.inner.added.borrow_mut().insert(object.clone());
    }

    /// Schedules an object for removal. Objects added in this unit of work
    /// are simply forgotten.
    pub fn remove(&self, object: &ObjectRef) {
        if self.inner.added.borrow_mut().shift_remove(object) {
            return;
        }

        self.inner.changed.borrow_mut().shift_remove(object);
        self.inner.removed.borrow_mut().insert(object.clone());
    }

    /// Schedules an already persisted object for update.
    pub fn update(&self, object: &ObjectRef) -> Result<()> {
        if self.is_new_object(object) {
            return Err(Error::unknown_object(object.class_name()));
        }

        self.inner.changed.borrow_mut().insert(object.clone());
        Ok(())
    }

    /// Commits all scheduled changes through the backend.
    ///
    /// Reconstituted objects that changed since they were loaded are
    /// committed as well.
    pub fn persist_all(&self) -> Result<()> {
        let removed = self.inner.removed.borrow().clone();
        let added = self.inner.added.borrow().iter().cloned().collect::<Vec<_>>();

        let mut changed = self.inner.changed.borrow().clone();
        changed.extend(self.session().dirty_entities());
        changed.retain(|object| !removed.contains(object));

        let changes = ChangeSet {
            added,
            changed: changed.into_iter().collect(),
            removed: removed.into_iter().collect(),
        };

        if changes.is_empty() {
            return Ok(());
        }

        log::debug!(
            "persist all; added={}; changed={}; removed={}",
            changes.added.len(),
            changes.changed.len(),
            changes.removed.len()
        );

        self.inner.backend.commit(&changes)?;

        self.inner.added.borrow_mut().clear();
        self.inner.changed.borrow_mut().clear();
        self.inner.removed.borrow_mut().clear();

        for object in &changes.added {
            if let Some(uid) = object.uid() {
                let mut session = self.session_mut();
                session.register_object(object, uid.to_string());
                session.register_reconstituted_entity(object);
            }

            object.borrow_mut().memorize_clean_state();
            self.dispatch(Event::EntityAddedToPersistence {
                object: object.clone(),
            });
        }

        for object in &changes.changed {
            object.borrow_mut().memorize_clean_state();
            self.dispatch(Event::EntityUpdatedInPersistence {
                object: object.clone(),
            });
        }

        for object in &changes.removed {
            {
                let mut session = self.session_mut();
                session.unregister_reconstituted_entity(object);
                session.unregister_object(object);
            }

            self.dispatch(Event::EntityRemovedFromPersistence {
                object: object.clone(),
            });
        }

        Ok(())
    }

    pub fn get_object_data_by_query(&self, query: &Select) -> Result<Vec<Row>> {
        log::debug!(
            "execute query; class={}; source={}",
            query.class_name,
            query.selector_name()
        );

        self.inner.backend.get_object_data_by_query(query)
    }

    pub fn get_object_count_by_query(&self, query: &Select) -> Result<usize> {
        log::debug!(
            "count query; class={}; source={}",
            query.class_name,
            query.selector_name()
        );

        self.inner.backend.get_object_count_by_query(query)
    }

    /// Identifier of an object: the one it is registered under, else its uid.
    pub fn get_identifier_by_object(&self, object: &ObjectRef) -> Option<String> {
        if let Some(identifier) = self.session().get_identifier_by_object(object) {
            return Some(identifier.to_string());
        }

        object.uid().map(|uid| uid.to_string())
    }

    /// Looks up an object by identifier, consulting the session before
    /// querying storage. Storage page and language restrictions are not
    /// applied.
    pub fn get_object_by_identifier(
        &self,
        identifier: &str,
        class_name: &str,
    ) -> Result<Option<ObjectRef>> {
        if let Some(object) = self.session().get_object_by_identifier(identifier, class_name) {
            return Ok(Some(object));
        }

        let mut query = self.create_query_for_type_with(class_name, |settings| {
            settings
                .set_respect_storage_page(false)
                .set_respect_sys_language(false);
        })?;

        let uid = match identifier.parse::<i64>() {
            Ok(uid) => Value::I64(uid),
            Err(_) => Value::from(identifier),
        };

        let constraint = query.equals("uid", uid, true);
        query.matching(constraint);
        query.execute().first()
    }

    pub fn create_query_for_type(&self, class_name: &str) -> Result<Query> {
        QueryFactory::new(self).create(class_name)
    }

    /// Creates a query whose settings are adjusted by `configure` before
    /// cache tags are dispatched.
    pub fn create_query_for_type_with(
        &self,
        class_name: &str,
        configure: impl FnOnce(&mut QuerySettings),
    ) -> Result<Query> {
        QueryFactory::new(self).create_with(class_name, configure)
    }

    pub fn is_new_object(&self, object: &ObjectRef) -> bool {
        self.get_identifier_by_object(object).is_none()
    }

    /// Forgets the session and all scheduled changes.
    pub fn clear_state(&self) {
        self.inner.added.borrow_mut().clear();
        self.inner.removed.borrow_mut().clear();
        self.inner.changed.borrow_mut().clear();
        self.session_mut().destroy();
    }

    pub fn has_pending_changes(&self) -> bool {
        !(self.inner.added.borrow().is_empty()
            && self.inner.removed.borrow().is_empty()
            && self.inner.changed.borrow().is_empty())
    }

    pub(crate) fn dispatch(&self, event: Event) {
        let Some(dispatcher) = &self.inner.dispatcher else {
            return;
        };

        if let Err(err) = dispatcher.dispatch(&event) {
            log::warn!("event listener failed; event={}; error={err:#}", event.name());
        }
    }

    pub(crate) fn downgrade(&self) -> WeakPersistenceManager {
        WeakPersistenceManager {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl WeakPersistenceManager {
    pub(crate) fn upgrade(&self) -> Result<PersistenceManager> {
        self.inner
            .upgrade()
            .map(|inner| PersistenceManager { inner })
            .ok_or_else(|| stratum_core::err!("persistence manager was dropped before a lazy relation was loaded"))
    }
}

impl fmt::Debug for PersistenceManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistenceManager")
            .field("backend", &self.inner.backend)
            .field("settings", &self.inner.settings)
            .field("session", &self.inner.session)
            .finish()
    }
}
