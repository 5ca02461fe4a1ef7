//! Events dispatched by the persistence layer.

use stratum_core::stmt::{ObjectRef, Row};

#[derive(Debug, Clone)]
pub enum Event {
    /// A query was created; the cache should record these tags for the
    /// current page
    AddCacheTags { tags: Vec<String> },

    /// An object was reconstituted from `record`
    AfterObjectThawed { object: ObjectRef, record: Row },

    EntityAddedToPersistence { object: ObjectRef },

    EntityRemovedFromPersistence { object: ObjectRef },

    EntityUpdatedInPersistence { object: ObjectRef },
}

/// Receives persistence events.
///
/// Failures are logged by the caller and never abort the operation that
/// dispatched the event.
pub trait EventDispatcher {
    fn dispatch(&self, event: &Event) -> anyhow::Result<()>;
}

impl<F> EventDispatcher for F
where
    F: Fn(&Event) -> anyhow::Result<()>,
{
    fn dispatch(&self, event: &Event) -> anyhow::Result<()> {
        self(event)
    }
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddCacheTags { .. } => "AddCacheTags",
            Self::AfterObjectThawed { .. } => "AfterObjectThawed",
            Self::EntityAddedToPersistence { .. } => "EntityAddedToPersistence",
            Self::EntityRemovedFromPersistence { .. } => "EntityRemovedFromPersistence",
            Self::EntityUpdatedInPersistence { .. } => "EntityUpdatedInPersistence",
        }
    }
}
