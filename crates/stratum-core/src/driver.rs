use crate::{
    stmt::{ObjectRef, Row, Select},
    Result,
};

use std::{fmt::Debug, rc::Rc};

/// Storage backend that executes queries and persists changes.
///
/// Backends receive query object models, never raw SQL, and answer with
/// raw rows keyed by column name.
pub trait Backend: Debug {
    /// Execute a query and return the matching rows.
    fn get_object_data_by_query(&self, query: &Select) -> Result<Vec<Row>>;

    /// Count the rows a query would return, honoring limit and offset.
    fn get_object_count_by_query(&self, query: &Select) -> Result<usize>;

    /// Persist a unit of work.
    fn commit(&self, changes: &ChangeSet) -> Result<()>;
}

/// Objects to insert, update and delete in one commit.
#[derive(Debug, Default, Clone)]
pub struct ChangeSet {
    pub added: Vec<ObjectRef>,
    pub changed: Vec<ObjectRef>,
    pub removed: Vec<ObjectRef>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty() && self.removed.is_empty()
    }
}

impl<T: Backend + ?Sized> Backend for Rc<T> {
    fn get_object_data_by_query(&self, query: &Select) -> Result<Vec<Row>> {
        (**self).get_object_data_by_query(query)
    }

    fn get_object_count_by_query(&self, query: &Select) -> Result<usize> {
        (**self).get_object_count_by_query(query)
    }

    fn commit(&self, changes: &ChangeSet) -> Result<()> {
        (**self).commit(changes)
    }
}
