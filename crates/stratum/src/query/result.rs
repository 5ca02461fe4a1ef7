use crate::{DataMapper, Query};

use indexmap::IndexMap;
use stratum_core::{stmt::ObjectRef, Result};

/// Lazily materialized result of a query.
///
/// Nothing is fetched until the first element is accessed. Counting an
/// unmaterialized result asks the backend for the number of rows instead of
/// loading them; once materialized, the count is the number of objects held.
#[derive(Debug, Clone)]
pub struct QueryResult {
    query: Query,
    state: State,

    /// Cursor position, as an index into the materialized objects
    position: usize,
}

#[derive(Debug, Clone)]
enum State {
    Unmaterialized {
        /// Count reported by the backend, once asked
        count: Option<usize>,
    },
    Materialized(IndexMap<usize, ObjectRef>),
}

impl QueryResult {
    pub(crate) fn new(query: Query) -> Self {
        Self {
            query,
            state: State::Unmaterialized { count: None },
            position: 0,
        }
    }

    /// Returns a copy of the query this result was produced by.
    pub fn get_query(&self) -> Query {
        self.query.clone()
    }

    pub fn is_materialized(&self) -> bool {
        matches!(self.state, State::Materialized(_))
    }

    fn materialize(&mut self) -> Result<&mut IndexMap<usize, ObjectRef>> {
        if let State::Unmaterialized { .. } = self.state {
            let rows = self.query.execute_raw()?;
            let pm = self.query.persistence_manager();
            let objects = DataMapper::new(pm).map(self.query.class_name(), rows)?;

            self.state = State::Materialized(objects.into_iter().enumerate().collect());
        }

        match &mut self.state {
            State::Materialized(objects) => Ok(objects),
            State::Unmaterialized { .. } => unreachable!(),
        }
    }

    pub fn count(&mut self) -> Result<usize> {
        match &mut self.state {
            State::Materialized(objects) => Ok(objects.len()),
            State::Unmaterialized { count: Some(count) } => Ok(*count),
            State::Unmaterialized { count } => {
                let n = self
                    .query
                    .persistence_manager()
                    .get_object_count_by_query(self.query.select())?;
                *count = Some(n);
                Ok(n)
            }
        }
    }

    /// Returns the first object. An unmaterialized result fetches only one
    /// row to answer this.
    pub fn first(&mut self) -> Result<Option<ObjectRef>> {
        if let State::Materialized(objects) = &self.state {
            return Ok(objects.values().next().cloned());
        }

        let mut query = self.query.clone();
        query.set_limit(1)?;

        let rows = query.execute_raw()?;
        let objects = DataMapper::new(query.persistence_manager()).map(query.class_name(), rows)?;
        Ok(objects.into_iter().next())
    }

    pub fn to_vec(&mut self) -> Result<Vec<ObjectRef>> {
        Ok(self.materialize()?.values().cloned().collect())
    }

    pub fn offset_exists(&mut self, offset: usize) -> Result<bool> {
        Ok(self.materialize()?.contains_key(&offset))
    }

    pub fn offset_get(&mut self, offset: usize) -> Result<Option<ObjectRef>> {
        Ok(self.materialize()?.get(&offset).cloned())
    }

    pub fn offset_set(&mut self, offset: usize, object: ObjectRef) -> Result<()> {
        self.materialize()?.insert(offset, object);
        Ok(())
    }

    pub fn offset_unset(&mut self, offset: usize) -> Result<()> {
        self.materialize()?.shift_remove(&offset);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Cursor
    // ---------------------------------------------------------------------

    /// Object at the cursor; `None` past the end.
    pub fn current(&mut self) -> Result<Option<ObjectRef>> {
        let position = self.position;
        Ok(self
            .materialize()?
            .get_index(position)
            .map(|(_, object)| object.clone()))
    }

    /// Offset at the cursor; `None` past the end.
    pub fn key(&mut self) -> Result<Option<usize>> {
        let position = self.position;
        Ok(self
            .materialize()?
            .get_index(position)
            .map(|(offset, _)| *offset))
    }

    pub fn next(&mut self) -> Result<()> {
        self.materialize()?;
        self.position += 1;
        Ok(())
    }

    pub fn valid(&mut self) -> Result<bool> {
        let position = self.position;
        Ok(position < self.materialize()?.len())
    }

    pub fn rewind(&mut self) -> Result<()> {
        self.materialize()?;
        self.position = 0;
        Ok(())
    }
}
