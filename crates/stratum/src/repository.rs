use crate::{PersistenceManager, Query, QueryResult};

use stratum_core::{
    bail,
    stmt::{Constraint, ObjectRef, Orderings, QuerySettings, Value},
    Error, Result,
};

/// Collection-like access to the persisted objects of one class.
#[derive(Debug, Clone)]
pub struct Repository {
    pm: PersistenceManager,

    /// Class of the objects this repository manages
    object_type: String,

    default_orderings: Orderings,

    default_query_settings: Option<QuerySettings>,
}

impl Repository {
    pub fn new(pm: &PersistenceManager, object_type: impl Into<String>) -> Self {
        Self {
            pm: pm.clone(),
            object_type: object_type.into().trim_start_matches('\\').to_string(),
            default_orderings: Orderings::new(),
            default_query_settings: None,
        }
    }

    /// Creates the repository of the model a repository class is named
    /// after: `Vendor\Ext\Domain\Repository\PostRepository` manages
    /// `Vendor\Ext\Domain\Model\Post`.
    pub fn for_repository_class(pm: &PersistenceManager, repository_class: &str) -> Self {
        let model = repository_class.replacen("\\Repository\\", "\\Model\\", 1);
        let object_type = model.strip_suffix("Repository").unwrap_or(&model).to_string();

        Self::new(pm, object_type)
    }

    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    pub fn set_default_orderings(&mut self, orderings: Orderings) -> &mut Self {
        self.default_orderings = orderings;
        self
    }

    pub fn set_default_query_settings(&mut self, settings: QuerySettings) -> &mut Self {
        self.default_query_settings = Some(settings);
        self
    }

    fn check_type(&self, object: &ObjectRef, code: u32) -> Result<()> {
        let class_name = object.class_name();

        if self.pm.reflection().is_a(&class_name, &self.object_type) {
            Ok(())
        } else {
            Err(Error::illegal_object_type(class_name, &self.object_type, code))
        }
    }

    pub fn add(&self, object: &ObjectRef) -> Result<()> {
        self.check_type(object, 1248363335)?;
        self.pm.add(object);
        Ok(())
    }

    pub fn remove(&self, object: &ObjectRef) -> Result<()> {
        self.check_type(object, 1248363336)?;
        self.pm.remove(object);
        Ok(())
    }

    pub fn update(&self, object: &ObjectRef) -> Result<()> {
        self.check_type(object, 1249479625)?;
        self.pm.update(object)
    }

    pub fn find_all(&self) -> Result<QueryResult> {
        Ok(self.create_query()?.execute())
    }

    pub fn count_all(&self) -> Result<usize> {
        self.create_query()?.count()
    }

    pub fn remove_all(&self) -> Result<()> {
        for object in self.find_all()?.to_vec()? {
            self.remove(&object)?;
        }

        Ok(())
    }

    pub fn find_by_uid(&self, uid: i64) -> Result<Option<ObjectRef>> {
        self.find_by_identifier(&uid.to_string())
    }

    pub fn find_by_identifier(&self, identifier: &str) -> Result<Option<ObjectRef>> {
        self.pm.get_object_by_identifier(identifier, &self.object_type)
    }

    /// Finds the objects whose properties equal the given criteria.
    ///
    /// `criteria` maps property names to values; several criteria are
    /// combined with a logical and, no criteria select everything.
    pub fn find_by(
        &self,
        criteria: impl Into<Value>,
        order_by: Option<Orderings>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<QueryResult> {
        let mut query = self.create_query()?;

        if let Some(constraint) = criteria_constraint(&query, criteria.into())? {
            query.matching(constraint);
        }

        if let Some(order_by) = order_by {
            query.set_orderings(order_by);
        }

        if let Some(limit) = limit {
            query.set_limit(limit)?;
        }

        if let Some(offset) = offset {
            query.set_offset(offset)?;
        }

        Ok(query.execute())
    }

    /// First object matching the criteria, if any.
    pub fn find_one_by(
        &self,
        criteria: impl Into<Value>,
        order_by: Option<Orderings>,
    ) -> Result<Option<ObjectRef>> {
        self.find_by(criteria, order_by, Some(1), None)?.first()
    }

    /// Number of objects matching the criteria.
    pub fn count(&self, criteria: impl Into<Value>) -> Result<usize> {
        let mut query = self.create_query()?;

        if let Some(constraint) = criteria_constraint(&query, criteria.into())? {
            query.matching(constraint);
        }

        query.count()
    }

    /// Creates a query for the managed class with the repository's default
    /// orderings and query settings applied.
    pub fn create_query(&self) -> Result<Query> {
        let mut query = self.pm.create_query_for_type_with(&self.object_type, |settings| {
            if let Some(defaults) = &self.default_query_settings {
                *settings = defaults.clone();
            }
        })?;

        if !self.default_orderings.is_empty() {
            query.set_orderings(self.default_orderings.clone());
        }

        Ok(query)
    }
}

fn criteria_constraint(query: &Query, criteria: Value) -> Result<Option<Constraint>> {
    let constraints = match criteria {
        Value::Map(criteria) => criteria
            .into_iter()
            .map(|(property, value)| query.equals(&property, value, true))
            .collect(),
        Value::List(items) if items.is_empty() => vec![],
        Value::List(_) => bail!("criteria must be keyed by property name"),
        other => bail!("criteria must be a map, got {}", other.kind_name()),
    };

    Ok(Constraint::and_from_vec(constraints))
}
