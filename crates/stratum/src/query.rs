mod factory;
pub use factory::QueryFactory;

mod result;
pub use result::QueryResult;

use crate::PersistenceManager;

use stratum_core::{
    stmt::{
        Comparison, Constraint, Direction, DynamicOperand, Operator, Orderings, QomFactory,
        QuerySettings, Row, Select, Source, Value,
    },
    Error, Result,
};

/// Builds and executes a query for one class of objects.
///
/// Constraints are created through the query (so that they refer to its
/// selector) and attached with [`Query::matching`].
#[derive(Debug, Clone)]
pub struct Query {
    pm: PersistenceManager,
    select: Select,
}

impl Query {
    pub(crate) fn new(pm: PersistenceManager, select: Select) -> Self {
        Self { pm, select }
    }

    pub fn class_name(&self) -> &str {
        &self.select.class_name
    }

    pub fn select(&self) -> &Select {
        &self.select
    }

    pub fn persistence_manager(&self) -> &PersistenceManager {
        &self.pm
    }

    pub fn source(&self) -> &Source {
        &self.select.source
    }

    pub fn set_source(&mut self, source: impl Into<Source>) -> &mut Self {
        self.select.source = source.into();
        self
    }

    pub fn query_settings(&self) -> &QuerySettings {
        &self.select.settings
    }

    pub fn query_settings_mut(&mut self) -> &mut QuerySettings {
        &mut self.select.settings
    }

    pub fn set_query_settings(&mut self, settings: QuerySettings) -> &mut Self {
        self.select.settings = settings;
        self
    }

    pub fn constraint(&self) -> Option<&Constraint> {
        self.select.constraint.as_ref()
    }

    /// Sets the constraint the result has to satisfy, replacing any
    /// previous one.
    pub fn matching(&mut self, constraint: impl Into<Constraint>) -> &mut Self {
        self.select.constraint = Some(constraint.into());
        self
    }

    pub fn orderings(&self) -> &Orderings {
        &self.select.orderings
    }

    pub fn set_orderings(&mut self, orderings: Orderings) -> &mut Self {
        self.select.orderings = orderings;
        self
    }

    pub fn order_by(&mut self, property: impl Into<String>, direction: Direction) -> &mut Self {
        self.select.orderings.insert(property.into(), direction);
        self
    }

    pub fn limit(&self) -> Option<u64> {
        self.select.limit
    }

    /// Limits the number of returned objects. The limit must be an integer
    /// of at least 1.
    pub fn set_limit(&mut self, limit: impl Into<Value>) -> Result<&mut Self> {
        match limit.into() {
            Value::I64(limit) if limit >= 1 => {
                self.select.limit = Some(limit as u64);
                Ok(self)
            }
            _ => Err(Error::invalid_argument(
                "the limit must be an integer >= 1",
                1245071870,
            )),
        }
    }

    pub fn unset_limit(&mut self) -> &mut Self {
        self.select.limit = None;
        self
    }

    pub fn offset(&self) -> Option<u64> {
        self.select.offset
    }

    /// Skips the first `offset` objects. The offset must be a non-negative
    /// integer.
    pub fn set_offset(&mut self, offset: impl Into<Value>) -> Result<&mut Self> {
        match offset.into() {
            Value::I64(offset) if offset >= 0 => {
                self.select.offset = Some(offset as u64);
                Ok(self)
            }
            _ => Err(Error::invalid_argument(
                "the offset must be a positive integer",
                1245071872,
            )),
        }
    }

    /// Executes the query. Objects are only fetched once the result is
    /// accessed.
    pub fn execute(&self) -> QueryResult {
        QueryResult::new(self.clone())
    }

    /// Executes the query and returns the raw rows without mapping them to
    /// objects.
    pub fn execute_raw(&self) -> Result<Vec<Row>> {
        self.pm.get_object_data_by_query(&self.select)
    }

    pub fn count(&self) -> Result<usize> {
        self.execute().count()
    }

    // ---------------------------------------------------------------------
    // Constraints
    // ---------------------------------------------------------------------

    fn property(&self, property_name: &str) -> DynamicOperand {
        QomFactory.property_value(property_name, Some(self.select.selector_name()))
    }

    fn comparison(&self, property_name: &str, operator: Operator, operand: impl Into<Value>) -> Constraint {
        Comparison::new(self.property(property_name), operator, operand).into()
    }

    /// `property = operand`. A null operand compares against null.
    ///
    /// Case-insensitive comparisons lower-case both sides; the operand is
    /// lower-cased with full Unicode case mapping.
    pub fn equals(
        &self,
        property_name: &str,
        operand: impl Into<Value>,
        case_sensitive: bool,
    ) -> Constraint {
        let operand = operand.into();

        if operand.is_null() {
            return self.comparison(property_name, Operator::EqualToNull, Value::Null);
        }

        if case_sensitive {
            return self.comparison(property_name, Operator::EqualTo, operand);
        }

        let operand = match operand {
            Value::String(operand) => Value::String(operand.to_lowercase()),
            operand => operand,
        };

        Comparison::new(
            QomFactory.lower_case(self.property(property_name)),
            Operator::EqualTo,
            operand,
        )
        .into()
    }

    pub fn like(&self, property_name: &str, operand: impl Into<Value>) -> Constraint {
        self.comparison(property_name, Operator::Like, operand)
    }

    /// A multi-valued property contains `operand`.
    pub fn contains(&self, property_name: &str, operand: impl Into<Value>) -> Constraint {
        self.comparison(property_name, Operator::Contains, operand)
    }

    /// The property equals one of the elements of `operand`, which must be a
    /// collection.
    pub fn in_(&self, property_name: &str, operand: impl Into<Value>) -> Result<Constraint> {
        let operand = operand.into();

        if !operand.is_collection() {
            return Err(Error::unexpected_type(format!(
                "the value given to `in` must be a collection, got {}",
                operand.kind_name()
            )));
        }

        Ok(self.comparison(property_name, Operator::In, operand))
    }

    pub fn less_than(&self, property_name: &str, operand: impl Into<Value>) -> Constraint {
        self.comparison(property_name, Operator::LessThan, operand)
    }

    pub fn less_than_or_equal(&self, property_name: &str, operand: impl Into<Value>) -> Constraint {
        self.comparison(property_name, Operator::LessThanOrEqualTo, operand)
    }

    pub fn greater_than(&self, property_name: &str, operand: impl Into<Value>) -> Constraint {
        self.comparison(property_name, Operator::GreaterThan, operand)
    }

    pub fn greater_than_or_equal(
        &self,
        property_name: &str,
        operand: impl Into<Value>,
    ) -> Constraint {
        self.comparison(property_name, Operator::GreaterThanOrEqualTo, operand)
    }

    /// `lower <= property <= upper`
    pub fn between(
        &self,
        property_name: &str,
        lower: impl Into<Value>,
        upper: impl Into<Value>,
    ) -> Constraint {
        Constraint::and(
            self.greater_than_or_equal(property_name, lower),
            self.less_than_or_equal(property_name, upper),
        )
    }

    /// A multi-valued property has no elements.
    pub fn is_empty(&self, property_name: &str) -> Constraint {
        self.comparison(property_name, Operator::IsEmpty, Value::Null)
    }

    /// Conjunction of the given constraints. A single constraint is
    /// returned as is.
    pub fn logical_and(&self, constraints: impl IntoIterator<Item = Constraint>) -> Result<Constraint> {
        Constraint::and_from_vec(constraints.into_iter().collect())
            .ok_or_else(|| Error::invalid_number_of_constraints("logical_and"))
    }

    /// Disjunction of the given constraints. A single constraint is
    /// returned as is.
    pub fn logical_or(&self, constraints: impl IntoIterator<Item = Constraint>) -> Result<Constraint> {
        Constraint::or_from_vec(constraints.into_iter().collect())
            .ok_or_else(|| Error::invalid_number_of_constraints("logical_or"))
    }

    pub fn logical_not(&self, constraint: Constraint) -> Constraint {
        Constraint::not(constraint)
    }
}
