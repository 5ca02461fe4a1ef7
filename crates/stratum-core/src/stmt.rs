//! Statement values and the query object model.
//!
//! Constraint trees are plain values: they are built through
//! [`QomFactory`] (or the constructors on the node types), attached to a
//! [`Select`], and handed to a [`Backend`](crate::Backend) untouched.

mod comparison;
pub use comparison::Comparison;

mod constraint;
pub use constraint::{Constraint, LogicalAnd, LogicalNot, LogicalOr};

mod deferred;
pub use deferred::Deferred;

mod factory;
pub use factory::QomFactory;

mod object;
pub use object::{DomainObject, ObjectRef};

mod operand;
pub use operand::{DynamicOperand, PropertyValue};

mod operator;
pub use operator::Operator;

mod ordering;
pub use ordering::{Direction, Ordering, Orderings};

mod select;
pub use select::Select;

mod settings;
pub use settings::{LanguageOverlay, QuerySettings};

mod source;
pub use source::{EquiJoinCondition, Join, JoinType, Selector, Source};

mod value;
pub use value::Value;

use indexmap::IndexMap;

/// A raw result row, keyed by column name.
pub type Row = IndexMap<String, Value>;
