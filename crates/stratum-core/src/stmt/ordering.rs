use super::DynamicOperand;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "ASC", alias = "ascending")]
    Ascending,
    #[serde(rename = "DESC", alias = "descending")]
    Descending,
}

/// Result orderings keyed by property name, applied in insertion order.
pub type Orderings = IndexMap<String, Direction>;

/// A single ordering node produced by the QOM factory.
#[derive(Debug, Clone, PartialEq)]
pub struct Ordering {
    pub operand: DynamicOperand,
    pub direction: Direction,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => "ASC".fmt(f),
            Self::Descending => "DESC".fmt(f),
        }
    }
}
