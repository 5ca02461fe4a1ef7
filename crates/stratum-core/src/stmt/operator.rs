use std::fmt;

/// Comparison operators understood by the query object model.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    EqualTo,
    EqualToNull,
    NotEqualTo,
    NotEqualToNull,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    Like,
    /// Multi-valued property contains the operand
    Contains,
    /// Property value is one of the operand's elements
    In,
    /// Multi-valued property has no elements
    IsEmpty,
}

impl Operator {
    pub fn is_eq(self) -> bool {
        matches!(self, Self::EqualTo)
    }

    /// Operators that compare against null and ignore their operand.
    pub fn is_null_check(self) -> bool {
        matches!(self, Self::EqualToNull | Self::NotEqualToNull | Self::IsEmpty)
    }

    /// Returns the operator that holds when the operands are swapped.
    pub fn reverse(self) -> Self {
        match self {
            Self::LessThan => Self::GreaterThan,
            Self::LessThanOrEqualTo => Self::GreaterThanOrEqualTo,
            Self::GreaterThan => Self::LessThan,
            Self::GreaterThanOrEqualTo => Self::LessThanOrEqualTo,
            op => op,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Operator::*;

        match self {
            EqualTo => "=".fmt(f),
            EqualToNull => "IS NULL".fmt(f),
            NotEqualTo => "!=".fmt(f),
            NotEqualToNull => "IS NOT NULL".fmt(f),
            LessThan => "<".fmt(f),
            LessThanOrEqualTo => "<=".fmt(f),
            GreaterThan => ">".fmt(f),
            GreaterThanOrEqualTo => ">=".fmt(f),
            Like => "LIKE".fmt(f),
            Contains => "CONTAINS".fmt(f),
            In => "IN".fmt(f),
            IsEmpty => "IS EMPTY".fmt(f),
        }
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
