use super::Comparison;

use std::ops;

/// A node of the constraint tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Comparison(Comparison),
    And(LogicalAnd),
    Or(LogicalOr),
    Not(LogicalNot),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogicalAnd {
    pub operands: Vec<Constraint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogicalOr {
    pub operands: Vec<Constraint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogicalNot {
    pub constraint: Box<Constraint>,
}

impl Constraint {
    /// Conjunction of two constraints. Nested conjunctions are flattened.
    pub fn and(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        let mut lhs = lhs.into();
        let rhs = rhs.into();

        match (&mut lhs, rhs) {
            (Self::And(lhs_and), Self::And(rhs_and)) => {
                lhs_and.operands.extend(rhs_and.operands);
                lhs
            }
            (Self::And(lhs_and), rhs) => {
                lhs_and.operands.push(rhs);
                lhs
            }
            (_, Self::And(mut rhs_and)) => {
                rhs_and.operands.insert(0, lhs);
                rhs_and.into()
            }
            (_, rhs) => LogicalAnd {
                operands: vec![lhs, rhs],
            }
            .into(),
        }
    }

    /// Conjunction of all operands; `None` when there are none and the
    /// operand itself when there is exactly one.
    pub fn and_from_vec(operands: Vec<Self>) -> Option<Self> {
        let mut operands = operands.into_iter();
        let first = operands.next()?;
        Some(operands.fold(first, Self::and))
    }

    /// Disjunction of two constraints. Nested disjunctions are flattened.
    pub fn or(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        let mut lhs = lhs.into();
        let rhs = rhs.into();

        match (&mut lhs, rhs) {
            (Self::Or(lhs_or), Self::Or(rhs_or)) => {
                lhs_or.operands.extend(rhs_or.operands);
                lhs
            }
            (Self::Or(lhs_or), rhs) => {
                lhs_or.operands.push(rhs);
                lhs
            }
            (_, Self::Or(mut rhs_or)) => {
                rhs_or.operands.insert(0, lhs);
                rhs_or.into()
            }
            (_, rhs) => LogicalOr {
                operands: vec![lhs, rhs],
            }
            .into(),
        }
    }

    pub fn or_from_vec(operands: Vec<Self>) -> Option<Self> {
        let mut operands = operands.into_iter();
        let first = operands.next()?;
        Some(operands.fold(first, Self::or))
    }

    pub fn not(constraint: impl Into<Self>) -> Self {
        LogicalNot {
            constraint: Box::new(constraint.into()),
        }
        .into()
    }

    pub fn is_and(&self) -> bool {
        matches!(self, Self::And(_))
    }

    pub fn is_or(&self) -> bool {
        matches!(self, Self::Or(_))
    }

    pub fn as_comparison(&self) -> Option<&Comparison> {
        match self {
            Self::Comparison(comparison) => Some(comparison),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_comparison(&self) -> &Comparison {
        match self {
            Self::Comparison(comparison) => comparison,
            _ => panic!("expected comparison, but was {self:?}"),
        }
    }

    #[track_caller]
    pub fn expect_and(&self) -> &LogicalAnd {
        match self {
            Self::And(and) => and,
            _ => panic!("expected logical and, but was {self:?}"),
        }
    }

    /// All comparisons of the tree, depth first.
    pub fn comparisons(&self) -> Vec<&Comparison> {
        let mut out = vec![];
        self.collect_comparisons(&mut out);
        out
    }

    fn collect_comparisons<'a>(&'a self, out: &mut Vec<&'a Comparison>) {
        match self {
            Self::Comparison(comparison) => out.push(comparison),
            Self::And(LogicalAnd { operands }) | Self::Or(LogicalOr { operands }) => {
                for operand in operands {
                    operand.collect_comparisons(out);
                }
            }
            Self::Not(not) => not.constraint.collect_comparisons(out),
        }
    }
}

impl ops::Deref for LogicalAnd {
    type Target = [Constraint];

    fn deref(&self) -> &Self::Target {
        self.operands.deref()
    }
}

impl ops::Deref for LogicalOr {
    type Target = [Constraint];

    fn deref(&self) -> &Self::Target {
        self.operands.deref()
    }
}

impl From<LogicalAnd> for Constraint {
    fn from(value: LogicalAnd) -> Self {
        Self::And(value)
    }
}

impl From<LogicalOr> for Constraint {
    fn from(value: LogicalOr) -> Self {
        Self::Or(value)
    }
}

impl From<LogicalNot> for Constraint {
    fn from(value: LogicalNot) -> Self {
        Self::Not(value)
    }
}
