use super::{Constraint, DynamicOperand, Operator, Value};

/// Compares a property against a static operand.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub operand1: DynamicOperand,
    pub operator: Operator,
    pub operand2: Value,
}

impl Comparison {
    pub fn new(operand1: DynamicOperand, operator: Operator, operand2: impl Into<Value>) -> Self {
        Self {
            operand1,
            operator,
            operand2: operand2.into(),
        }
    }

    pub fn property_name(&self) -> &str {
        self.operand1.property_name()
    }
}

impl From<Comparison> for Constraint {
    fn from(value: Comparison) -> Self {
        Self::Comparison(value)
    }
}
