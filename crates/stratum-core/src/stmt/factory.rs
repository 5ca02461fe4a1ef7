use super::*;

/// Builds query object model nodes.
///
/// The factory holds no state; it exists so that code building constraint
/// trees reads the same whether it goes through a query or not.
#[derive(Debug, Default, Clone, Copy)]
pub struct QomFactory;

impl QomFactory {
    pub fn selector(
        &self,
        node_type_name: Option<&str>,
        selector_name: impl Into<String>,
    ) -> Selector {
        Selector {
            node_type_name: node_type_name.map(str::to_string),
            selector_name: selector_name.into(),
        }
    }

    pub fn join(
        &self,
        left: impl Into<Source>,
        right: impl Into<Source>,
        join_type: JoinType,
        condition: EquiJoinCondition,
    ) -> Join {
        Join {
            left: Box::new(left.into()),
            right: Box::new(right.into()),
            join_type,
            condition,
        }
    }

    pub fn equi_join_condition(
        &self,
        selector1_name: impl Into<String>,
        property1_name: impl Into<String>,
        selector2_name: impl Into<String>,
        property2_name: impl Into<String>,
    ) -> EquiJoinCondition {
        EquiJoinCondition {
            selector1_name: selector1_name.into(),
            property1_name: property1_name.into(),
            selector2_name: selector2_name.into(),
            property2_name: property2_name.into(),
        }
    }

    pub fn and(&self, lhs: impl Into<Constraint>, rhs: impl Into<Constraint>) -> Constraint {
        Constraint::and(lhs, rhs)
    }

    pub fn or(&self, lhs: impl Into<Constraint>, rhs: impl Into<Constraint>) -> Constraint {
        Constraint::or(lhs, rhs)
    }

    pub fn not(&self, constraint: impl Into<Constraint>) -> Constraint {
        Constraint::not(constraint)
    }

    pub fn comparison(
        &self,
        operand1: DynamicOperand,
        operator: Operator,
        operand2: impl Into<Value>,
    ) -> Comparison {
        Comparison::new(operand1, operator, operand2)
    }

    pub fn property_value(
        &self,
        property_name: impl Into<String>,
        selector_name: Option<&str>,
    ) -> DynamicOperand {
        DynamicOperand::property(property_name, selector_name.map(str::to_string))
    }

    pub fn lower_case(&self, operand: DynamicOperand) -> DynamicOperand {
        operand.lower_case()
    }

    pub fn upper_case(&self, operand: DynamicOperand) -> DynamicOperand {
        operand.upper_case()
    }

    pub fn ascending(&self, operand: DynamicOperand) -> Ordering {
        Ordering {
            operand,
            direction: Direction::Ascending,
        }
    }

    pub fn descending(&self, operand: DynamicOperand) -> Ordering {
        Ordering {
            operand,
            direction: Direction::Descending,
        }
    }
}
