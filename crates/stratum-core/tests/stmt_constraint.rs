use stratum_core::stmt::{Constraint, DynamicOperand, Operator, QomFactory};

fn eq(property: &str, value: i64) -> Constraint {
    QomFactory
        .comparison(DynamicOperand::property(property, None), Operator::EqualTo, value)
        .into()
}

#[test]
fn and_flattens_nested_conjunctions() {
    let lhs = Constraint::and(eq("a", 1), eq("b", 2));
    let rhs = Constraint::and(eq("c", 3), eq("d", 4));

    let and = Constraint::and(lhs, rhs);
    assert_eq!(and.expect_and().len(), 4);
}

#[test]
fn or_flattens_nested_disjunctions() {
    let or = Constraint::or(Constraint::or(eq("a", 1), eq("b", 2)), eq("c", 3));

    match or {
        Constraint::Or(or) => assert_eq!(or.len(), 3),
        other => panic!("expected or, got {other:?}"),
    }
}

#[test]
fn and_does_not_flatten_into_or() {
    let and = Constraint::and(Constraint::or(eq("a", 1), eq("b", 2)), eq("c", 3));
    let and = and.expect_and();

    assert_eq!(and.len(), 2);
    assert!(and[0].is_or());
}

#[test]
fn from_vec_collapses_single_operand() {
    assert_eq!(Constraint::and_from_vec(vec![]), None);
    assert_eq!(Constraint::and_from_vec(vec![eq("a", 1)]), Some(eq("a", 1)));
    assert_eq!(Constraint::or_from_vec(vec![eq("a", 1)]), Some(eq("a", 1)));

    let and = Constraint::and_from_vec(vec![eq("a", 1), eq("b", 2), eq("c", 3)]).unwrap();
    assert_eq!(and.expect_and().len(), 3);
}

#[test]
fn comparisons_are_collected_depth_first() {
    let tree = Constraint::and(
        eq("a", 1),
        Constraint::not(Constraint::or(eq("b", 2), eq("c", 3))),
    );

    let names = tree
        .comparisons()
        .iter()
        .map(|comparison| comparison.property_name().to_string())
        .collect::<Vec<_>>();
    assert_eq!(names, ["a", "b", "c"]);
}

#[test]
fn operand_helpers() {
    let operand = QomFactory.lower_case(QomFactory.property_value("title", Some("tx_blog_post")));

    assert!(operand.is_lower_case());
    assert_eq!(operand.property_name(), "title");
    assert_eq!(operand.selector_name(), Some("tx_blog_post"));
    assert_eq!(Operator::LessThan.reverse(), Operator::GreaterThan);
    assert_eq!(Operator::EqualToNull.to_string(), "IS NULL");
}
