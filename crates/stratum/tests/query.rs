mod support;

use pretty_assertions::assert_eq;
use serde_json::json;
use stratum::{
    stmt::{Direction, DynamicOperand, Operator},
    Query, Settings, Value,
};
use support::fixtures::{self, POST, POST_TABLE};

fn titles(query: &Query) -> Vec<String> {
    query
        .execute()
        .to_vec()
        .unwrap()
        .iter()
        .map(|post| post.property("title").unwrap().to_plain_string().unwrap())
        .collect()
}

#[test]
fn invalid_limit_and_offset() {
    let (pm, _) = fixtures::setup();
    let mut query = pm.create_query_for_type(POST).unwrap();

    for limit in [Value::I64(0), Value::I64(-3), Value::from("10"), Value::F64(1.5)] {
        let err = query.set_limit(limit).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(err.code(), Some(1245071870));
    }

    let err = query.set_offset(-1).unwrap_err();
    assert_eq!(err.code(), Some(1245071872));
    let err = query.set_offset("2").unwrap_err();
    assert_eq!(err.code(), Some(1245071872));

    query.set_limit(2).unwrap().set_offset(0).unwrap();
    assert_eq!(query.limit(), Some(2));
    assert_eq!(query.offset(), Some(0));

    query.unset_limit();
    assert_eq!(query.limit(), None);
}

#[test]
fn equals_null_compares_against_null() {
    let (pm, _) = fixtures::setup();
    let query = pm.create_query_for_type(POST).unwrap();

    let constraint = query.equals("published", Value::Null, true);
    let comparison = constraint.expect_comparison();

    assert_eq!(comparison.operator, Operator::EqualToNull);
    assert_eq!(comparison.property_name(), "published");
    assert_eq!(comparison.operand1.selector_name(), Some(POST_TABLE));
}

#[test]
fn case_insensitive_equals_folds_unicode() {
    let (pm, backend) = fixtures::setup();
    backend.insert_all(
        POST_TABLE,
        [
            json!({ "uid": 30, "pid": 1, "title": "Żółw" }),
            json!({ "uid": 31, "pid": 1, "title": "Straße" }),
            json!({ "uid": 32, "pid": 1, "title": "Σοφία" }),
            json!({ "uid": 33, "pid": 1, "title": "Москва" }),
        ],
    );

    let mut query = pm.create_query_for_type(POST).unwrap();

    for (operand, lowered, title) in [
        ("ŻÓŁW", "żółw", "Żółw"),
        ("STRAßE", "straße", "Straße"),
        ("ΣΟΦΊΑ", "σοφία", "Σοφία"),
        ("МОСКВА", "москва", "Москва"),
    ] {
        let constraint = query.equals("title", operand, false);
        let comparison = constraint.expect_comparison();

        assert!(comparison.operand1.is_lower_case());
        assert_eq!(comparison.operand2, Value::from(lowered));

        query.matching(constraint);
        assert_eq!(titles(&query), vec![title.to_string()], "{operand}");
    }
}

#[test]
fn case_sensitive_equals_keeps_operand() {
    let (pm, _) = fixtures::setup();
    let mut query = pm.create_query_for_type(POST).unwrap();

    let constraint = query.equals("title", "ASYNC", true);
    assert!(matches!(
        constraint.expect_comparison().operand1,
        DynamicOperand::PropertyValue(_)
    ));

    query.matching(constraint);
    assert!(titles(&query).is_empty());
}

#[test]
fn in_requires_a_collection() {
    let (pm, _) = fixtures::setup();
    let mut query = pm.create_query_for_type(POST).unwrap();

    let err = query.in_("uid", 10).unwrap_err();
    assert!(err.is_unexpected_type());
    assert_eq!(err.code(), Some(1264678095));

    let constraint = query.in_("uid", Value::list([10, 12])).unwrap();
    query.matching(constraint).order_by("uid", Direction::Ascending);
    assert_eq!(titles(&query), ["Borrowing", "Bread"]);
}

#[test]
fn logical_operators_need_constraints() {
    let (pm, _) = fixtures::setup();
    let query = pm.create_query_for_type(POST).unwrap();

    let err = query.logical_and(vec![]).unwrap_err();
    assert!(err.is_invalid_number_of_constraints());
    assert_eq!(err.code(), Some(1268056288));

    let err = query.logical_or(vec![]).unwrap_err();
    assert_eq!(err.code(), Some(1268056288));

    let single = query.equals("uid", 10, true);
    assert_eq!(query.logical_and(vec![single.clone()]).unwrap(), single);
}

#[test]
fn comparisons_and_logic_filter_results() {
    let (pm, _) = fixtures::setup();
    let mut query = pm.create_query_for_type(POST).unwrap();

    let constraint = query
        .logical_or(vec![
            query.greater_than_or_equal("rating", 5),
            query.logical_and(vec![
                query.like("title", "b%"),
                query.logical_not(query.equals("uid", 12, true)),
            ])
            .unwrap(),
        ])
        .unwrap();

    query.matching(constraint).order_by("title", Direction::Descending);
    assert_eq!(titles(&query), ["Borrowing", "Async"]);

    let between = query.between("rating", 3, 4);
    assert!(between.is_and());
    query.matching(between).order_by("title", Direction::Ascending);
    assert_eq!(query.count().unwrap(), 2);
}

#[test]
fn storage_pages_restrict_results() {
    let (pm, _) = fixtures::setup_with(Settings::default().storage_pid([2]));
    let query = pm.create_query_for_type(POST).unwrap();

    assert_eq!(query.query_settings().storage_page_ids(), &[2]);
    assert_eq!(titles(&query), ["Bread"]);

    let mut query = pm.create_query_for_type(POST).unwrap();
    query.query_settings_mut().set_respect_storage_page(false);
    assert_eq!(query.count().unwrap(), 3);
}

#[test]
fn limit_and_offset_page_through_results() {
    let (pm, _) = fixtures::setup();
    let mut query = pm.create_query_for_type(POST).unwrap();

    query
        .order_by("uid", Direction::Ascending)
        .set_limit(1)
        .unwrap()
        .set_offset(1)
        .unwrap();

    assert_eq!(titles(&query), ["Async"]);
    assert_eq!(query.count().unwrap(), 1);
}
