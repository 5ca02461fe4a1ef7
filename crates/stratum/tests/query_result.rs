mod support;

use pretty_assertions::assert_eq;
use stratum::{stmt::Direction, ObjectRef, Value};
use support::fixtures::{self, BLOG, POST};

fn uids(objects: &[ObjectRef]) -> Vec<i64> {
    objects.iter().filter_map(ObjectRef::uid).collect()
}

#[test]
fn count_asks_backend_once_without_mapping() {
    let (pm, backend) = fixtures::setup();
    let mut result = pm.create_query_for_type(BLOG).unwrap().execute();

    assert_eq!(result.count().unwrap(), 2);
    assert_eq!(result.count().unwrap(), 2);

    assert_eq!(backend.count_count(), 1);
    assert_eq!(backend.select_count(), 0);
    assert!(!result.is_materialized());
    assert!(pm.session().is_empty());
}

#[test]
fn count_follows_offset_changes_once_materialized() {
    let (pm, backend) = fixtures::setup();
    let mut query = pm.create_query_for_type(BLOG).unwrap();
    query.order_by("uid", Direction::Ascending);
    let mut result = query.execute();

    assert_eq!(result.count().unwrap(), 2);

    let extra = ObjectRef::empty(BLOG);
    result.offset_set(2, extra.clone()).unwrap();
    result.offset_set(3, ObjectRef::empty(BLOG)).unwrap();
    assert_eq!(result.count().unwrap(), 4);

    result.offset_unset(0).unwrap();
    assert_eq!(result.count().unwrap(), 3);

    assert!(!result.offset_exists(0).unwrap());
    assert!(result.offset_exists(1).unwrap());
    assert_eq!(result.offset_get(2).unwrap(), Some(extra));
    assert_eq!(backend.count_count(), 1);
}

#[test]
fn materializes_once() {
    let (pm, backend) = fixtures::setup();
    let mut query = pm.create_query_for_type(POST).unwrap();
    query.order_by("uid", Direction::Ascending);
    let mut result = query.execute();

    let first = result.to_vec().unwrap();
    backend.clear_ops();
    let second = result.to_vec().unwrap();

    assert_eq!(uids(&first), [10, 11, 12]);
    assert_eq!(first, second);
    assert!(backend.ops().is_empty());
}

#[test]
fn first_fetches_a_single_row() {
    let (pm, backend) = fixtures::setup();
    let mut query = pm.create_query_for_type(POST).unwrap();
    query.order_by("title", Direction::Ascending);
    let mut result = query.execute();

    let first = result.first().unwrap().unwrap();
    assert_eq!(first.property("title"), Some(Value::from("Async")));
    assert!(!result.is_materialized());

    let posts = backend
        .selects()
        .into_iter()
        .filter(|select| select.class_name == POST)
        .collect::<Vec<_>>();
    assert_eq!(posts[0].limit, Some(1));

    result.to_vec().unwrap();
    assert_eq!(result.first().unwrap(), Some(first));
}

#[test]
fn empty_result() {
    let (pm, _) = fixtures::setup();
    let mut query = pm.create_query_for_type(POST).unwrap();
    let constraint = query.equals("title", "missing", true);
    query.matching(constraint);

    let mut result = query.execute();
    assert_eq!(result.first().unwrap(), None);
    assert_eq!(result.count().unwrap(), 0);
    assert!(!result.valid().unwrap());
    assert_eq!(result.current().unwrap(), None);
}

#[test]
fn cursor_walks_results() {
    let (pm, _) = fixtures::setup();
    let mut query = pm.create_query_for_type(POST).unwrap();
    query.order_by("uid", Direction::Descending);
    let mut result = query.execute();

    let mut seen = vec![];
    result.rewind().unwrap();
    while result.valid().unwrap() {
        let key = result.key().unwrap().unwrap();
        let uid = result.current().unwrap().unwrap().uid().unwrap();
        seen.push((key, uid));
        result.next().unwrap();
    }

    assert_eq!(seen, [(0, 12), (1, 11), (2, 10)]);

    result.rewind().unwrap();
    assert_eq!(result.key().unwrap(), Some(0));
}

#[test]
fn get_query_returns_a_copy() {
    let (pm, _) = fixtures::setup();
    let mut query = pm.create_query_for_type(POST).unwrap();
    query.set_limit(2).unwrap();
    let result = query.execute();

    let mut copy = result.get_query();
    copy.unset_limit();

    assert_eq!(result.get_query().limit(), Some(2));
    assert_eq!(copy.limit(), None);
}
