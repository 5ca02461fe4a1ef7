#![allow(dead_code)]

pub mod fixtures;

use indexmap::IndexMap;
use stratum::stmt::{
    Comparison, Constraint, Direction, DynamicOperand, Operator, Row, Select, Source,
};
use stratum::{driver::ChangeSet, Backend, Result, Value};

use std::{cell::RefCell, cmp::Ordering, rc::Rc};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Converts a JSON object into a row.
pub fn row(json: serde_json::Value) -> Row {
    match Value::from_json(&json) {
        Value::Map(row) => row,
        other => panic!("expected a JSON object, got {other:?}"),
    }
}

/// An operation received by the [`MemoryBackend`].
#[derive(Debug, Clone)]
pub enum Op {
    Select(Select),
    Count(Select),
    Commit(Commit),
}

/// What a commit contained, by class name and uid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Commit {
    pub added: Vec<(String, i64)>,
    pub changed: Vec<(String, i64)>,
    pub removed: Vec<(String, i64)>,
}

/// In-memory backend that evaluates query object models against rows.
///
/// Column names equal property names, except for the junction tables
/// queried through joins. Committed objects get uids from 1000 up.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: RefCell<State>,
}

#[derive(Debug, Default)]
struct State {
    tables: IndexMap<String, Vec<Row>>,
    ops: Vec<Op>,
    next_uid: i64,
}

impl MemoryBackend {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn insert(&self, table: &str, row: Row) {
        self.state
            .borrow_mut()
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    pub fn insert_all(&self, table: &str, rows: impl IntoIterator<Item = serde_json::Value>) {
        for json in rows {
            self.insert(table, self::row(json));
        }
    }

    pub fn ops(&self) -> Vec<Op> {
        self.state.borrow().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.state.borrow_mut().ops.clear();
    }

    pub fn selects(&self) -> Vec<Select> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                Op::Select(select) => Some(select),
                _ => None,
            })
            .collect()
    }

    pub fn select_count(&self) -> usize {
        self.selects().len()
    }

    pub fn count_count(&self) -> usize {
        self.ops()
            .iter()
            .filter(|op| matches!(op, Op::Count(_)))
            .count()
    }

    pub fn commits(&self) -> Vec<Commit> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                Op::Commit(commit) => Some(commit),
                _ => None,
            })
            .collect()
    }

    fn evaluate(&self, select: &Select) -> Vec<Row> {
        let state = self.state.borrow();
        let table = |name: &str| state.tables.get(name).cloned().unwrap_or_default();

        let (target, tuples): (String, Vec<IndexMap<String, Row>>) = match &select.source {
            Source::Selector(selector) => (
                selector.selector_name.clone(),
                table(&selector.selector_name)
                    .into_iter()
                    .map(|row| IndexMap::from([(selector.selector_name.clone(), row)]))
                    .collect(),
            ),
            Source::Join(join) => {
                let left = join.left.selector_name().to_string();
                let right = join.right.selector_name().to_string();
                let condition = &join.condition;

                let mut tuples = vec![];
                for left_row in table(&left) {
                    for right_row in table(&right) {
                        let lhs = left_row.get(&condition.property1_name);
                        let rhs = right_row.get(&condition.property2_name);
                        if let (Some(lhs), Some(rhs)) = (lhs, rhs) {
                            if compare(lhs, rhs) == Some(Ordering::Equal) {
                                tuples.push(IndexMap::from([
                                    (left.clone(), left_row.clone()),
                                    (right.clone(), right_row),
                                ]));
                            }
                        }
                    }
                }
                (right, tuples)
            }
        };

        let settings = &select.settings;
        let mut tuples = tuples
            .into_iter()
            .filter(|tuple| {
                if !settings.respect_storage_page() || settings.storage_page_ids().is_empty() {
                    return true;
                }
                tuple[&target]
                    .get("pid")
                    .and_then(Value::to_integer)
                    .is_some_and(|pid| settings.storage_page_ids().contains(&pid))
            })
            .filter(|tuple| {
                select
                    .constraint
                    .as_ref()
                    .map_or(true, |constraint| matches(constraint, tuple, &target))
            })
            .collect::<Vec<_>>();

        for (property, direction) in select.orderings.iter().rev() {
            tuples.sort_by(|a, b| {
                let ordering = compare(&lookup(a, None, property, &target), &lookup(b, None, property, &target))
                    .unwrap_or(Ordering::Equal);
                match direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }

        tuples
            .into_iter()
            .skip(select.offset.unwrap_or(0) as usize)
            .take(select.limit.map_or(usize::MAX, |limit| limit as usize))
            .map(|mut tuple| tuple.swap_remove(&target).unwrap_or_default())
            .collect()
    }
}

impl Backend for MemoryBackend {
    fn get_object_data_by_query(&self, query: &Select) -> Result<Vec<Row>> {
        self.state.borrow_mut().ops.push(Op::Select(query.clone()));
        Ok(self.evaluate(query))
    }

    fn get_object_count_by_query(&self, query: &Select) -> Result<usize> {
        self.state.borrow_mut().ops.push(Op::Count(query.clone()));
        Ok(self.evaluate(query).len())
    }

    fn commit(&self, changes: &ChangeSet) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let mut commit = Commit::default();

        for object in &changes.added {
            if state.next_uid == 0 {
                state.next_uid = 1000;
            }
            let uid = state.next_uid;
            state.next_uid += 1;
            object.borrow_mut().set_uid(uid);
            commit.added.push((object.class_name(), uid));
        }

        for object in &changes.changed {
            commit.changed.push((object.class_name(), object.uid().unwrap_or_default()));
        }

        for object in &changes.removed {
            commit.removed.push((object.class_name(), object.uid().unwrap_or_default()));
        }

        state.ops.push(Op::Commit(commit));
        Ok(())
    }
}

fn lookup(tuple: &IndexMap<String, Row>, selector: Option<&str>, property: &str, target: &str) -> Value {
    if let Some(value) = selector.and_then(|selector| tuple.get(selector)).and_then(|row| row.get(property)) {
        return value.clone();
    }

    tuple
        .get(target)
        .and_then(|row| row.get(property))
        .or_else(|| tuple.values().find_map(|row| row.get(property)))
        .cloned()
        .unwrap_or_default()
}

fn operand_value(operand: &DynamicOperand, tuple: &IndexMap<String, Row>, target: &str) -> Value {
    match operand {
        DynamicOperand::PropertyValue(property) => lookup(
            tuple,
            property.selector_name.as_deref(),
            &property.property_name,
            target,
        ),
        DynamicOperand::LowerCase(inner) => match operand_value(inner, tuple, target) {
            Value::String(text) => Value::String(text.to_lowercase()),
            other => other,
        },
        DynamicOperand::UpperCase(inner) => match operand_value(inner, tuple, target) {
            Value::String(text) => Value::String(text.to_uppercase()),
            other => other,
        },
    }
}

fn matches(constraint: &Constraint, tuple: &IndexMap<String, Row>, target: &str) -> bool {
    match constraint {
        Constraint::Comparison(comparison) => compare_with(comparison, tuple, target),
        Constraint::And(and) => and.operands.iter().all(|operand| matches(operand, tuple, target)),
        Constraint::Or(or) => or.operands.iter().any(|operand| matches(operand, tuple, target)),
        Constraint::Not(not) => !matches(&not.constraint, tuple, target),
    }
}

fn compare_with(comparison: &Comparison, tuple: &IndexMap<String, Row>, target: &str) -> bool {
    let lhs = operand_value(&comparison.operand1, tuple, target);
    let rhs = &comparison.operand2;

    match comparison.operator {
        Operator::EqualTo => compare(&lhs, rhs) == Some(Ordering::Equal),
        Operator::NotEqualTo => compare(&lhs, rhs) != Some(Ordering::Equal),
        Operator::EqualToNull => lhs.is_null(),
        Operator::NotEqualToNull => !lhs.is_null(),
        Operator::LessThan => compare(&lhs, rhs) == Some(Ordering::Less),
        Operator::LessThanOrEqualTo => matches!(compare(&lhs, rhs), Some(Ordering::Less | Ordering::Equal)),
        Operator::GreaterThan => compare(&lhs, rhs) == Some(Ordering::Greater),
        Operator::GreaterThanOrEqualTo => {
            matches!(compare(&lhs, rhs), Some(Ordering::Greater | Ordering::Equal))
        }
        Operator::Like => like(
            &lhs.to_plain_string().unwrap_or_default(),
            &rhs.to_plain_string().unwrap_or_default(),
        ),
        Operator::Contains => members(&lhs)
            .iter()
            .any(|member| compare(member, rhs) == Some(Ordering::Equal)),
        Operator::In => members(rhs)
            .iter()
            .any(|member| compare(&lhs, member) == Some(Ordering::Equal)),
        Operator::IsEmpty => lhs.is_empty_relation(),
    }
}

/// Elements of a list or of a comma separated string.
fn members(value: &Value) -> Vec<Value> {
    match value {
        Value::List(items) => items.clone(),
        Value::Object(object) => vec![Value::from(object.uid())],
        other => other
            .to_plain_string()
            .unwrap_or_default()
            .split(',')
            .filter(|member| !member.is_empty())
            .map(|member| Value::from(member.trim()))
            .collect(),
    }
}

fn compare(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    let rhs = match rhs {
        Value::Object(object) => Value::from(object.uid()),
        other => other.clone(),
    };

    match (lhs, &rhs) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Null, _) | (_, Value::Null) => None,
        (Value::String(lhs), Value::String(rhs)) => Some(lhs.cmp(rhs)),
        _ => match (lhs.to_float(), rhs.to_float()) {
            (Some(lhs), Some(rhs)) => lhs.partial_cmp(&rhs),
            _ => (*lhs == rhs).then_some(Ordering::Equal),
        },
    }
}

/// Case-insensitive SQL `LIKE` supporting `%` wildcards.
fn like(text: &str, pattern: &str) -> bool {
    let text = text.to_lowercase();
    let pattern = pattern.to_lowercase();
    let parts = pattern.split('%').collect::<Vec<_>>();

    let [first, middle @ .., last] = parts.as_slice() else {
        return text == pattern;
    };

    let Some(mut rest) = text.strip_prefix(first) else {
        return false;
    };

    for part in middle {
        match rest.find(part) {
            Some(index) => rest = &rest[index + part.len()..],
            None => return false,
        }
    }

    rest.ends_with(last)
}

