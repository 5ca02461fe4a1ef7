use crate::{events::Event, persistence::WeakPersistenceManager, PersistenceManager, Query};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use stratum_core::{
    err,
    mapping::{ColumnMap, DateTimeStorageFormat, Relation},
    schema::Type,
    stmt::{Deferred, Direction, DomainObject, JoinType, ObjectRef, Orderings, QomFactory, Row, Value},
    Result,
};

/// Maps raw rows to domain objects.
///
/// Objects already known to the session are reused, so every persisted
/// identity has exactly one object per unit of work.
#[derive(Debug)]
pub struct DataMapper<'a> {
    pm: &'a PersistenceManager,
}

impl<'a> DataMapper<'a> {
    pub fn new(pm: &'a PersistenceManager) -> Self {
        Self { pm }
    }

    pub fn map(&self, class_name: &str, rows: Vec<Row>) -> Result<Vec<ObjectRef>> {
        rows.iter()
            .map(|row| self.map_single_row(class_name, row))
            .collect()
    }

    fn map_single_row(&self, class_name: &str, row: &Row) -> Result<ObjectRef> {
        let class_name = self.get_target_type(class_name, row)?;
        let uid = row.get("uid").and_then(Value::to_integer);

        if let Some(uid) = uid {
            let existing = self
                .pm
                .session()
                .get_object_by_identifier(&uid.to_string(), &class_name);

            if let Some(object) = existing {
                return Ok(object);
            }
        }

        let data_map = self.pm.data_map(&class_name)?;
        let mut object = DomainObject::new(&class_name);

        if let Some(uid) = uid {
            object.set_uid(uid);
        }

        if let Some(pid) = row.get("pid").and_then(Value::to_integer) {
            object.set_pid(pid);
        }

        if let Some(language_uid) = data_map
            .language_id_column_name
            .as_ref()
            .and_then(|column| row.get(column))
            .and_then(Value::to_integer)
        {
            object.set_language_uid(language_uid);
        }

        if let Some(localized_uid) = row.get("_LOCALIZED_UID").and_then(Value::to_integer) {
            object.set_localized_uid(localized_uid);
        }

        let object = ObjectRef::new(object);

        if let Some(uid) = uid {
            self.pm.session_mut().register_object(&object, uid.to_string());
        }

        self.thaw_properties(&object, row)?;

        self.pm.dispatch(Event::AfterObjectThawed {
            object: object.clone(),
            record: row.clone(),
        });

        object.borrow_mut().memorize_clean_state();
        self.pm.session_mut().register_reconstituted_entity(&object);

        Ok(object)
    }

    /// Resolves the class a row maps to, following the record-type column
    /// into the configured subclasses.
    pub fn get_target_type(&self, class_name: &str, row: &Row) -> Result<String> {
        let data_map = self.pm.data_map(class_name)?;

        let Some(record_type) = data_map
            .record_type_column_name
            .as_ref()
            .and_then(|column| row.get(column))
            .and_then(Value::to_plain_string)
        else {
            return Ok(data_map.class_name.clone());
        };

        for subclass in &data_map.subclasses {
            let subclass_map = self.pm.data_map(subclass)?;
            if subclass_map.record_type.as_deref() == Some(record_type.as_str()) {
                return Ok(subclass_map.class_name.clone());
            }
        }

        Ok(data_map.class_name.clone())
    }

    fn thaw_properties(&self, object: &ObjectRef, row: &Row) -> Result<()> {
        let class_name = object.class_name();
        let data_map = self.pm.data_map(&class_name)?;
        let schema = self.pm.reflection().class_schema(&class_name)?;

        for (property_name, column_map) in &data_map.column_maps {
            let Some(raw) = row.get(&column_map.column_name) else {
                continue;
            };

            let Some(property) = schema.property_schema(property_name) else {
                continue;
            };

            let value = match &property.ty {
                Type::Object(_) | Type::Collection(_) if column_map.is_relation() => {
                    self.fetch_related(object, property_name, raw, property.lazy)?
                }
                _ if raw.is_null() => Value::Null,
                Type::Int => Value::I64(raw.to_integer().unwrap_or(0)),
                Type::Float => Value::F64(raw.to_float().unwrap_or(0.0)),
                Type::Bool => Value::Bool(raw.to_bool()),
                Type::String => Value::String(raw.to_plain_string().unwrap_or_default()),
                Type::DateTime => map_date_time(raw, column_map.date_time_storage_format)?,
                Type::Object(class) if self.is_persistable(class) => {
                    self.fetch_by_uid(class, raw)?
                }
                _ => raw.clone(),
            };

            object.set_property(property_name.as_str(), value);
        }

        Ok(())
    }

    fn is_persistable(&self, class_name: &str) -> bool {
        self.pm
            .reflection()
            .class_schema(class_name)
            .map(|schema| schema.is_persistable())
            .unwrap_or(false)
    }

    fn fetch_by_uid(&self, class_name: &str, raw: &Value) -> Result<Value> {
        if raw.is_empty_relation() {
            return Ok(Value::Null);
        }

        let Some(uid) = raw.to_plain_string() else {
            return Ok(Value::Null);
        };

        Ok(self
            .pm
            .get_object_by_identifier(&uid, class_name)?
            .map(Value::from)
            .unwrap_or_default())
    }

    /// Loads the objects related to `parent` through `property_name`.
    ///
    /// Lazy properties get a [`Deferred`] value that runs the query on first
    /// access.
    pub fn fetch_related(
        &self,
        parent: &ObjectRef,
        property_name: &str,
        field_value: &Value,
        lazy: bool,
    ) -> Result<Value> {
        let parent_class = parent.class_name();
        let parent_uid = parent.uid();

        if !lazy {
            return self.fetch_related_eager(&parent_class, parent_uid, property_name, field_value);
        }

        let pm: WeakPersistenceManager = self.pm.downgrade();
        let property_name = property_name.to_string();
        let field_value = field_value.clone();

        Ok(Value::Deferred(Deferred::new(move || {
            let pm = pm.upgrade()?;
            let mapper = DataMapper::new(&pm);
            mapper.fetch_related_eager(&parent_class, parent_uid, &property_name, &field_value)
        })))
    }

    fn fetch_related_eager(
        &self,
        parent_class: &str,
        parent_uid: Option<i64>,
        property_name: &str,
        field_value: &Value,
    ) -> Result<Value> {
        let schema = self.pm.reflection().class_schema(parent_class)?;
        let to_many = schema
            .property_schema(property_name)
            .is_some_and(|property| property.ty.is_collection());

        let (Some(parent_uid), false) = (parent_uid, field_value.is_empty_relation()) else {
            return Ok(empty_relation(to_many));
        };

        let query = self.get_prepared_query(parent_class, parent_uid, property_name, field_value)?;
        let objects = query.execute().to_vec()?;

        Ok(if to_many {
            Value::List(objects.into_iter().map(Value::Object).collect())
        } else {
            objects.into_iter().next().map(Value::Object).unwrap_or_default()
        })
    }

    /// Builds the query that loads the objects related to the parent with
    /// uid `parent_uid` through `property_name`.
    ///
    /// The query ignores storage page and language restrictions. Relations
    /// through a junction table join it with the child table.
    pub fn get_prepared_query(
        &self,
        parent_class: &str,
        parent_uid: i64,
        property_name: &str,
        field_value: &Value,
    ) -> Result<Query> {
        let data_map = self.pm.data_map(parent_class)?;
        let column_map = data_map
            .column_map(property_name)
            .ok_or_else(|| err!("property `{property_name}` of `{parent_class}` is not mapped"))?;

        let schema = self.pm.reflection().class_schema(parent_class)?;
        let child_class = schema
            .property_schema(property_name)
            .and_then(|property| property.ty.class_name())
            .ok_or_else(|| err!("property `{property_name}` of `{parent_class}` is not a relation"))?
            .to_string();

        let mut query = self.pm.create_query_for_type_with(&child_class, |settings| {
            settings
                .set_respect_storage_page(false)
                .set_respect_sys_language(false);
        })?;

        let mut constraints = vec![];
        let mut orderings = Orderings::new();

        if column_map.relation == Relation::HasAndBelongsToMany {
            join_relation_table(&mut query, &child_class, column_map)?;

            if let Some(parent_key) = &column_map.parent_key_field_name {
                constraints.push(query.equals(parent_key, parent_uid, true));
            }

            for (field, value) in &column_map.relation_table_match_fields {
                constraints.push(query.equals(field, value.clone(), true));
            }

            if let Some(sort_by) = &column_map.child_sort_by_field_name {
                orderings.insert(sort_by.clone(), Direction::Ascending);
            }
        } else {
            if let Some(parent_key) = &column_map.parent_key_field_name {
                constraints.push(query.equals(parent_key, parent_uid, true));

                if let Some(table_field) = &column_map.parent_table_field_name {
                    constraints.push(query.equals(table_field, data_map.table_name.as_str(), true));
                }
            } else {
                constraints.push(query.in_("uid", Value::List(uid_list(field_value)))?);
            }

            for (field, value) in &column_map.relation_match_fields {
                constraints.push(query.equals(field, value.clone(), true));
            }

            match &column_map.child_sort_by_field_name {
                Some(sort_by) => {
                    orderings.insert(sort_by.clone(), Direction::Ascending);
                }
                None => orderings = column_map.default_orderings(),
            }
        }

        let constraint = query.logical_and(constraints)?;
        query.matching(constraint).set_orderings(orderings);

        Ok(query)
    }
}

fn join_relation_table(query: &mut Query, child_class: &str, column_map: &ColumnMap) -> Result<()> {
    let relation_table = column_map
        .relation_table_name
        .as_deref()
        .ok_or_else(|| err!("property `{}` has no relation table", column_map.property_name))?;

    let child_table = match &column_map.child_table_name {
        Some(child_table) => child_table.clone(),
        None => query.source().selector_name().to_string(),
    };

    let child_key = column_map
        .child_key_field_name
        .as_deref()
        .unwrap_or("uid_foreign");

    let left = QomFactory.selector(None, relation_table);
    let right = QomFactory.selector(Some(child_class), &child_table);
    let condition = QomFactory.equi_join_condition(relation_table, child_key, &child_table, "uid");

    query.set_source(QomFactory.join(left, right, JoinType::Inner, condition));
    Ok(())
}

fn empty_relation(to_many: bool) -> Value {
    if to_many {
        Value::List(vec![])
    } else {
        Value::Null
    }
}

/// Uids stored inline in a relation column: `"1,2"`, `3` or a list.
fn uid_list(field_value: &Value) -> Vec<Value> {
    match field_value {
        Value::List(items) => items
            .iter()
            .filter_map(Value::to_integer)
            .map(Value::I64)
            .collect(),
        other => other
            .to_plain_string()
            .unwrap_or_default()
            .split(',')
            .filter_map(|uid| uid.trim().parse::<i64>().ok())
            .map(Value::I64)
            .collect(),
    }
}

/// Thaws a DateTime column, stored either natively or as a unix timestamp.
/// Zero dates and empty values become null.
fn map_date_time(raw: &Value, format: Option<DateTimeStorageFormat>) -> Result<Value> {
    if let Value::DateTime(_) = raw {
        return Ok(raw.clone());
    }

    let Some(format) = format else {
        return Ok(match raw.to_integer() {
            None | Some(0) => Value::Null,
            Some(timestamp) => DateTime::from_timestamp(timestamp, 0)
                .map(|date_time| Value::DateTime(date_time.fixed_offset()))
                .ok_or_else(|| err!("timestamp `{timestamp}` is out of range"))?,
        });
    };

    let text = raw.to_plain_string().unwrap_or_default();
    if text.is_empty() || text == format.empty_value() {
        return Ok(Value::Null);
    }

    let naive = match format {
        DateTimeStorageFormat::Date => NaiveDate::parse_from_str(&text, format.pattern())
            .map(|date| date.and_time(NaiveTime::default())),
        DateTimeStorageFormat::DateTime => NaiveDateTime::parse_from_str(&text, format.pattern()),
        DateTimeStorageFormat::Time => NaiveTime::parse_from_str(&text, format.pattern())
            .map(|time| NaiveDate::default().and_time(time)),
    }
    .map_err(|_| err!("`{text}` is not a valid {format:?} value"))?;

    Ok(Value::DateTime(naive.and_utc().fixed_offset()))
}
