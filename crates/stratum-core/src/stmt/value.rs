use super::{Deferred, ObjectRef};
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;

#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Null value
    #[default]
    Null,

    /// Boolean value
    Bool(bool),

    /// Signed 64-bit integer
    I64(i64),

    /// 64-bit float
    F64(f64),

    /// String value
    String(String),

    /// Point in time with a fixed UTC offset
    DateTime(DateTime<FixedOffset>),

    /// Indexed collection
    List(Vec<Value>),

    /// Associative collection, keyed by string in insertion order
    Map(IndexMap<String, Value>),

    /// A domain object
    Object(ObjectRef),

    /// A value that is loaded on first access
    Deferred(Deferred),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for values that are neither collections nor objects.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Null | Self::Bool(_) | Self::I64(_) | Self::F64(_) | Self::String(_)
        )
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Self::List(_) | Self::Map(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Loose integer view: integers, booleans, integral floats and numeric
    /// strings.
    pub fn to_integer(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            Self::Bool(v) => Some(*v as i64),
            Self::F64(v) if v.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(v) => {
                Some(*v as i64)
            }
            Self::String(v) => v.trim().parse().ok(),
            _ => None,
        }
    }

    /// Loose float view: numbers and numeric strings.
    pub fn to_float(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            Self::I64(v) => Some(*v as f64),
            Self::String(v) => v.trim().parse().ok(),
            _ => None,
        }
    }

    /// Loose truthiness of scalars: `0`, `""`, `"0"` and null are false.
    pub fn to_bool(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(v) => *v,
            Self::I64(v) => *v != 0,
            Self::F64(v) => *v != 0.0,
            Self::String(v) => !(v.is_empty() || v == "0"),
            Self::List(items) => !items.is_empty(),
            Self::Map(map) => !map.is_empty(),
            Self::DateTime(_) | Self::Object(_) | Self::Deferred(_) => true,
        }
    }

    /// Renders a scalar as a string. Objects are rendered as their uid.
    pub fn to_plain_string(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(v) => Some(if *v { "1" } else { "0" }.to_string()),
            Self::I64(v) => Some(v.to_string()),
            Self::F64(v) => Some(v.to_string()),
            Self::String(v) => Some(v.clone()),
            Self::DateTime(v) => Some(v.to_rfc3339()),
            Self::Object(object) => object.uid().map(|uid| uid.to_string()),
            Self::List(_) | Self::Map(_) | Self::Deferred(_) => None,
        }
    }

    /// Returns `true` for values that denote "no related record": null,
    /// empty strings and zero.
    pub fn is_empty_relation(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(v) => v.is_empty() || v == "0",
            Self::I64(v) => *v == 0,
            Self::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Name of the value's kind, used in error messages and converter
    /// selection.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::I64(_) => "integer",
            Self::F64(_) => "float",
            Self::String(_) => "string",
            Self::DateTime(_) => "DateTime",
            Self::List(_) | Self::Map(_) => "array",
            Self::Object(_) => "object",
            Self::Deferred(_) => "deferred",
        }
    }

    /// Builds a map value from key / value pairs.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Builds a list value.
    pub fn list<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Converts a JSON document into a value. Integral numbers become `I64`,
    /// other numbers `F64`.
    pub fn from_json(json: &serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Self::Null,
            Json::Bool(v) => Self::Bool(*v),
            Json::Number(n) => match n.as_i64() {
                Some(v) => Self::I64(v),
                None => Self::F64(n.as_f64().unwrap_or_default()),
            },
            Json::String(v) => Self::String(v.clone()),
            Json::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            Json::Object(map) => Self::Map(
                map.iter()
                    .map(|(key, value)| (key.clone(), Self::from_json(value)))
                    .collect(),
            ),
        }
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::I64(src as i64)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::I64(src)
    }
}

impl From<u32> for Value {
    fn from(src: u32) -> Self {
        Self::I64(src as i64)
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::F64(src)
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(src: DateTime<FixedOffset>) -> Self {
        Self::DateTime(src)
    }
}

impl From<ObjectRef> for Value {
    fn from(src: ObjectRef) -> Self {
        Self::Object(src)
    }
}

impl From<&ObjectRef> for Value {
    fn from(src: &ObjectRef) -> Self {
        Self::Object(src.clone())
    }
}

impl From<Deferred> for Value {
    fn from(src: Deferred) -> Self {
        Self::Deferred(src)
    }
}

impl From<Vec<Value>> for Value {
    fn from(src: Vec<Value>) -> Self {
        Self::List(src)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(src: IndexMap<String, Value>) -> Self {
        Self::Map(src)
    }
}

impl From<serde_json::Value> for Value {
    fn from(src: serde_json::Value) -> Self {
        Self::from_json(&src)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(src: Option<T>) -> Self {
        match src {
            Some(value) => value.into(),
            None => Self::Null,
        }
    }
}
