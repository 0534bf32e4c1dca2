//! Field type tags and the typed values produced by casting.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::Value;
use uuid::Uuid;

/// The declared type of a request parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Free text.
    String,
    /// Signed 64-bit integer.
    Integer,
    /// Integer greater than or equal to one.
    PositiveInteger,
    /// 64-bit float.
    Float,
    /// Boolean.
    Boolean,
    /// Calendar date (`YYYY-MM-DD`).
    Date,
    /// UTC timestamp (RFC 3339).
    DateTime,
    /// UUID.
    Uuid,
    /// Homogeneous list of the inner type.
    Array(Box<FieldType>),
    /// Sort wire format: a list of one-key `{field: direction}` maps.
    SortList,
    /// Any JSON value, passed through untouched.
    Any,
}

impl FieldType {
    /// Shorthand for `Array(inner)`.
    pub fn array(inner: FieldType) -> Self {
        Self::Array(Box::new(inner))
    }

    /// Type name used in error context.
    pub fn name(&self) -> String {
        match self {
            Self::String => "string".to_string(),
            Self::Integer => "integer".to_string(),
            Self::PositiveInteger => "positive_integer".to_string(),
            Self::Float => "float".to_string(),
            Self::Boolean => "boolean".to_string(),
            Self::Date => "date".to_string(),
            Self::DateTime => "utc_datetime".to_string(),
            Self::Uuid => "uuid".to_string(),
            Self::Array(inner) => format!("array({})", inner.name()),
            Self::SortList => "sort_list".to_string(),
            Self::Any => "any".to_string(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// A successfully cast parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// A string value.
    String(String),
    /// An integer value.
    Integer(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Boolean(bool),
    /// A calendar date.
    Date(NaiveDate),
    /// A UTC timestamp.
    DateTime(DateTime<Utc>),
    /// A UUID.
    Uuid(Uuid),
    /// A list of values.
    List(Vec<TypedValue>),
    /// Untyped JSON, kept as supplied.
    Json(Value),
}

impl TypedValue {
    /// Render back into the raw JSON shape a caster accepts for the same type.
    pub fn to_raw(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Integer(i) => Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Boolean(b) => Value::Bool(*b),
            Self::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            Self::DateTime(dt) => Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::Uuid(u) => Value::String(u.to_string()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_raw).collect()),
            Self::Json(v) => v.clone(),
        }
    }

    /// Borrow as a string slice, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Read as an integer, if this is one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Read as a boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Read as a date, if this is one.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Compare two values of compatible variants.
    ///
    /// Integers and floats compare numerically with each other. Values of
    /// unrelated variants are incomparable and yield `None`.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Integer(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Boolean(a), Self::Boolean(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
            (Self::Uuid(a), Self::Uuid(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for TypedValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for TypedValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<NaiveDate> for TypedValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<DateTime<Utc>> for TypedValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<Uuid> for TypedValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}
