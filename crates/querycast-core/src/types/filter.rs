//! Backend-neutral filter conditions.
//!
//! Filter functions registered on a builder are free to extend a query in
//! any way; these types give the bundled backends a shared vocabulary for
//! the common comparisons.

use serde::{Deserialize, Serialize};

use super::value::TypedValue;

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality.
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Case-insensitive substring match.
    Contains,
    /// List membership.
    In,
    /// Null check.
    IsNull,
    /// Not-null check.
    IsNotNull,
}

/// A single filter condition on a named field.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterField {
    /// The column or field name to filter on.
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against. Ignored by the null checks.
    pub value: TypedValue,
}

impl FilterField {
    /// Create a new filter field.
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<TypedValue>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Shorthand for an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<TypedValue>) -> Self {
        Self::new(field, FilterOp::Eq, value)
    }

    /// Shorthand for a case-insensitive substring filter.
    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::new(field, FilterOp::Contains, TypedValue::String(needle.into()))
    }

    /// Shorthand for a null check.
    pub fn is_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOp::IsNull, TypedValue::Json(serde_json::Value::Null))
    }
}
