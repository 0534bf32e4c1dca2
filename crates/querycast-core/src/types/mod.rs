//! Core type definitions used across the QueryCast workspace.

pub mod filter;
pub mod pagination;
pub mod sorting;
pub mod value;

use std::collections::BTreeMap;

pub use filter::{FilterField, FilterOp};
pub use pagination::{Page, PageRequest, PaginationParams};
pub use sorting::{Sort, SortClause, SortDirection, UnknownDirection};
pub use value::{FieldType, TypedValue};

/// Untrusted, string-keyed request parameters.
pub type RawParams = serde_json::Map<String, serde_json::Value>;

/// Declared parameter types, keyed by field name.
pub type ParamTypes = BTreeMap<String, FieldType>;

/// Typed filter values, keyed by field name.
pub type Filters = BTreeMap<String, TypedValue>;

/// Whether `name` is usable as a field or column identifier: ASCII
/// alphanumerics, `_`, and `.` for qualified names, not starting with a
/// digit or a dot.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    !name.ends_with('.')
        && !name.contains("..")
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}
