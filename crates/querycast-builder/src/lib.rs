//! # querycast-builder
//!
//! Turns untyped request parameters into a validated, typed description of
//! a query (filters, sort, pagination) and composes it onto a base query
//! through per-field filter and sort functions.
//!
//! ```text
//! raw params ──cast──▶ Validation ──derive──▶ QueryBuilder ──query()──▶ Q
//!                                                  │
//!                                                  └──fetch()──▶ repository
//! ```
//!
//! Every mutation on [`QueryBuilder`] returns a new value; validation
//! problems never surface as `Err`, they are recorded on the builder.

pub mod builder;
pub mod cast;
pub mod compose;
pub mod fetch;
pub mod sort;
pub mod validation;
pub mod validators;

pub use builder::{BuildOptions, CustomValidator, FilterFn, QueryBuilder, SortFn};
pub use cast::{SchemaCaster, TypedValueCaster};
pub use fetch::Fetched;
pub use sort::{SortError, parse_sort, validate_sort};
pub use validation::{FieldError, Validation};

/// Reserved parameter carrying the sort wire format.
pub const SORT_PARAM: &str = "sort";
/// Reserved parameter carrying the page number.
pub const PAGE_PARAM: &str = "page";
/// Reserved parameter carrying the page size.
pub const PAGE_SIZE_PARAM: &str = "page_size";

/// Whether `field` is one of the reserved parameters.
pub fn is_reserved(field: &str) -> bool {
    matches!(field, SORT_PARAM | PAGE_PARAM | PAGE_SIZE_PARAM)
}
