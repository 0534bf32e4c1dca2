//! # querycast-core
//!
//! Core crate for QueryCast. Contains the collaborator traits (queryable
//! values and repositories), configuration schemas, typed values,
//! pagination/sorting/filter types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other QueryCast crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
