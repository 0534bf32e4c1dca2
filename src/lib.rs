//! # querycast
//!
//! Typed request-parameter casting and query composition.
//!
//! Untyped parameters go in together with a schema of expected field types.
//! Out come typed filters, a validated sort, optional pagination and a
//! query composed from per-field filter and sort functions, ready to run
//! against a repository.
//!
//! This crate re-exports the workspace crates:
//!
//! - [`config`], [`error`], [`traits`] and [`types`] from the core crate
//! - [`builder`]: the caster, sort grammar and [`QueryBuilder`]
//! - [`memory`]: the in-memory backend
//! - [`database`]: the PostgreSQL backend

pub mod logging;

pub use querycast_builder as builder;
pub use querycast_database as database;
pub use querycast_memory as memory;

pub use querycast_builder::{
    BuildOptions, Fetched, QueryBuilder, SchemaCaster, SortError, TypedValueCaster, Validation,
};
pub use querycast_core::{config, error, traits, types};

pub use querycast_core::config::QueryCastConfig;
pub use querycast_core::types::{
    FieldType, Page, PageRequest, PaginationParams, ParamTypes, RawParams, Sort, SortClause,
    SortDirection, TypedValue,
};
pub use querycast_core::{AppError, AppResult};
