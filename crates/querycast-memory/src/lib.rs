//! # querycast-memory
//!
//! In-memory backend: a [`MemoryQuery`] that collects predicates and
//! ordering clauses, and a [`MemoryRepository`] that evaluates it over a
//! fixed list of records. Useful for tests and for small, static datasets.

pub mod query;
pub mod record;
pub mod repository;

pub use query::{MemoryPredicate, MemoryQuery};
pub use record::Record;
pub use repository::MemoryRepository;
