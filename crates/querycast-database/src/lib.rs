//! # querycast-database
//!
//! PostgreSQL backend: connection pool management, a [`SqlQuery`]
//! queryable rendered through `sqlx::QueryBuilder`, and the
//! [`PgRepository`] that executes it.

pub mod connection;
pub mod query;
pub mod repository;

pub use connection::DatabasePool;
pub use query::SqlQuery;
pub use repository::PgRepository;
