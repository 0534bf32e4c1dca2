//! Collaborator traits defined in `querycast-core` and implemented by the
//! backend crates.

pub mod queryable;
pub mod repository;

pub use queryable::Queryable;
pub use repository::QueryRepository;
