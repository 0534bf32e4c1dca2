//! Repository trait consumed by the fetcher.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::traits::queryable::Queryable;
use crate::types::pagination::{Page, PageRequest};

/// Executes composed queries.
///
/// Implementations own timeouts, retries and connection handling; errors
/// are returned as-is to whoever called `fetch`.
#[async_trait]
pub trait QueryRepository: Send + Sync + 'static {
    /// The query type this repository executes.
    type Query: Queryable;
    /// The record type produced.
    type Record: Send + 'static;

    /// Execute the query and return every matching record.
    async fn all(&self, query: Self::Query) -> AppResult<Vec<Self::Record>>;

    /// Execute the query and return one page of matching records.
    async fn paginate(
        &self,
        query: Self::Query,
        page: &PageRequest,
    ) -> AppResult<Page<Self::Record>>;
}
