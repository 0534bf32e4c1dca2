//! Repository executing [`SqlQuery`] values against PostgreSQL.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};
use tracing::debug;

use querycast_core::error::{AppError, ErrorKind};
use querycast_core::result::AppResult;
use querycast_core::traits::QueryRepository;
use querycast_core::types::{Page, PageRequest};

use crate::query::SqlQuery;

/// Runs composed queries and decodes rows into `T`.
pub struct PgRepository<T> {
    pool: PgPool,
    _record: PhantomData<fn() -> T>,
}

impl<T> PgRepository<T> {
    /// Create a repository on an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl<T> Clone for PgRepository<T> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

impl<T> std::fmt::Debug for PgRepository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgRepository")
            .field("record", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<T> QueryRepository for PgRepository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin + 'static,
{
    type Query = SqlQuery;
    type Record = T;

    async fn all(&self, query: SqlQuery) -> AppResult<Vec<T>> {
        let mut select = query.select()?;
        debug!(table = query.table(), sql = select.sql(), "Executing query");

        select
            .build_query_as::<T>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to execute query", e))
    }

    async fn paginate(&self, query: SqlQuery, page: &PageRequest) -> AppResult<Page<T>> {
        let mut count = query.count()?;
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count rows", e))?;

        let mut select = query.select_page(page.limit(), page.offset())?;
        debug!(
            table = query.table(),
            sql = select.sql(),
            total,
            page = page.page,
            page_size = page.page_size,
            "Executing paginated query"
        );

        let entries = select
            .build_query_as::<T>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to fetch page", e))?;

        Ok(Page::new(entries, page, u64::try_from(total).unwrap_or(0)))
    }
}
