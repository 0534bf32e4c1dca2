//! In-memory repository.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use querycast_core::result::AppResult;
use querycast_core::traits::QueryRepository;
use querycast_core::types::{Page, PageRequest};

use crate::query::MemoryQuery;
use crate::record::Record;

/// Repository over a fixed list of records.
#[derive(Debug, Clone)]
pub struct MemoryRepository<T> {
    records: Arc<Vec<T>>,
}

impl<T> MemoryRepository<T> {
    /// Create a repository holding `records`.
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record is stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl<T> QueryRepository for MemoryRepository<T>
where
    T: Record + Clone + Send + Sync + 'static,
{
    type Query = MemoryQuery<T>;
    type Record = T;

    async fn all(&self, query: MemoryQuery<T>) -> AppResult<Vec<T>> {
        let matched = query.run(&self.records);
        debug!(
            scanned = self.records.len(),
            matched = matched.len(),
            "In-memory query executed"
        );
        Ok(matched)
    }

    async fn paginate(&self, query: MemoryQuery<T>, page: &PageRequest) -> AppResult<Page<T>> {
        let matched = query.run(&self.records);
        let total = matched.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);

        let entries: Vec<T> = matched.into_iter().skip(offset).take(limit).collect();
        debug!(
            scanned = self.records.len(),
            total,
            page = page.page,
            returned = entries.len(),
            "In-memory page executed"
        );
        Ok(Page::new(entries, page, total))
    }
}
