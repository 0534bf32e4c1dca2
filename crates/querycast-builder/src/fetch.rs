//! Execution of a composed query against the builder's repository.

use querycast_core::result::AppResult;
use querycast_core::traits::QueryRepository;
use querycast_core::types::Page;
use tracing::debug;

use crate::builder::QueryBuilder;

/// Result of [`QueryBuilder::fetch`].
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    /// Every matching record; no pagination was requested.
    All(Vec<T>),
    /// One page of matching records.
    Page(Page<T>),
}

impl<T> Fetched<T> {
    /// The fetched records.
    pub fn entries(&self) -> &[T] {
        match self {
            Self::All(entries) => entries,
            Self::Page(page) => &page.entries,
        }
    }

    /// Consume into the fetched records.
    pub fn into_entries(self) -> Vec<T> {
        match self {
            Self::All(entries) => entries,
            Self::Page(page) => page.entries,
        }
    }

    /// Page metadata, when the fetch was paginated.
    pub fn page(&self) -> Option<&Page<T>> {
        match self {
            Self::All(_) => None,
            Self::Page(page) => Some(page),
        }
    }
}

impl<R: QueryRepository> QueryBuilder<R> {
    /// Compose the query and run it.
    ///
    /// Without pagination every record is returned, otherwise one page.
    /// Validity is not checked here; repository errors are returned as-is.
    pub async fn fetch(&self) -> AppResult<Fetched<R::Record>> {
        let query = self.query();
        match self.pagination {
            None => {
                debug!(filters = self.filters.len(), sort = self.sort.len(), "Fetching all records");
                let entries = self.repo.all(query).await?;
                Ok(Fetched::All(entries))
            }
            Some(page) => {
                debug!(
                    filters = self.filters.len(),
                    sort = self.sort.len(),
                    page = page.page,
                    page_size = page.page_size,
                    "Fetching page"
                );
                let page = self.repo.paginate(query, &page).await?;
                Ok(Fetched::Page(page))
            }
        }
    }
}
