//! Pagination types.

use serde::{Deserialize, Serialize};

/// A fully specified page request. Both fields are 1-based and positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub page_size: u64,
}

impl PageRequest {
    /// Create a page request. Callers are expected to pass positive values;
    /// the builder validates before constructing one.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self { page, page_size }
    }

    /// Calculate the SQL `OFFSET` value.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Return the SQL `LIMIT` value.
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

/// Possibly partial pagination input, as supplied by a caller.
///
/// Only the empty and the complete shapes are accepted by the builder; a
/// half-filled value is reported as a validation error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Requested page number.
    #[serde(default)]
    pub page: Option<u64>,
    /// Requested page size.
    #[serde(default)]
    pub page_size: Option<u64>,
}

impl PaginationParams {
    /// Empty input: clears pagination.
    pub fn none() -> Self {
        Self::default()
    }

    /// Complete input.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }

    /// Whether neither field is set.
    pub fn is_empty(&self) -> bool {
        self.page.is_none() && self.page_size.is_none()
    }

    /// Fill fields absent here from `defaults`. Present fields always win.
    pub fn or(self, defaults: Self) -> Self {
        Self {
            page: self.page.or(defaults.page),
            page_size: self.page_size.or(defaults.page_size),
        }
    }
}

impl From<PageRequest> for PaginationParams {
    fn from(page: PageRequest) -> Self {
        Self::new(page.page, page.page_size)
    }
}

impl From<Option<PageRequest>> for PaginationParams {
    fn from(page: Option<PageRequest>) -> Self {
        page.map(Self::from).unwrap_or_default()
    }
}

/// One page of results, as returned by a repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The records on this page.
    pub entries: Vec<T>,
    /// Current page number (1-based).
    pub page: u64,
    /// Number of records per page.
    pub page_size: u64,
    /// Total number of records across all pages.
    pub total_entries: u64,
    /// Total number of pages.
    pub total_pages: u64,
    /// Whether there is a next page.
    pub has_next: bool,
    /// Whether there is a previous page.
    pub has_previous: bool,
}

impl<T> Page<T> {
    /// Create a page from its entries and the overall record count.
    pub fn new(entries: Vec<T>, request: &PageRequest, total_entries: u64) -> Self {
        let page_size = request.page_size.max(1);
        let total_pages = if total_entries == 0 {
            1
        } else {
            total_entries.div_ceil(page_size)
        };
        Self {
            entries,
            page: request.page,
            page_size: request.page_size,
            total_entries,
            total_pages,
            has_next: request.page < total_pages,
            has_previous: request.page > 1,
        }
    }

    /// Create an empty page.
    pub fn empty(request: &PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_limit() {
        let page = PageRequest::new(3, 20);
        assert_eq!(page.offset(), 40);
        assert_eq!(page.limit(), 20);
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
    }

    #[test]
    fn test_page_totals() {
        let page = Page::new(vec![1, 2], &PageRequest::new(2, 2), 5);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
        assert!(page.has_previous);

        let empty: Page<u8> = Page::empty(&PageRequest::new(1, 10));
        assert_eq!(empty.total_pages, 1);
        assert!(!empty.has_next);
    }

    #[test]
    fn test_params_or_is_field_level() {
        let current = PaginationParams {
            page: Some(3),
            page_size: None,
        };
        let merged = current.or(PaginationParams::new(1, 50));
        assert_eq!(merged, PaginationParams::new(3, 50));

        let merged = PaginationParams::new(3, 20).or(PaginationParams::new(1, 50));
        assert_eq!(merged, PaginationParams::new(3, 20));
    }
}
