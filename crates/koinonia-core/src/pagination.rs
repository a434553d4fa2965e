//! Offset pagination for feed and comment listings.

use serde::{Deserialize, Serialize};

/// A request for a window of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Maximum number of items to return.
    pub limit: u32,
    /// Number of items to skip.
    pub offset: u32,
}

impl PageRequest {
    /// The default page size.
    pub const DEFAULT_LIMIT: u32 = 20;
    /// The maximum allowed page size.
    pub const MAX_LIMIT: u32 = 100;

    /// Creates a new page request. Callers validate the bounds.
    #[must_use]
    pub const fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// Creates a page request for the first page with default size.
    #[must_use]
    pub const fn first() -> Self {
        Self::new(Self::DEFAULT_LIMIT, 0)
    }

    /// Returns true when the limit is within `1..=MAX_LIMIT`.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.limit >= 1 && self.limit <= Self::MAX_LIMIT
    }

    /// Limit as a SQL bind value.
    #[must_use]
    pub fn sql_limit(&self) -> i64 {
        i64::from(self.limit)
    }

    /// Offset as a SQL bind value.
    #[must_use]
    pub fn sql_offset(&self) -> i64 {
        i64::from(self.offset)
    }

    /// Applies the window to an in-memory iterator.
    pub fn apply<I: Iterator>(&self, items: I) -> impl Iterator<Item = I::Item> {
        items.skip(self.offset as usize).take(self.limit as usize)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// Pagination metadata returned alongside a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
    /// True when the page came back full, so another page may exist.
    pub has_more: bool,
}

impl Pagination {
    /// Builds the metadata for a page that returned `returned` items.
    #[must_use]
    pub fn for_page(request: PageRequest, returned: usize) -> Self {
        Self {
            limit: request.limit,
            offset: request.offset,
            has_more: returned == request.limit as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page() {
        let page = PageRequest::default();
        assert_eq!(page.limit, 20);
        assert_eq!(page.offset, 0);
        assert!(page.is_valid());
    }

    #[test]
    fn test_limit_bounds() {
        assert!(!PageRequest::new(0, 0).is_valid());
        assert!(PageRequest::new(100, 0).is_valid());
        assert!(!PageRequest::new(101, 0).is_valid());
    }

    #[test]
    fn test_has_more_only_when_page_full() {
        let request = PageRequest::new(2, 0);
        assert!(Pagination::for_page(request, 2).has_more);
        assert!(!Pagination::for_page(request, 1).has_more);
    }

    #[test]
    fn test_apply_window() {
        let page = PageRequest::new(2, 1);
        let items: Vec<_> = page.apply(1..=5).collect();
        assert_eq!(items, vec![2, 3]);
    }

    #[test]
    fn test_pagination_serializes_camel_case() {
        let value = serde_json::to_value(Pagination::for_page(PageRequest::first(), 0)).unwrap();
        assert_eq!(value["hasMore"], false);
        assert_eq!(value["limit"], 20);
    }
}
