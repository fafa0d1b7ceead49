//! Page windowing and the pagination envelope.
//!
//! The metadata travels in the `Pagination` response header so the body
//! stays a plain JSON array.

use serde::{Deserialize, Serialize};

/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Page size used when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 6;

/// A 1-based page request, already clamped to valid bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_number: u32,
    page_size: u32,
}

impl PageRequest {
    /// Build a request, clamping the page number to at least 1 and the page
    /// size to `1..=MAX_PAGE_SIZE`. Missing values use the defaults.
    #[must_use]
    pub fn new(page_number: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page_number: page_number.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    #[must_use]
    pub const fn page_number(&self) -> u32 {
        self.page_number
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of items before this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page_number as usize - 1).saturating_mul(self.page_size as usize)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Describes where a page sits within the full result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaData {
    pub current_page: u32,
    pub total_pages: u32,
    pub page_size: u32,
    pub total_count: u32,
}

impl MetaData {
    /// Compute metadata for `total_count` items under `request`.
    #[must_use]
    pub fn new(total_count: u32, request: PageRequest) -> Self {
        Self {
            current_page: request.page_number(),
            total_pages: total_count.div_ceil(request.page_size()),
            page_size: request.page_size(),
            total_count,
        }
    }

    /// Header value form: compact camelCase JSON.
    #[must_use]
    pub fn to_header_value(&self) -> String {
        // Serializing four integers cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// One page of items plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    pub meta_data: MetaData,
}

impl<T> PagedList<T> {
    /// Window `items` to the page described by `request`.
    ///
    /// The total count is taken before windowing. Pages past the end yield
    /// an empty list rather than an error.
    #[must_use]
    pub fn paginate(items: Vec<T>, request: PageRequest) -> Self {
        let total_count = u32::try_from(items.len()).unwrap_or(u32::MAX);
        let meta_data = MetaData::new(total_count, request);
        let items = items
            .into_iter()
            .skip(request.offset())
            .take(request.page_size() as usize)
            .collect();
        Self { items, meta_data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: u32) -> Vec<u32> {
        (1..=n).collect()
    }

    #[test]
    fn test_request_defaults() {
        let req = PageRequest::default();
        assert_eq!(req.page_number(), 1);
        assert_eq!(req.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_request_clamps() {
        let req = PageRequest::new(Some(0), Some(500));
        assert_eq!(req.page_number(), 1);
        assert_eq!(req.page_size(), MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(Some(3), Some(0)).page_size(), 1);
    }

    #[test]
    fn test_second_page_of_twelve() {
        let page = PagedList::paginate(numbers(12), PageRequest::new(Some(2), Some(5)));
        assert_eq!(page.items, vec![6, 7, 8, 9, 10]);
        assert_eq!(
            page.meta_data,
            MetaData {
                current_page: 2,
                total_pages: 3,
                page_size: 5,
                total_count: 12,
            }
        );
    }

    #[test]
    fn test_last_page_is_partial() {
        let page = PagedList::paginate(numbers(12), PageRequest::new(Some(3), Some(5)));
        assert_eq!(page.items, vec![11, 12]);
    }

    #[test]
    fn test_page_beyond_range_is_empty() {
        let page = PagedList::paginate(numbers(12), PageRequest::new(Some(9), Some(5)));
        assert!(page.items.is_empty());
        assert_eq!(page.meta_data.total_count, 12);
        assert_eq!(page.meta_data.current_page, 9);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        for (count, size, pages) in [(0, 6, 0), (1, 6, 1), (6, 6, 1), (7, 6, 2), (50, 50, 1)] {
            let meta = MetaData::new(count, PageRequest::new(None, Some(size)));
            assert_eq!(meta.total_pages, pages, "{count} items / {size}");
        }
    }

    #[test]
    fn test_slice_never_exceeds_page_size() {
        for page_number in 1..=5 {
            let page = PagedList::paginate(numbers(23), PageRequest::new(Some(page_number), Some(6)));
            assert!(page.items.len() <= 6);
        }
    }

    #[test]
    fn test_header_value_is_camel_case_json() {
        let meta = MetaData::new(12, PageRequest::new(Some(2), Some(5)));
        assert_eq!(
            meta.to_header_value(),
            r#"{"currentPage":2,"totalPages":3,"pageSize":5,"totalCount":12}"#
        );
    }
}
