use serde::Serialize;
use std::future::Future;

use crate::error::Result;

/// Represents pagination parameters for SQL queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Pagination {
    /// Create pagination with only limit
    pub fn limit_only(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            offset: None,
        }
    }

    /// Create pagination with only offset
    pub fn offset_only(offset: u64) -> Self {
        Self {
            limit: None,
            offset: Some(offset),
        }
    }

    /// Create pagination with both limit and offset
    pub fn limit_offset(limit: u64, offset: u64) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        let mut sql = String::new();

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        sql
    }

    /// Applies the window to an already ordered row set
    pub fn apply<T>(&self, rows: Vec<T>) -> Vec<T> {
        let skip = usize::try_from(self.offset.unwrap_or(0)).unwrap_or(usize::MAX);
        let take = self
            .limit
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));
        rows.into_iter().skip(skip).take(take).collect()
    }
}

/// Zero-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    /// A size of zero is bumped to one
    pub fn of(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.max(1),
        }
    }

    pub fn of_size(size: u32) -> Self {
        Self::of(0, size)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    pub fn next(&self) -> Self {
        Self::of(self.page.saturating_add(1), self.size)
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::limit_offset(u64::from(self.size), self.offset())
    }
}

/// One page of results plus the total across all pages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
        }
    }

    /// Builds the page, running `count` only when the total can't be read off
    /// the content: a first page shorter than the page size, or a non-empty
    /// page shorter than the page size further in, already tells the total.
    pub async fn with_lazy_total<F, Fut>(
        content: Vec<T>,
        request: PageRequest,
        count: F,
    ) -> Result<Self>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<u64>>,
    {
        let len = content.len() as u64;
        let size = u64::from(request.size);
        let total = if request.offset() == 0 && len < size {
            len
        } else if len != 0 && len < size {
            request.offset() + len
        } else {
            count().await?
        };
        Ok(Self::new(content, request, total))
    }

    pub fn total_pages(&self) -> u64 {
        self.total_elements.div_ceil(u64::from(self.size.max(1)))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) + 1 < self.total_pages()
    }

    pub fn is_first(&self) -> bool {
        self.page == 0
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_limit_offset() {
        let pagination = Pagination::limit_offset(10, 20);
        assert_eq!(pagination.to_sql(), " LIMIT 10 OFFSET 20");
    }

    #[test]
    fn test_limit_only() {
        let pagination = Pagination::limit_only(5);
        assert_eq!(pagination.offset, None);
        assert_eq!(pagination.to_sql(), " LIMIT 5");
    }

    #[test]
    fn test_offset_only() {
        let pagination = Pagination::offset_only(15);
        assert_eq!(pagination.limit, None);
        assert_eq!(pagination.to_sql(), " OFFSET 15");
    }

    #[test]
    fn test_apply_window() {
        let rows: Vec<u32> = (0..10).collect();
        assert_eq!(Pagination::limit_offset(3, 4).apply(rows.clone()), vec![4, 5, 6]);
        assert_eq!(Pagination::offset_only(8).apply(rows.clone()), vec![8, 9]);
        assert!(Pagination::offset_only(20).apply(rows).is_empty());
    }

    #[test]
    fn test_page_request_offset() {
        let request = PageRequest::of(2, 10);
        assert_eq!(request.offset(), 20);
        assert_eq!(request.next().offset(), 30);
        assert_eq!(PageRequest::of(0, 0).size, 1);
    }

    #[test]
    fn test_page_navigation() {
        let page = Page::new(vec![1, 2, 3], PageRequest::of(0, 3), 4);
        assert_eq!(page.total_pages(), 2);
        assert!(page.has_next());
        assert!(page.is_first());
        assert!(!page.is_last());
        assert_eq!(page.map(|v| v * 2).content, vec![2, 4, 6]);
    }

    #[test]
    fn test_lazy_total_skips_count_on_short_first_page() {
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let page = tokio_test::block_on(Page::with_lazy_total(
            vec![1, 2],
            PageRequest::of(0, 5),
            move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(99)
            },
        ))
        .unwrap();
        assert_eq!(page.total_elements, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_lazy_total_derives_from_short_last_page() {
        let page = tokio_test::block_on(Page::with_lazy_total(
            vec![7],
            PageRequest::of(2, 3),
            || async { Ok(99) },
        ))
        .unwrap();
        assert_eq!(page.total_elements, 7);
    }

    #[test]
    fn test_lazy_total_counts_full_page() {
        let page = tokio_test::block_on(Page::with_lazy_total(
            vec![1, 2, 3],
            PageRequest::of(0, 3),
            || async { Ok(4) },
        ))
        .unwrap();
        assert_eq!(page.total_elements, 4);
    }
}
