//! Offset pagination value objects.

use serde::Serialize;

/// Which slice of a result set to fetch: a 0-based page number and a
/// positive page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_number: u64,
    page_size: u64,
}

impl PageRequest {
    /// Returns `None` when `page_size` is zero.
    pub fn of(page_number: u64, page_size: u64) -> Option<Self> {
        (page_size > 0).then_some(Self {
            page_number,
            page_size,
        })
    }

    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Number of rows to skip before this page starts.
    pub fn offset(&self) -> u64 {
        self.page_number.saturating_mul(self.page_size)
    }
}

/// One page of results together with the totals of the whole result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    content: Vec<T>,
    page_number: u64,
    page_size: u64,
    total_elements: u64,
    total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            page_number: request.page_number,
            page_size: request.page_size,
            total_elements,
            total_pages: total_pages(total_elements, request.page_size),
        }
    }

    /// Cut the requested page out of an already ordered, complete result set.
    pub fn from_ordered(items: Vec<T>, request: PageRequest) -> Self {
        let total = items.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(request.page_size).unwrap_or(usize::MAX);
        let content = items.into_iter().skip(offset).take(size).collect();
        Self::new(content, request, total)
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    /// 0-based.
    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// `ceil(total / page_size)`; zero for an empty result set.
pub fn total_pages(total_elements: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_elements.div_ceil(page_size)
}
