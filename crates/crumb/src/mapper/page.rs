use super::Mapper;

/// One page of results from [`Mapper::paginate`].
#[derive(Debug, Clone)]
pub struct Page {
    /// The rows of this page.
    pub subset: Mapper,

    /// Number of matching rows across all pages.
    pub total: u64,

    pub pages: u64,

    /// 1-based page number, as requested.
    pub page: u64,

    /// 1-based position of the first row of the page.
    pub start: u64,

    /// Position of the last row; `start - 1` for a page past the end.
    pub end: u64,

    /// Number of rows on this page.
    pub count: u64,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
