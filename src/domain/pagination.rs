//! Offset pagination shared by list operations

/// Page size used when the caller asks for a non-positive one
pub const FALLBACK_PER_PAGE: u64 = 20;

/// A normalized page request: both values are at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    per_page: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 1,
        }
    }
}

impl PageRequest {
    /// Clamp caller-supplied values into a usable request.
    ///
    /// Pages below 1 become page 1 and a page size below 1 falls back to
    /// [`FALLBACK_PER_PAGE`]; out-of-range pages are never an error.
    pub fn new(page: i64, per_page: i64) -> Self {
        let page = u64::try_from(page).ok().filter(|p| *p >= 1).unwrap_or(1);
        let per_page = u64::try_from(per_page)
            .ok()
            .filter(|p| *p >= 1)
            .unwrap_or(FALLBACK_PER_PAGE);

        Self { page, per_page }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Number of items to skip
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// One page of items plus the total it was cut from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    /// Total number of pages; zero when there are no items at all
    pub fn pages(&self) -> u64 {
        self.total.div_ceil(self.request.per_page())
    }

    pub fn current_page(&self) -> u64 {
        self.request.page()
    }

    /// Map items while keeping the page metadata
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }
}
