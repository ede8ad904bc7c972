//! Numbered page requests and page envelopes for listing endpoints.
//!
//! Listing endpoints fetch one row more than the page size so they can tell
//! whether a following page exists without issuing a separate count query.
//! [`PageRequest::fetch_limit`] returns that probe size and
//! [`Page::from_probe`] trims the extra row again.

use std::num::NonZeroUsize;

use serde::Serialize;

/// Largest page size accepted by [`PageSize::new`].
pub const MAX_PAGE_SIZE: usize = 100;

/// Errors raised while building page requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    /// Page size was zero.
    #[error("page size must be positive")]
    ZeroSize,
    /// Page size exceeded [`MAX_PAGE_SIZE`].
    #[error("page size {size} exceeds the maximum of {max}")]
    SizeTooLarge {
        /// Requested size.
        size: usize,
        /// Largest accepted size.
        max: usize,
    },
    /// Page numbers are 1-based.
    #[error("page number must be at least 1")]
    ZeroNumber,
}

/// Validated number of items per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "usize")]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    /// Ten items per page.
    pub const DEFAULT: Self = Self(NonZeroUsize::MIN.saturating_add(9));

    /// Validate a page size.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::ZeroSize`] for zero and
    /// [`PageError::SizeTooLarge`] above [`MAX_PAGE_SIZE`].
    ///
    /// # Examples
    /// ```
    /// use pagination::PageSize;
    ///
    /// let size = PageSize::new(10).expect("valid size");
    /// assert_eq!(size.get(), 10);
    /// assert!(PageSize::new(0).is_err());
    /// ```
    pub fn new(size: usize) -> Result<Self, PageError> {
        if size > MAX_PAGE_SIZE {
            return Err(PageError::SizeTooLarge {
                size,
                max: MAX_PAGE_SIZE,
            });
        }
        NonZeroUsize::new(size).map(Self).ok_or(PageError::ZeroSize)
    }

    /// Number of items per page.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl From<PageSize> for usize {
    fn from(value: PageSize) -> Self {
        value.get()
    }
}

/// Request for one numbered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    number: NonZeroUsize,
    size: PageSize,
}

impl PageRequest {
    /// Request the first page.
    #[must_use]
    pub const fn first(size: PageSize) -> Self {
        Self {
            number: NonZeroUsize::MIN,
            size,
        }
    }

    /// Request page `number` (1-based).
    ///
    /// # Errors
    ///
    /// Returns [`PageError::ZeroNumber`] when `number` is zero.
    pub fn new(number: usize, size: PageSize) -> Result<Self, PageError> {
        let number = NonZeroUsize::new(number).ok_or(PageError::ZeroNumber)?;
        Ok(Self { number, size })
    }

    /// 1-based page number.
    #[must_use]
    pub const fn number(&self) -> usize {
        self.number.get()
    }

    /// Configured page size.
    #[must_use]
    pub const fn size(&self) -> PageSize {
        self.size
    }

    /// Number of rows to skip before this page starts.
    #[must_use]
    pub const fn offset(&self) -> usize {
        (self.number.get() - 1).saturating_mul(self.size.get())
    }

    /// Rows to fetch: one page plus a probe row for `has_next`.
    #[must_use]
    pub const fn fetch_limit(&self) -> usize {
        self.size.get().saturating_add(1)
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    number: usize,
    size: usize,
    has_next: bool,
}

impl<T> Page<T> {
    /// Build a page from rows fetched with [`PageRequest::fetch_limit`].
    ///
    /// # Examples
    /// ```
    /// use pagination::{Page, PageRequest, PageSize};
    ///
    /// let request = PageRequest::first(PageSize::new(2).expect("valid size"));
    /// let page = Page::from_probe(&request, vec![1, 2, 3]);
    /// assert_eq!(page.items(), &[1, 2]);
    /// assert!(page.has_next());
    /// ```
    #[must_use]
    pub fn from_probe(request: &PageRequest, mut rows: Vec<T>) -> Self {
        let size = request.size().get();
        let has_next = rows.len() > size;
        rows.truncate(size);
        Self {
            items: rows,
            number: request.number(),
            size,
            has_next,
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// 1-based page number.
    #[must_use]
    pub const fn number(&self) -> usize {
        self.number
    }

    /// Configured page size.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Whether a following page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.has_next
    }

    /// Consume the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}
