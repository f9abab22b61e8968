//! Page-number pagination shared by list endpoints.
//!
//! Clients request `page` (1-based) and `page_size`. Responses use a
//! stable envelope:
//!
//! ```json
//! {
//!   "count": 42,
//!   "page": 2,
//!   "page_size": 10,
//!   "total_pages": 5,
//!   "next": "/api/v1/products?page=3",
//!   "previous": "/api/v1/products?page=1",
//!   "results": []
//! }
//! ```
//!
//! The crate knows nothing about HTTP frameworks. Adapters pass the current
//! request URL to [`Page::with_links`] so `next`/`previous` keep every other
//! query parameter intact.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Page size used when the client does not supply one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound applied to client-supplied page sizes.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Query parameters accepted by paginated endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PageParams {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Requested number of items per page.
    pub page_size: Option<u32>,
}

/// Validation failures for pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// `page` was zero.
    #[error("page must be at least 1")]
    ZeroPage,
    /// `page_size` was zero.
    #[error("page_size must be at least 1")]
    ZeroPageSize,
}

impl PageRequestError {
    /// Name of the offending query parameter.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::ZeroPage => "page",
            Self::ZeroPageSize => "page_size",
        }
    }
}

/// Validated pagination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build a request from optional client values.
    ///
    /// Missing values fall back to page 1 and [`DEFAULT_PAGE_SIZE`]. Oversized
    /// page sizes are clamped to [`MAX_PAGE_SIZE`].
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when either value is zero.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageRequest, MAX_PAGE_SIZE};
    ///
    /// let request = PageRequest::new(Some(3), Some(500)).expect("valid");
    /// assert_eq!(request.page(), 3);
    /// assert_eq!(request.page_size(), MAX_PAGE_SIZE);
    /// ```
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Result<Self, PageRequestError> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(PageRequestError::ZeroPageSize);
        }
        Ok(Self {
            page,
            page_size: page_size.min(MAX_PAGE_SIZE),
        })
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Effective page size after clamping.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of items preceding this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }
}

impl TryFrom<PageParams> for PageRequest {
    type Error = PageRequestError;

    fn try_from(params: PageParams) -> Result<Self, Self::Error> {
        Self::new(params.page, params.page_size)
    }
}

/// One page of results plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of matching items across all pages.
    pub count: u64,
    /// 1-based page number.
    pub page: u32,
    /// Page size used to slice the results.
    pub page_size: u32,
    /// Number of pages needed to hold `count` items.
    pub total_pages: u64,
    /// Relative link (path and query) to the following page, if any.
    pub next: Option<String>,
    /// Relative link (path and query) to the preceding page, if any.
    pub previous: Option<String>,
    /// Items on this page.
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Wrap an already-sliced set of results.
    ///
    /// Links start empty; call [`Page::with_links`] to populate them.
    #[must_use]
    pub fn new(results: Vec<T>, count: u64, request: PageRequest) -> Self {
        Self {
            count,
            page: request.page(),
            page_size: request.page_size(),
            total_pages: count.div_ceil(u64::from(request.page_size())),
            next: None,
            previous: None,
            results,
        }
    }

    /// Slice a fully materialised, already-ordered collection.
    ///
    /// Requests past the final page yield an empty `results` list rather than
    /// an error.
    #[must_use]
    pub fn from_items(items: Vec<T>, request: PageRequest) -> Self {
        let count = items.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let results = items
            .into_iter()
            .skip(offset)
            .take(request.page_size() as usize)
            .collect();
        Self::new(results, count, request)
    }

    /// Whether another page follows this one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages
    }

    /// Whether a page precedes this one.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Populate `next`/`previous` from the URL of the current request.
    ///
    /// Links are relative (path plus query). Existing query parameters are
    /// preserved; only `page` is rewritten.
    ///
    /// # Examples
    /// ```
    /// use pagination::{Page, PageRequest};
    /// use url::Url;
    ///
    /// let request = PageRequest::new(Some(2), Some(1)).expect("valid");
    /// let page = Page::from_items(vec![1, 2, 3], request);
    /// let url = Url::parse("http://localhost/items?page=2&page_size=1&q=x").expect("url");
    /// let page = page.with_links(&url);
    /// assert_eq!(
    ///     page.next.as_deref(),
    ///     Some("/items?page_size=1&q=x&page=3"),
    /// );
    /// ```
    #[must_use]
    pub fn with_links(mut self, current: &Url) -> Self {
        self.next = self
            .has_next()
            .then(|| link_to_page(current, self.page + 1));
        self.previous = self
            .has_previous()
            .then(|| link_to_page(current, self.page - 1));
        self
    }

    /// Transform every result while keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

fn link_to_page(current: &Url, page: u32) -> String {
    let retained: Vec<(String, String)> = current
        .query_pairs()
        .filter(|(key, _)| key != "page")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    let mut link = current.clone();
    link.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair("page", &page.to_string());
    match link.query() {
        Some(query) => format!("{}?{query}", link.path()),
        None => link.path().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, 1, DEFAULT_PAGE_SIZE)]
    #[case(Some(4), Some(25), 4, 25)]
    #[case(Some(1), Some(MAX_PAGE_SIZE + 1), 1, MAX_PAGE_SIZE)]
    fn new_applies_defaults_and_clamps(
        #[case] page: Option<u32>,
        #[case] page_size: Option<u32>,
        #[case] expected_page: u32,
        #[case] expected_size: u32,
    ) {
        let request = PageRequest::new(page, page_size).expect("valid request");
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.page_size(), expected_size);
    }

    #[rstest]
    #[case(Some(0), None, PageRequestError::ZeroPage)]
    #[case(None, Some(0), PageRequestError::ZeroPageSize)]
    fn new_rejects_zero_values(
        #[case] page: Option<u32>,
        #[case] page_size: Option<u32>,
        #[case] expected: PageRequestError,
    ) {
        assert_eq!(PageRequest::new(page, page_size), Err(expected));
    }

    #[rstest]
    fn from_items_slices_requested_window() {
        let request = PageRequest::new(Some(2), Some(2)).expect("valid request");
        let page = Page::from_items((1..=5).collect(), request);

        assert_eq!(page.count, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.results, vec![3, 4]);
        assert!(page.has_next());
        assert!(page.has_previous());
    }

    #[rstest]
    fn page_beyond_end_is_empty() {
        let request = PageRequest::new(Some(9), Some(10)).expect("valid request");
        let page = Page::from_items(vec!["a"], request);

        assert!(page.results.is_empty());
        assert_eq!(page.count, 1);
        assert!(!page.has_next());
    }

    #[rstest]
    fn empty_collection_has_no_pages() {
        let page = Page::<u8>::from_items(Vec::new(), PageRequest::default());
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }

    #[rstest]
    fn links_preserve_other_query_parameters() {
        let request = PageRequest::new(Some(2), Some(1)).expect("valid request");
        let current =
            Url::parse("http://localhost/api/v1/sellers/nearby?lat=1.5&lng=2&page=2&page_size=1")
                .expect("valid url");
        let page = Page::from_items(vec![1, 2, 3], request).with_links(&current);

        assert_eq!(
            page.next.as_deref(),
            Some("/api/v1/sellers/nearby?lat=1.5&lng=2&page_size=1&page=3")
        );
        assert_eq!(
            page.previous.as_deref(),
            Some("/api/v1/sellers/nearby?lat=1.5&lng=2&page_size=1&page=1")
        );
    }

    #[rstest]
    fn envelope_serialises_with_snake_case_keys() {
        let page = Page::from_items(vec![1], PageRequest::default());
        let value = serde_json::to_value(&page).expect("serialise page");

        for key in ["count", "page", "page_size", "total_pages", "next", "previous", "results"] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
    }
}
