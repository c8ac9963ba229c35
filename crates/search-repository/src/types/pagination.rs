//! Pagination types for repository results.
//!
//! A [`PageRequest`] describes one slice of an ordered result set by page
//! index, page size and sort orders. A [`Page`] carries the items of that
//! slice together with the total number of matches.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Ascending,
    /// Descending order.
    Descending,
}

impl SortDirection {
    /// Returns the engine keyword for this direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    /// Returns true for ascending order.
    pub fn is_ascending(&self) -> bool {
        matches!(self, SortDirection::Ascending)
    }
}

/// A single sort order on an entity property.
///
/// Properties are named the way the entity names them (camelCase); they are
/// translated to index field names when the request is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    /// The entity property to sort by.
    pub property: String,
    /// The sort direction.
    pub direction: SortDirection,
}

impl SortOrder {
    /// Creates an order with an explicit direction.
    pub fn new(property: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            property: property.into(),
            direction,
        }
    }

    /// Ascending order on `property`.
    pub fn asc(property: impl Into<String>) -> Self {
        Self::new(property, SortDirection::Ascending)
    }

    /// Descending order on `property`.
    pub fn desc(property: impl Into<String>) -> Self {
        Self::new(property, SortDirection::Descending)
    }

    /// Parses a sort expression (e.g., "-createdAt" for descending).
    pub fn parse(s: &str) -> Self {
        match s.strip_prefix('-') {
            Some(stripped) => Self::desc(stripped),
            None => Self::asc(s.strip_prefix('+').unwrap_or(s)),
        }
    }
}

/// An ordered list of sort orders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    orders: Vec<SortOrder>,
}

impl Sort {
    /// No sort orders.
    pub fn unsorted() -> Self {
        Self::default()
    }

    /// Sort by the given orders, in priority order.
    pub fn by(orders: impl IntoIterator<Item = SortOrder>) -> Self {
        Self {
            orders: orders.into_iter().collect(),
        }
    }

    /// Parses a comma-separated list of sort expressions ("-createdAt,id").
    ///
    /// Blank segments are ignored.
    pub fn parse(s: &str) -> Self {
        Self::by(
            s.split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty() && *part != "-" && *part != "+")
                .map(SortOrder::parse),
        )
    }

    /// Appends an order with lower priority than the existing ones.
    pub fn and(mut self, order: SortOrder) -> Self {
        self.orders.push(order);
        self
    }

    /// Returns the highest-priority order, if any.
    pub fn first(&self) -> Option<&SortOrder> {
        self.orders.first()
    }

    /// Returns all orders.
    pub fn orders(&self) -> &[SortOrder] {
        &self.orders
    }

    /// Returns true if at least one order is present.
    pub fn is_sorted(&self) -> bool {
        !self.orders.is_empty()
    }
}

/// A request for one page of results.
///
/// Deserialization goes through [`PageRequest::of`], so a decoded request
/// never has a zero page size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPageRequest")]
pub struct PageRequest {
    page: u32,
    size: u32,
    sort: Sort,
}

/// Wire form of [`PageRequest`] before validation.
#[derive(Deserialize)]
struct RawPageRequest {
    #[serde(default)]
    page: u32,
    #[serde(default = "default_page_size")]
    size: u32,
    #[serde(default)]
    sort: Sort,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = ConfigError;

    fn try_from(raw: RawPageRequest) -> Result<Self, Self::Error> {
        Ok(Self::of(raw.page, raw.size)?.with_sort(raw.sort))
    }
}

impl PageRequest {
    /// Creates a request for the zero-based `page` holding `size` items.
    pub fn of(page: u32, size: u32) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(Self {
            page,
            size,
            sort: Sort::unsorted(),
        })
    }

    /// Creates a request for the first page.
    pub fn first(size: u32) -> Result<Self, ConfigError> {
        Self::of(0, size)
    }

    /// Sets the sort orders.
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Returns the zero-based page index.
    pub fn page_number(&self) -> u32 {
        self.page
    }

    /// Returns the page size.
    pub fn page_size(&self) -> u32 {
        self.size
    }

    /// Returns the sort orders.
    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    /// Returns the number of items preceding this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    /// Returns the request for the following page.
    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            size: self.size,
            sort: self.sort.clone(),
        }
    }

    /// Returns the request for the preceding page, or this one if it is the first.
    pub fn previous_or_first(&self) -> Self {
        Self {
            page: self.page.saturating_sub(1),
            size: self.size,
            sort: self.sort.clone(),
        }
    }

    /// Returns true if there are pages before this one.
    pub fn has_previous(&self) -> bool {
        self.page > 0
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: Sort::unsorted(),
        }
    }
}

/// A page of entities.
///
/// `total` is the match count reported by a separate count request; it is not
/// guaranteed to be consistent with the items fetched for this page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items in this page.
    pub items: Vec<T>,

    /// Total number of matches across all pages.
    pub total: u64,

    /// The request this page answers.
    pub request: PageRequest,

    /// Hits that were returned but could not be decoded.
    #[serde(default)]
    pub skipped: usize,
}

impl<T> Page<T> {
    /// Creates a page.
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            total,
            request,
            skipped: 0,
        }
    }

    /// Creates an empty page with no matches.
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    /// Records the number of hits dropped while decoding.
    pub fn with_skipped(mut self, skipped: usize) -> Self {
        self.skipped = skipped;
        self
    }

    /// Returns the total number of matches.
    pub fn total_elements(&self) -> u64 {
        self.total
    }

    /// Returns the number of pages needed to hold all matches.
    pub fn total_pages(&self) -> u64 {
        match self.request.page_size() {
            0 => 0,
            size => self.total.div_ceil(u64::from(size)),
        }
    }

    /// Returns the zero-based index of this page.
    pub fn number(&self) -> u32 {
        self.request.page_number()
    }

    /// Returns the requested page size.
    pub fn size(&self) -> u32 {
        self.request.page_size()
    }

    /// Returns the number of items actually in this page.
    pub fn number_of_elements(&self) -> usize {
        self.items.len()
    }

    /// Returns true if another page follows this one.
    pub fn has_next(&self) -> bool {
        u64::from(self.number()) + 1 < self.total_pages()
    }

    /// Returns true if a page precedes this one.
    pub fn has_previous(&self) -> bool {
        self.request.has_previous()
    }

    /// Returns true if this is the first page.
    pub fn is_first(&self) -> bool {
        !self.has_previous()
    }

    /// Returns true if this is the last page.
    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    /// Returns the request for the next page, if there is one.
    pub fn next_request(&self) -> Option<PageRequest> {
        self.has_next().then(|| self.request.next())
    }

    /// Returns true if this page has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Maps the items to a different type.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
            skipped: self.skipped,
        }
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::parse("-createdAt"), SortOrder::desc("createdAt"));
        assert_eq!(SortOrder::parse("createdAt"), SortOrder::asc("createdAt"));
        assert_eq!(SortOrder::parse("+id"), SortOrder::asc("id"));
    }

    #[test]
    fn test_sort_parse_list() {
        let sort = Sort::parse("-createdAt, id,,");
        assert_eq!(
            sort.orders(),
            &[SortOrder::desc("createdAt"), SortOrder::asc("id")]
        );
        assert_eq!(sort.first(), Some(&SortOrder::desc("createdAt")));
        assert!(!Sort::parse("").is_sorted());
    }

    #[test]
    fn test_page_request_rejects_zero_size() {
        assert!(matches!(
            PageRequest::of(0, 0),
            Err(ConfigError::ZeroPageSize)
        ));
    }

    #[test]
    fn test_page_request_deserialize_rejects_zero_size() {
        let err = serde_json::from_str::<PageRequest>(r#"{"page":0,"size":0}"#).unwrap_err();
        assert!(err.to_string().contains("page size must be greater than zero"));
    }

    #[test]
    fn test_total_pages_with_zero_size() {
        let request = PageRequest {
            page: 0,
            size: 0,
            sort: Sort::unsorted(),
        };
        let page: Page<u32> = Page::new(Vec::new(), request, 5);
        assert_eq!(page.total_pages(), 0);
        assert!(page.is_last());
        assert!(page.next_request().is_none());
    }

    #[test]
    fn test_page_request_deserialize() {
        let request: PageRequest = serde_json::from_str(
            r#"{"page":2,"size":15,"sort":{"orders":[{"property":"createdAt","direction":"Descending"}]}}"#,
        )
        .unwrap();
        assert_eq!(request.page_number(), 2);
        assert_eq!(request.page_size(), 15);
        assert_eq!(request.sort().first(), Some(&SortOrder::desc("createdAt")));

        let defaulted: PageRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(defaulted, PageRequest::default());

        let round_trip: PageRequest =
            serde_json::from_value(serde_json::to_value(&request).unwrap()).unwrap();
        assert_eq!(round_trip, request);
    }

    #[test]
    fn test_page_request_offset() {
        let request = PageRequest::of(3, 25).unwrap();
        assert_eq!(request.offset(), 75);
        assert_eq!(request.next().offset(), 100);
        assert_eq!(request.previous_or_first().page_number(), 2);
        assert_eq!(
            PageRequest::first(10).unwrap().previous_or_first().page_number(),
            0
        );
    }

    #[test]
    fn test_page_request_default() {
        let request = PageRequest::default();
        assert_eq!(request.page_number(), 0);
        assert_eq!(request.page_size(), DEFAULT_PAGE_SIZE);
        assert!(!request.sort().is_sorted());
    }

    #[test]
    fn test_page_metadata() {
        let first = Page::new(vec![1; 10], PageRequest::first(10).unwrap(), 25);
        assert_eq!(first.total_pages(), 3);
        assert!(first.is_first());
        assert!(first.has_next());
        assert!(!first.has_previous());
        assert_eq!(first.next_request().map(|r| r.page_number()), Some(1));

        let last = Page::new(vec![1; 5], PageRequest::of(2, 10).unwrap(), 25);
        assert!(last.is_last());
        assert!(last.has_previous());
        assert_eq!(last.number_of_elements(), 5);
        assert!(last.next_request().is_none());
    }

    #[test]
    fn test_empty_page() {
        let page: Page<String> = Page::empty(PageRequest::default());
        assert!(page.is_empty());
        assert_eq!(page.total_pages(), 0);
        assert!(page.is_first());
        assert!(page.is_last());
    }

    #[test]
    fn test_page_map() {
        let page = Page::new(vec![1, 2, 3], PageRequest::first(3).unwrap(), 9).with_skipped(1);
        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.items, vec![10, 20, 30]);
        assert_eq!(mapped.total, 9);
        assert_eq!(mapped.skipped, 1);
    }
}
