//! Core types for repository requests and results.
//!
//! - [`Query`], [`BoolQuery`], [`RangeQuery`] - Query predicates
//! - [`PageRequest`], [`Sort`], [`SortOrder`] - Page and sort requests
//! - [`Page`] - A page of decoded entities with its total match count
//!
//! # Examples
//!
//! ```
//! use helios_search_repository::types::{PageRequest, Query, Sort};
//!
//! let query = Query::bool()
//!     .must(Query::match_phrase("status", "shipped"))
//!     .filter(Query::range("total").gte(100))
//!     .build();
//!
//! let request = PageRequest::of(0, 10)
//!     .unwrap()
//!     .with_sort(Sort::parse("-createdAt"));
//!
//! assert_eq!(request.offset(), 0);
//! assert!(query.as_json()["bool"]["must"].is_array());
//! ```

mod pagination;
mod query;

pub use pagination::{DEFAULT_PAGE_SIZE, Page, PageRequest, Sort, SortDirection, SortOrder};
pub use query::{BoolQuery, Query, RangeQuery};
