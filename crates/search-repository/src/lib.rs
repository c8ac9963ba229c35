//! # Helios Search Repository
//!
//! A generic repository adapter over Elasticsearch. It translates typed
//! lookups into count and search requests against a fixed set of indices,
//! decodes each hit's `_source` into an entity, and adapts `from`/`size`/`sort`
//! into page requests and pages.
//!
//! ## Features
//!
//! - `elasticsearch` (default) - [`ElasticsearchClient`](client::ElasticsearchClient),
//!   the [`SearchApi`](client::SearchApi) implementation over the official client
//! - `cli` - the `search-probe` binary
//!
//! # Architecture
//!
//! - [`repository`] - [`SearchRepository`] and the [`EntityRepository`] trait
//! - [`client`] - The [`SearchApi`](client::SearchApi) seam and its request/hit types
//! - [`codec`] - [`EntityDecoder`], the explicit payload-to-entity conversion
//! - [`types`] - Query predicates, page requests and pages
//! - [`naming`] - Property-to-field name translation
//! - [`config`] - Repository configuration
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! # #[cfg(feature = "elasticsearch")]
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//!
//! use helios_search_repository::client::{ElasticsearchClient, ElasticsearchConfig};
//! use helios_search_repository::types::{PageRequest, Query, Sort};
//! use helios_search_repository::{EntityDecoder, SearchRepository};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct AuditEvent {
//!     id: String,
//!     kind: String,
//!     date_time: String,
//! }
//!
//! let client = ElasticsearchClient::new(&ElasticsearchConfig::default())?;
//! let repo = SearchRepository::new(
//!     Arc::new(client),
//!     EntityDecoder::<AuditEvent>::json(),
//!     ["audit-2024", "audit-2025"],
//! )?;
//!
//! // Unpaged phrase match
//! let logins = repo.fetch_by_field("kind", "user login").await;
//!
//! // One page, newest first
//! let request = PageRequest::of(0, 20)?.with_sort(Sort::parse("-dateTime"));
//! let page = repo
//!     .fetch_page(&Query::term("kind", "user login"), &request)
//!     .await;
//! println!("{} of {} events", page.len(), page.total);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod naming;
pub mod repository;
pub mod types;

// Re-export commonly used types at crate root
pub use codec::EntityDecoder;
pub use config::RepositoryConfig;
pub use error::{ClientError, ConfigError, DecodeError, RepositoryError, RepositoryResult};
pub use repository::{EntityRepository, Fetched, SearchRepository};
pub use types::{Page, PageRequest, Query, Sort, SortDirection, SortOrder};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
