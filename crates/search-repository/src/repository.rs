//! Typed repository over a [`SearchApi`].
//!
//! [`SearchRepository`] turns field lookups and query predicates into count
//! and search requests against a fixed set of indices, and decodes the hits
//! into entities with the [`EntityDecoder`] it was built with.
//!
//! Two families of operations are offered:
//!
//! - `fetch_by_field` / `fetch_page` never fail. Client errors are logged and
//!   degrade to an empty result, so "no matches" and "search failed" look
//!   the same to the caller.
//! - `try_fetch_by_field` / `try_fetch_page` return the client error instead.
//!
//! In both families a hit that cannot be decoded is logged and dropped; the
//! remaining hits are still returned.
//!
//! A paged fetch issues a count request and then a search request. The two are
//! independent round trips, so the reported total may not agree with the hits
//! of the page.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::client::{CountRequest, SearchApi, SearchHit, SearchRequest, SortClause};
use crate::codec::EntityDecoder;
use crate::config::RepositoryConfig;
use crate::error::{ClientResult, ConfigError, RepositoryResult};
use crate::naming::camel_to_snake;
use crate::types::{Page, PageRequest, Query, Sort};

/// Entities returned by an unpaged fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    /// Decoded entities, in hit order.
    pub items: Vec<T>,
    /// Hits that could not be decoded.
    pub skipped: usize,
}

impl<T> Fetched<T> {
    fn empty() -> Self {
        Self {
            items: Vec::new(),
            skipped: 0,
        }
    }
}

/// The inbound repository contract.
#[async_trait]
pub trait EntityRepository<T>: Send + Sync {
    /// Returns every entity whose `field` phrase-matches `value`.
    async fn get_by_field(&self, field: &str, value: Value) -> Vec<T>;

    /// Returns one page of entities matching `query`.
    async fn get_page_by_query(&self, query: &Query, request: &PageRequest) -> Page<T>;
}

/// Repository of entities of type `T` stored in a fixed set of indices.
pub struct SearchRepository<T> {
    client: Arc<dyn SearchApi>,
    decoder: EntityDecoder<T>,
    indices: Arc<[String]>,
    config: Arc<RepositoryConfig>,
}

impl<T> SearchRepository<T> {
    /// Creates a repository over `indices` with default settings.
    pub fn new<I, S>(
        client: Arc<dyn SearchApi>,
        decoder: EntityDecoder<T>,
        indices: I,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_config(client, decoder, RepositoryConfig::new(indices))
    }

    /// Creates a repository from a full configuration.
    pub fn with_config(
        client: Arc<dyn SearchApi>,
        decoder: EntityDecoder<T>,
        config: RepositoryConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            client,
            decoder,
            indices: Arc::from(config.indices.clone()),
            config: Arc::new(config),
        })
    }

    /// Returns the indices every request targets.
    pub fn indices(&self) -> &[String] {
        &self.indices
    }

    /// Returns the repository configuration.
    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Returns every entity whose `field` phrase-matches `value`.
    ///
    /// Results are unsorted and capped at `max_result_window`. Client errors
    /// are logged and yield an empty list.
    pub async fn fetch_by_field(&self, field: &str, value: impl Into<Value>) -> Vec<T> {
        let request = self.unpaged_request(Query::match_phrase(field, value));

        match self.execute_search(&request).await {
            Ok(fetched) => fetched.items,
            Err(e) => {
                error!(indices = ?self.indices, error = %e, "Error searching in indices");
                Vec::new()
            }
        }
    }

    /// Like [`fetch_by_field`](Self::fetch_by_field), but returns client errors.
    pub async fn try_fetch_by_field(
        &self,
        field: &str,
        value: impl Into<Value>,
    ) -> RepositoryResult<Fetched<T>> {
        let request = self.unpaged_request(Query::match_phrase(field, value));
        Ok(self.execute_search(&request).await?)
    }

    /// Returns one page of entities matching `query`.
    ///
    /// Matches are counted first; a zero count returns an empty page without
    /// searching. A failed count is treated as zero. A failed search after a
    /// successful count yields a page with the count as total and no items.
    pub async fn fetch_page(&self, query: &Query, request: &PageRequest) -> Page<T> {
        let total = match self.count_matches(query).await {
            Ok(total) => total,
            Err(e) => {
                error!(indices = ?self.indices, error = %e, "Error counting matches");
                0
            }
        };

        if total == 0 {
            return Page::empty(request.clone());
        }

        let search = self.paged_request(query.clone(), request);
        match self.execute_search(&search).await {
            Ok(fetched) => self.assemble_page(fetched, request, total),
            Err(e) => {
                error!(indices = ?self.indices, error = %e, "Error searching in indices");
                Page::new(Vec::new(), request.clone(), total)
            }
        }
    }

    /// Like [`fetch_page`](Self::fetch_page), but returns client errors.
    pub async fn try_fetch_page(
        &self,
        query: &Query,
        request: &PageRequest,
    ) -> RepositoryResult<Page<T>> {
        let total = self.count_matches(query).await?;
        if total == 0 {
            return Ok(Page::empty(request.clone()));
        }

        let search = self.paged_request(query.clone(), request);
        let fetched = self.execute_search(&search).await?;
        Ok(self.assemble_page(fetched, request, total))
    }

    async fn count_matches(&self, query: &Query) -> ClientResult<u64> {
        let request = CountRequest::new(Arc::clone(&self.indices), query.clone());
        debug!(indices = ?self.indices, body = %request.body(), "Count request");

        self.client.count(&request).await
    }

    async fn execute_search(&self, request: &SearchRequest) -> ClientResult<Fetched<T>> {
        debug!(indices = ?self.indices, body = %request.body(), "Search request");

        let hits = self.client.search(request).await?;
        Ok(self.decode_hits(hits))
    }

    fn decode_hits(&self, hits: Vec<SearchHit>) -> Fetched<T> {
        let mut fetched = Fetched::empty();
        fetched.items.reserve(hits.len());

        for hit in hits {
            match self.decoder.decode(&hit.source) {
                Ok(entity) => fetched.items.push(entity),
                Err(e) => {
                    fetched.skipped += 1;
                    error!(
                        indices = ?self.indices,
                        index = %hit.index,
                        id = ?hit.id,
                        error = %e,
                        "Error mapping hit to entity"
                    );
                }
            }
        }

        fetched
    }

    fn assemble_page(&self, fetched: Fetched<T>, request: &PageRequest, total: u64) -> Page<T> {
        info!(
            indices = ?self.indices,
            page = request.page_number(),
            size = request.page_size(),
            total,
            returned = fetched.items.len(),
            skipped = fetched.skipped,
            "Fetched page"
        );
        Page::new(fetched.items, request.clone(), total).with_skipped(fetched.skipped)
    }

    fn unpaged_request(&self, query: Query) -> SearchRequest {
        SearchRequest::new(Arc::clone(&self.indices), query)
            .with_size(self.config.max_result_window)
    }

    fn paged_request(&self, query: Query, request: &PageRequest) -> SearchRequest {
        SearchRequest::new(Arc::clone(&self.indices), query)
            .with_window(request.offset(), request.page_size())
            .with_sort(self.sort_clause(request.sort()))
    }

    /// Only the first order is used; without one the configured fallback applies.
    fn sort_clause(&self, sort: &Sort) -> SortClause {
        match sort.first() {
            Some(order) => SortClause::new(camel_to_snake(&order.property), order.direction),
            None => SortClause::new(
                camel_to_snake(&self.config.default_sort_property),
                self.config.default_sort_direction,
            ),
        }
    }
}

impl<T> Clone for SearchRepository<T> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            decoder: self.decoder.clone(),
            indices: Arc::clone(&self.indices),
            config: Arc::clone(&self.config),
        }
    }
}

impl<T> fmt::Debug for SearchRepository<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchRepository")
            .field("indices", &self.indices)
            .field("decoder", &self.decoder)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> EntityRepository<T> for SearchRepository<T> {
    async fn get_by_field(&self, field: &str, value: Value) -> Vec<T> {
        self.fetch_by_field(field, value).await
    }

    async fn get_page_by_query(&self, query: &Query, request: &PageRequest) -> Page<T> {
        self.fetch_page(query, request).await
    }
}
