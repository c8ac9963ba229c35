//! Search client abstraction.
//!
//! [`SearchApi`] is the seam between the repository and the search engine.
//! It exposes exactly the two calls the repository needs: counting matches
//! and fetching a window of hits. The production implementation is
//! [`ElasticsearchClient`]; tests substitute an in-memory client.

#[cfg(feature = "elasticsearch")]
mod elasticsearch;

#[cfg(feature = "elasticsearch")]
pub use self::elasticsearch::{ElasticsearchAuth, ElasticsearchClient, ElasticsearchConfig};

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use crate::error::{ClientError, ClientResult};
use crate::types::{Query, SortDirection};

/// Count and search calls against a fixed set of indices.
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Returns the number of documents matching the request's query.
    async fn count(&self, request: &CountRequest) -> ClientResult<u64>;

    /// Returns the hits for the request's query and window, in engine order.
    async fn search(&self, request: &SearchRequest) -> ClientResult<Vec<SearchHit>>;
}

#[async_trait]
impl<S: SearchApi + ?Sized> SearchApi for Arc<S> {
    async fn count(&self, request: &CountRequest) -> ClientResult<u64> {
        (**self).count(request).await
    }

    async fn search(&self, request: &SearchRequest) -> ClientResult<Vec<SearchHit>> {
        (**self).search(request).await
    }
}

/// A count request.
#[derive(Debug, Clone)]
pub struct CountRequest {
    /// Target indices.
    pub indices: Arc<[String]>,
    /// The predicate to count.
    pub query: Query,
}

impl CountRequest {
    /// Creates a count request.
    pub fn new(indices: Arc<[String]>, query: Query) -> Self {
        Self { indices, query }
    }

    /// Builds the request body.
    pub fn body(&self) -> Value {
        json!({ "query": self.query.as_json() })
    }
}

/// A single field sort in engine form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortClause {
    /// Index field name.
    pub field: String,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortClause {
    /// Creates a sort clause.
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Builds `{ field: { "order": "asc" | "desc" } }`.
    pub fn to_json(&self) -> Value {
        let mut clause = Map::new();
        clause.insert(
            self.field.clone(),
            json!({ "order": self.direction.as_str() }),
        );
        Value::Object(clause)
    }
}

/// A search request.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Target indices.
    pub indices: Arc<[String]>,
    /// The predicate to match.
    pub query: Query,
    /// Number of hits to skip.
    pub from: Option<u64>,
    /// Maximum number of hits to return.
    pub size: Option<u32>,
    /// Sort clauses, highest priority first.
    pub sort: Vec<SortClause>,
}

impl SearchRequest {
    /// Creates a request with no window or sort.
    pub fn new(indices: Arc<[String]>, query: Query) -> Self {
        Self {
            indices,
            query,
            from: None,
            size: None,
            sort: Vec::new(),
        }
    }

    /// Restricts the request to `size` hits starting at `from`.
    pub fn with_window(mut self, from: u64, size: u32) -> Self {
        self.from = Some(from);
        self.size = Some(size);
        self
    }

    /// Caps the number of hits without an offset.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Appends a sort clause.
    pub fn with_sort(mut self, clause: SortClause) -> Self {
        self.sort.push(clause);
        self
    }

    /// Builds the request body.
    pub fn body(&self) -> Value {
        let mut body = json!({ "query": self.query.as_json() });

        if let Some(from) = self.from {
            body["from"] = json!(from);
        }
        if let Some(size) = self.size {
            body["size"] = json!(size);
        }
        if !self.sort.is_empty() {
            body["sort"] = Value::Array(self.sort.iter().map(SortClause::to_json).collect());
        }

        body
    }
}

/// A single matched document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// The index the document lives in.
    pub index: String,
    /// The document ID, if the engine reported one.
    pub id: Option<String>,
    /// The raw serialized `_source` payload.
    pub source: String,
}

impl SearchHit {
    /// Creates a hit.
    pub fn new(index: impl Into<String>, id: Option<String>, source: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            id,
            source: source.into(),
        }
    }
}

/// Reads `count` from a count response body.
#[cfg_attr(not(feature = "elasticsearch"), allow(dead_code))]
pub(crate) fn parse_count_response(indices: &[String], body: &Value) -> ClientResult<u64> {
    body.get("count")
        .and_then(|c| c.as_u64())
        .ok_or_else(|| ClientError::MalformedResponse {
            indices: indices.to_vec(),
            message: "count response has no numeric 'count' field".to_string(),
        })
}

/// Reads `hits.hits` from a search response body.
///
/// Hits without a `_source` (e.g., when source storage is disabled) are skipped.
#[cfg_attr(not(feature = "elasticsearch"), allow(dead_code))]
pub(crate) fn parse_search_response(
    indices: &[String],
    body: &Value,
) -> ClientResult<Vec<SearchHit>> {
    let hits = body
        .get("hits")
        .and_then(|h| h.get("hits"))
        .and_then(|h| h.as_array())
        .ok_or_else(|| ClientError::MalformedResponse {
            indices: indices.to_vec(),
            message: "search response has no 'hits.hits' array".to_string(),
        })?;

    let mut parsed = Vec::with_capacity(hits.len());
    for hit in hits {
        let source = match hit.get("_source") {
            Some(s) => s,
            None => {
                tracing::debug!(?indices, "Skipping hit without _source");
                continue;
            }
        };

        parsed.push(SearchHit {
            index: hit
                .get("_index")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            id: hit.get("_id").and_then(|v| v.as_str()).map(str::to_string),
            source: source.to_string(),
        });
    }

    Ok(parsed)
}
