//! In-memory search client.

use std::cmp::Ordering;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use helios_search_repository::client::{
    CountRequest, SearchApi, SearchHit, SearchRequest, SortClause,
};
use helios_search_repository::error::{ClientError, ClientResult};
use helios_search_repository::types::SortDirection;

/// A document held by the mock, keyed by index.
#[derive(Debug, Clone)]
struct MockDocument {
    index: String,
    id: String,
    source: Value,
}

#[derive(Debug, Default)]
struct MockState {
    documents: Vec<MockDocument>,
    count_requests: Vec<CountRequest>,
    search_requests: Vec<SearchRequest>,
    fail_count: bool,
    fail_search: bool,
    count_override: Option<u64>,
}

/// A [`SearchApi`] over a list of JSON documents.
///
/// Supports `match_all`, `match_phrase` (the value's lowercased whitespace
/// tokens appear contiguously in the field's), `term` (equality) and
/// `bool.must`/`bool.filter`; anything else matches every document. `from`, `size` and the first sort clause are
/// honored. Requests are recorded for later inspection.
#[derive(Debug, Clone, Default)]
pub struct MockSearchClient {
    state: Arc<Mutex<MockState>>,
}

impl MockSearchClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds documents to `index`, assigning IDs from their `id` field.
    pub fn with_documents(self, index: &str, documents: Vec<Value>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for source in documents {
                let id = source
                    .get("id")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("doc-{}", state.documents.len()));
                state.documents.push(MockDocument {
                    index: index.to_string(),
                    id,
                    source,
                });
            }
        }
        self
    }

    /// Makes every count request fail with a transport error.
    pub fn fail_count(&self) {
        self.state.lock().unwrap().fail_count = true;
    }

    /// Makes every search request fail with a transport error.
    pub fn fail_search(&self) {
        self.state.lock().unwrap().fail_search = true;
    }

    /// Makes count requests report `count` regardless of the documents.
    pub fn set_count(&self, count: u64) {
        self.state.lock().unwrap().count_override = Some(count);
    }

    pub fn count_calls(&self) -> usize {
        self.state.lock().unwrap().count_requests.len()
    }

    pub fn search_calls(&self) -> usize {
        self.state.lock().unwrap().search_requests.len()
    }

    pub fn count_requests(&self) -> Vec<CountRequest> {
        self.state.lock().unwrap().count_requests.clone()
    }

    pub fn search_requests(&self) -> Vec<SearchRequest> {
        self.state.lock().unwrap().search_requests.clone()
    }

    pub fn last_search(&self) -> Option<SearchRequest> {
        self.state.lock().unwrap().search_requests.last().cloned()
    }
}

fn transport_failure(indices: &[String]) -> ClientError {
    ClientError::Transport {
        indices: indices.to_vec(),
        message: "connection refused".to_string(),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn tokens(value: &Value) -> Vec<String> {
    value_text(value)
        .split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

/// Phrase match over whitespace tokens, as the standard analyzer sees them
/// for the plain-word values used in tests.
fn phrase_matches(actual: &Value, expected: &Value) -> bool {
    let haystack = tokens(actual);
    let needle = tokens(expected);
    !needle.is_empty()
        && haystack
            .windows(needle.len())
            .any(|window| window == needle.as_slice())
}

fn single_field(clause: &Value) -> Option<(&String, &Value)> {
    clause.as_object().and_then(|o| o.iter().next())
}

fn matches(query: &Value, source: &Value) -> bool {
    if let Some((field, expected)) = query.get("match_phrase").and_then(single_field) {
        return source
            .get(field)
            .map(|actual| phrase_matches(actual, expected))
            .unwrap_or(false);
    }

    if let Some((field, expected)) = query.get("term").and_then(single_field) {
        return source.get(field) == Some(expected);
    }

    if let Some(bool_query) = query.get("bool") {
        return ["must", "filter"]
            .iter()
            .filter_map(|key| bool_query.get(*key).and_then(|c| c.as_array()))
            .flatten()
            .all(|clause| matches(clause, source));
    }

    true
}

fn compare_field(a: &Value, b: &Value, clause: &SortClause) -> Ordering {
    let av = a.get(&clause.field);
    let bv = b.get(&clause.field);
    let ordering = match (av.and_then(Value::as_f64), bv.and_then(Value::as_f64)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => av.map(value_text).cmp(&bv.map(value_text)),
    };
    match clause.direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

impl MockState {
    fn matching(&self, indices: &[String], query: &Value) -> Vec<MockDocument> {
        self.documents
            .iter()
            .filter(|doc| indices.contains(&doc.index))
            .filter(|doc| matches(query, &doc.source))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl SearchApi for MockSearchClient {
    async fn count(&self, request: &CountRequest) -> ClientResult<u64> {
        let mut state = self.state.lock().unwrap();
        state.count_requests.push(request.clone());

        if state.fail_count {
            return Err(transport_failure(&request.indices));
        }
        if let Some(count) = state.count_override {
            return Ok(count);
        }

        Ok(state
            .matching(&request.indices, request.query.as_json())
            .len() as u64)
    }

    async fn search(&self, request: &SearchRequest) -> ClientResult<Vec<SearchHit>> {
        let mut state = self.state.lock().unwrap();
        state.search_requests.push(request.clone());

        if state.fail_search {
            return Err(transport_failure(&request.indices));
        }

        let mut docs = state.matching(&request.indices, request.query.as_json());
        if let Some(clause) = request.sort.first() {
            docs.sort_by(|a, b| compare_field(&a.source, &b.source, clause));
        }

        let from = request.from.unwrap_or(0) as usize;
        // Elasticsearch returns 10 hits when no size is given.
        let size = request.size.unwrap_or(10) as usize;

        Ok(docs
            .into_iter()
            .skip(from)
            .take(size)
            .map(|doc| SearchHit::new(doc.index, Some(doc.id), doc.source.to_string()))
            .collect())
    }
}
