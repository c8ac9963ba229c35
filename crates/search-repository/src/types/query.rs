//! Query predicates.
//!
//! A [`Query`] is an Elasticsearch Query DSL expression. The repository never
//! inspects it; it is placed verbatim under `"query"` in count and search
//! request bodies. The constructors here cover the predicates callers
//! typically compose: phrase matches, exact terms, ranges and boolean
//! combinations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// An engine-native query predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(Value);

impl Query {
    /// Matches every document.
    pub fn match_all() -> Self {
        Query(json!({ "match_all": {} }))
    }

    /// Requires the tokens of `value` to appear in `field` in the same order.
    pub fn match_phrase(field: &str, value: impl Into<Value>) -> Self {
        Query(json!({ "match_phrase": field_object(field, value.into()) }))
    }

    /// Full-text match on `field`.
    pub fn matches(field: &str, value: impl Into<Value>) -> Self {
        Query(json!({ "match": field_object(field, value.into()) }))
    }

    /// Exact, unanalyzed match on `field`.
    pub fn term(field: &str, value: impl Into<Value>) -> Self {
        Query(json!({ "term": field_object(field, value.into()) }))
    }

    /// Exact match on any of `values`.
    pub fn terms<V: Into<Value>>(field: &str, values: impl IntoIterator<Item = V>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Query(json!({ "terms": field_object(field, Value::Array(values)) }))
    }

    /// Matches documents that have any value in `field`.
    pub fn exists(field: &str) -> Self {
        Query(json!({ "exists": { "field": field } }))
    }

    /// Starts a range predicate on `field`.
    pub fn range(field: &str) -> RangeQuery {
        RangeQuery::new(field)
    }

    /// Starts a boolean composite.
    pub fn bool() -> BoolQuery {
        BoolQuery::default()
    }

    /// Returns the predicate as JSON.
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Consumes the query, returning its JSON.
    pub fn into_json(self) -> Value {
        self.0
    }
}

impl Default for Query {
    fn default() -> Self {
        Self::match_all()
    }
}

impl From<Value> for Query {
    fn from(value: Value) -> Self {
        Query(value)
    }
}

impl From<RangeQuery> for Query {
    fn from(range: RangeQuery) -> Self {
        range.build()
    }
}

impl From<BoolQuery> for Query {
    fn from(bool_query: BoolQuery) -> Self {
        bool_query.build()
    }
}

/// Builder for a `range` predicate.
#[derive(Debug, Clone)]
pub struct RangeQuery {
    field: String,
    bounds: Map<String, Value>,
}

impl RangeQuery {
    fn new(field: &str) -> Self {
        Self {
            field: field.to_string(),
            bounds: Map::new(),
        }
    }

    fn bound(mut self, op: &str, value: impl Into<Value>) -> Self {
        self.bounds.insert(op.to_string(), value.into());
        self
    }

    /// Strictly greater than.
    pub fn gt(self, value: impl Into<Value>) -> Self {
        self.bound("gt", value)
    }

    /// Greater than or equal.
    pub fn gte(self, value: impl Into<Value>) -> Self {
        self.bound("gte", value)
    }

    /// Strictly less than.
    pub fn lt(self, value: impl Into<Value>) -> Self {
        self.bound("lt", value)
    }

    /// Less than or equal.
    pub fn lte(self, value: impl Into<Value>) -> Self {
        self.bound("lte", value)
    }

    /// Finishes the predicate.
    pub fn build(self) -> Query {
        Query(json!({ "range": field_object(&self.field, Value::Object(self.bounds)) }))
    }
}

/// Builder for a `bool` composite.
///
/// Empty clause lists are left out of the generated JSON.
#[derive(Debug, Clone, Default)]
pub struct BoolQuery {
    must: Vec<Value>,
    filter: Vec<Value>,
    should: Vec<Value>,
    must_not: Vec<Value>,
    minimum_should_match: Option<u32>,
}

impl BoolQuery {
    /// Adds a scoring clause that must match.
    pub fn must(mut self, query: impl Into<Query>) -> Self {
        self.must.push(query.into().into_json());
        self
    }

    /// Adds a non-scoring clause that must match.
    pub fn filter(mut self, query: impl Into<Query>) -> Self {
        self.filter.push(query.into().into_json());
        self
    }

    /// Adds an optional clause.
    pub fn should(mut self, query: impl Into<Query>) -> Self {
        self.should.push(query.into().into_json());
        self
    }

    /// Adds a clause that must not match.
    pub fn must_not(mut self, query: impl Into<Query>) -> Self {
        self.must_not.push(query.into().into_json());
        self
    }

    /// Sets how many `should` clauses must match.
    pub fn minimum_should_match(mut self, n: u32) -> Self {
        self.minimum_should_match = Some(n);
        self
    }

    /// Finishes the composite.
    pub fn build(self) -> Query {
        let mut body = Map::new();
        for (key, clauses) in [
            ("must", self.must),
            ("filter", self.filter),
            ("should", self.should),
            ("must_not", self.must_not),
        ] {
            if !clauses.is_empty() {
                body.insert(key.to_string(), Value::Array(clauses));
            }
        }
        if let Some(n) = self.minimum_should_match {
            body.insert("minimum_should_match".to_string(), json!(n));
        }
        Query(json!({ "bool": Value::Object(body) }))
    }
}

fn field_object(field: &str, value: Value) -> Value {
    let mut object = Map::new();
    object.insert(field.to_string(), value);
    Value::Object(object)
}
