//! Elasticsearch implementation of [`SearchApi`].

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use elasticsearch::auth::Credentials;
use elasticsearch::cert::CertificateValidation;
use elasticsearch::http::response::Response;
use elasticsearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use elasticsearch::{CountParts, Elasticsearch, SearchParts};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, ClientResult, ConfigError};

use super::{
    CountRequest, SearchApi, SearchHit, SearchRequest, parse_count_response,
    parse_search_response,
};

/// Authentication configuration for Elasticsearch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElasticsearchAuth {
    /// Basic username/password authentication.
    Basic {
        /// The username for basic auth.
        username: String,
        /// The password for basic auth.
        password: String,
    },
    /// Bearer token authentication.
    Bearer {
        /// The bearer token.
        token: String,
    },
}

/// Connection settings for [`ElasticsearchClient`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticsearchConfig {
    /// Elasticsearch node URLs (e.g., `["http://localhost:9200"]`).
    /// Currently uses the first node (single-node connection pool).
    #[serde(default = "default_nodes")]
    pub nodes: Vec<String>,

    /// Request timeout in milliseconds (default: 30000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Optional authentication.
    #[serde(default)]
    pub auth: Option<ElasticsearchAuth>,

    /// Whether to disable certificate validation (default: false).
    /// Only use for development/testing.
    #[serde(default)]
    pub disable_certificate_validation: bool,
}

fn default_nodes() -> Vec<String> {
    vec!["http://localhost:9200".to_string()]
}

fn default_request_timeout_ms() -> u64 {
    30000
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            nodes: default_nodes(),
            request_timeout_ms: default_request_timeout_ms(),
            auth: None,
            disable_certificate_validation: false,
        }
    }
}

impl ElasticsearchAuth {
    fn credentials(&self) -> Credentials {
        match self {
            Self::Basic { username, password } => {
                Credentials::Basic(username.clone(), password.clone())
            }
            Self::Bearer { token } => Credentials::Bearer(token.clone()),
        }
    }
}

impl ElasticsearchConfig {
    /// Loads configuration from environment variables.
    ///
    /// - `ES_NODES` - comma-separated node URLs
    /// - `ES_TIMEOUT_MS` - request timeout in milliseconds
    /// - `ES_USERNAME` / `ES_PASSWORD` - basic auth
    /// - `ES_BEARER_TOKEN` - bearer auth (used when no username is set)
    /// - `ES_INSECURE` - `true` or `1` disables certificate validation
    ///
    /// Unset or unparsable variables fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let nodes = lookup("ES_NODES")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|nodes| !nodes.is_empty())
            .unwrap_or_else(default_nodes);

        let auth = match (lookup("ES_USERNAME"), lookup("ES_BEARER_TOKEN")) {
            (Some(username), _) => Some(ElasticsearchAuth::Basic {
                username,
                password: lookup("ES_PASSWORD").unwrap_or_default(),
            }),
            (None, Some(token)) => Some(ElasticsearchAuth::Bearer { token }),
            (None, None) => None,
        };

        Self {
            nodes,
            request_timeout_ms: lookup("ES_TIMEOUT_MS")
                .and_then(|t| t.parse().ok())
                .unwrap_or_else(default_request_timeout_ms),
            auth,
            disable_certificate_validation: lookup("ES_INSECURE")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

/// [`SearchApi`] backed by the official Elasticsearch client.
#[derive(Clone)]
pub struct ElasticsearchClient {
    client: Elasticsearch,
}

impl Debug for ElasticsearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticsearchClient").finish_non_exhaustive()
    }
}

impl ElasticsearchClient {
    /// Builds a client from configuration.
    ///
    /// Only the first entry of `nodes` is contacted; an empty list is rejected.
    pub fn new(config: &ElasticsearchConfig) -> Result<Self, ConfigError> {
        let node = config.nodes.first().ok_or(ConfigError::NoNodes)?;
        let url = node
            .parse::<elasticsearch::http::Url>()
            .map_err(|e| ConfigError::InvalidNodeUrl {
                url: node.clone(),
                message: e.to_string(),
            })?;

        let mut builder = TransportBuilder::new(SingleNodeConnectionPool::new(url))
            .timeout(Duration::from_millis(config.request_timeout_ms));
        if config.disable_certificate_validation {
            builder = builder.cert_validation(CertificateValidation::None);
        }
        if let Some(credentials) = config.auth.as_ref().map(ElasticsearchAuth::credentials) {
            builder = builder.auth(credentials);
        }

        let transport = builder.build().map_err(|e| ConfigError::Transport {
            message: e.to_string(),
        })?;
        Ok(Self::from_client(Elasticsearch::new(transport)))
    }

    /// Wraps an already configured client.
    pub fn from_client(client: Elasticsearch) -> Self {
        Self { client }
    }

    /// Returns the underlying Elasticsearch client.
    pub fn client(&self) -> &Elasticsearch {
        &self.client
    }
}

#[async_trait]
impl SearchApi for ElasticsearchClient {
    async fn count(&self, request: &CountRequest) -> ClientResult<u64> {
        let indices = &*request.indices;
        let index_refs: Vec<&str> = indices.iter().map(String::as_str).collect();

        let response = self
            .client
            .count(CountParts::Index(&index_refs))
            .body(request.body())
            .send()
            .await
            .map_err(|e| transport_error(indices, e))?;

        let body = read_success_body(indices, response).await?;
        parse_count_response(indices, &body)
    }

    async fn search(&self, request: &SearchRequest) -> ClientResult<Vec<SearchHit>> {
        let indices = &*request.indices;
        let index_refs: Vec<&str> = indices.iter().map(String::as_str).collect();

        let response = self
            .client
            .search(SearchParts::Index(&index_refs))
            .body(request.body())
            .send()
            .await
            .map_err(|e| transport_error(indices, e))?;

        let body = read_success_body(indices, response).await?;
        parse_search_response(indices, &body)
    }
}

fn transport_error(indices: &[String], e: elasticsearch::Error) -> ClientError {
    ClientError::Transport {
        indices: indices.to_vec(),
        message: e.to_string(),
    }
}

/// Returns the JSON body of a successful response, or a status error carrying the body text.
async fn read_success_body(indices: &[String], response: Response) -> ClientResult<Value> {
    let status = response.status_code();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Status {
            indices: indices.to_vec(),
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| ClientError::MalformedResponse {
            indices: indices.to_vec(),
            message: format!("Failed to parse response: {}", e),
        })
}
