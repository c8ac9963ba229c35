//! Error types for the search repository.
//!
//! Errors are split by where they originate: the search client transport,
//! entity decoding, and construction-time configuration. [`RepositoryError`]
//! wraps all of them for the fallible repository operations.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for repository operations.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Search client errors (transport, HTTP status, response shape)
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Entity decoding errors
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors returned by a [`SearchApi`](crate::client::SearchApi) implementation.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced a response (connection, timeout, I/O).
    #[error("transport error against indices {indices:?}: {message}")]
    Transport {
        indices: Vec<String>,
        message: String,
    },

    /// The engine answered with a non-success status.
    #[error("request to indices {indices:?} failed with status {status}: {body}")]
    Status {
        indices: Vec<String>,
        status: u16,
        body: String,
    },

    /// The response body could not be interpreted.
    #[error("malformed response from indices {indices:?}: {message}")]
    MalformedResponse {
        indices: Vec<String>,
        message: String,
    },
}

impl ClientError {
    /// Returns the indices the failed request targeted.
    pub fn indices(&self) -> &[String] {
        match self {
            ClientError::Transport { indices, .. }
            | ClientError::Status { indices, .. }
            | ClientError::MalformedResponse { indices, .. } => indices,
        }
    }

    /// Returns true if the failure happened below the HTTP layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport { .. })
    }
}

/// Errors raised while turning a raw hit payload into an entity.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The payload is not valid JSON for the entity type.
    #[error("failed to deserialize entity: {0}")]
    Json(#[from] serde_json::Error),

    /// A custom decoder rejected the payload.
    #[error("failed to decode entity: {message}")]
    Invalid { message: String },
}

impl DecodeError {
    /// Creates a custom decode error.
    pub fn invalid(message: impl Into<String>) -> Self {
        DecodeError::Invalid {
            message: message.into(),
        }
    }
}

/// Errors in repository or client configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A repository must target at least one index.
    #[error("repository requires at least one index")]
    NoIndices,

    /// An index name is blank.
    #[error("index name at position {position} is empty")]
    EmptyIndexName { position: usize },

    /// Page size must be positive.
    #[error("page size must be greater than zero")]
    ZeroPageSize,

    /// Unpaged fetch window must be positive.
    #[error("max_result_window must be greater than zero")]
    ZeroResultWindow,

    /// No Elasticsearch node is configured.
    #[error("at least one Elasticsearch node URL is required")]
    NoNodes,

    /// A node URL could not be parsed.
    #[error("invalid node URL '{url}': {message}")]
    InvalidNodeUrl { url: String, message: String },

    /// The HTTP transport could not be built.
    #[error("failed to build transport: {message}")]
    Transport { message: String },
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Result type for search client calls.
pub type ClientResult<T> = Result<T, ClientError>;
