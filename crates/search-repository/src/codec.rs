//! Entity decoding.
//!
//! A repository is handed its decoder at construction time. The decoder owns
//! the knowledge of how a hit's raw `_source` string becomes an entity, so the
//! repository itself never has to discover the entity type at runtime.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::error::DecodeError;

type DecodeFn<T> = dyn Fn(&str) -> Result<T, DecodeError> + Send + Sync;

/// Converts raw hit payloads into entities of type `T`.
pub struct EntityDecoder<T> {
    decode: Arc<DecodeFn<T>>,
}

impl<T> EntityDecoder<T> {
    /// Creates a decoder from a custom function.
    pub fn new<F>(decode: F) -> Self
    where
        F: Fn(&str) -> Result<T, DecodeError> + Send + Sync + 'static,
    {
        Self {
            decode: Arc::new(decode),
        }
    }

    /// Decodes a single raw payload.
    pub fn decode(&self, raw: &str) -> Result<T, DecodeError> {
        (self.decode)(raw)
    }
}

impl<T: DeserializeOwned> EntityDecoder<T> {
    /// Creates a decoder that reads the payload as JSON with `serde_json`.
    pub fn json() -> Self {
        Self::new(|raw| serde_json::from_str(raw).map_err(DecodeError::from))
    }
}

impl<T: DeserializeOwned> Default for EntityDecoder<T> {
    fn default() -> Self {
        Self::json()
    }
}

impl<T> Clone for EntityDecoder<T> {
    fn clone(&self) -> Self {
        Self {
            decode: Arc::clone(&self.decode),
        }
    }
}

impl<T> fmt::Debug for EntityDecoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDecoder")
            .field("entity", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}
