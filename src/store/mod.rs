//! Key-value store abstraction
//!
//! The asset engine persists everything through a string-keyed store with
//! three async operations. Values are either structured JSON (metadata,
//! version indexes) or a binary blob (payloads).
//!
//! Contract shared by every backend:
//! - `get` of an absent key is `Ok(None)`
//! - `set` overwrites (last write wins)
//! - `remove` of an absent key is a no-op success

mod file;
mod memory;
#[cfg(test)]
pub(crate) mod testing;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::blob::Blob;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reported by a store backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed value under '{key}': {reason}")]
    Codec { key: String, reason: String },

    #[error("{0}")]
    Backend(String),
}

impl StoreError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a codec error for a key
    pub fn codec(key: &str, reason: impl ToString) -> Self {
        Self::Codec {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// A value held by the store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    /// Structured record (metadata, version index)
    Json(serde_json::Value),
    /// Binary payload with its mime type
    Blob(Blob),
}

impl StoreValue {
    /// Encode a serializable record
    pub fn encode<T: Serialize>(key: &str, value: &T) -> StoreResult<Self> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| StoreError::codec(key, e))
    }

    /// Decode a structured record stored under `key`
    pub fn decode<T: DeserializeOwned>(self, key: &str) -> StoreResult<T> {
        match self {
            Self::Json(value) => serde_json::from_value(value).map_err(|e| StoreError::codec(key, e)),
            Self::Blob(_) => Err(StoreError::codec(key, "expected a record, found a blob")),
        }
    }

    /// Take the blob stored under `key`
    pub fn into_blob(self, key: &str) -> StoreResult<Blob> {
        match self {
            Self::Blob(blob) => Ok(blob),
            Self::Json(_) => Err(StoreError::codec(key, "expected a blob, found a record")),
        }
    }
}

/// Abstract key-value store interface
///
/// Implementations must be durable for as long as the caller expects the
/// cache to survive; the engine adds no journaling of its own.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value under `key`, `None` when absent
    async fn get(&self, key: &str) -> StoreResult<Option<StoreValue>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: StoreValue) -> StoreResult<()>;

    /// Delete `key`; deleting an absent key succeeds
    async fn remove(&self, key: &str) -> StoreResult<()>;

    /// Get the human-readable backend name for display
    fn backend_name(&self) -> &'static str;
}
