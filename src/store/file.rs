//! Directory-backed store
//!
//! Each key maps to one JSON file named after the SHA256 of the key, so
//! arbitrary asset paths never leak into the filesystem layout. Blob bytes
//! are hex-encoded inside the record.

use super::{KeyValueStore, StoreError, StoreResult, StoreValue};
use crate::blob::Blob;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// On-disk representation of a stored value
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Record {
    Json {
        key: String,
        value: serde_json::Value,
    },
    Blob {
        key: String,
        mime_type: String,
        data: String,
    },
}

/// Persistent store keeping one file per key under a root directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`; the directory is created on first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        self.root
            .join(format!("{}.json", hex::encode(hasher.finalize())))
    }

    fn decode(key: &str, content: &str) -> StoreResult<StoreValue> {
        let record: Record = serde_json::from_str(content).map_err(|e| StoreError::codec(key, e))?;

        match record {
            Record::Json { value, .. } => Ok(StoreValue::Json(value)),
            Record::Blob {
                mime_type, data, ..
            } => {
                let bytes = hex::decode(data).map_err(|e| StoreError::codec(key, e))?;
                Ok(StoreValue::Blob(Blob::new(bytes, mime_type)))
            }
        }
    }

    fn encode(key: &str, value: StoreValue) -> StoreResult<String> {
        let record = match value {
            StoreValue::Json(value) => Record::Json {
                key: key.to_string(),
                value,
            },
            StoreValue::Blob(blob) => Record::Blob {
                key: key.to_string(),
                mime_type: blob.mime_type().to_string(),
                data: hex::encode(blob.bytes()),
            },
        };

        serde_json::to_string(&record).map_err(|e| StoreError::codec(key, e))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StoreResult<Option<StoreValue>> {
        let path = self.entry_path(key);

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::io(
                    format!("reading store entry {}", path.display()),
                    e,
                ))
            }
        };

        Self::decode(key, &content).map(Some)
    }

    async fn set(&self, key: &str, value: StoreValue) -> StoreResult<()> {
        fs::create_dir_all(&self.root).await.map_err(|e| {
            StoreError::io(format!("creating store directory {}", self.root.display()), e)
        })?;

        let path = self.entry_path(key);
        let content = Self::encode(key, value)?;

        fs::write(&path, content)
            .await
            .map_err(|e| StoreError::io(format!("writing store entry {}", path.display()), e))?;

        debug!("Stored {} at {}", key, path.display());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.entry_path(key);

        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed {} from {}", key, path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(
                format!("removing store entry {}", path.display()),
                e,
            )),
        }
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
