//! Persisted asset records: per-version metadata and the per-path version index

use super::keys;
use crate::store::{KeyValueStore, StoreResult, StoreValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Metadata stored next to each payload
///
/// Kept separate from the bytes so existence and expiry checks never have
/// to fetch the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMetadata {
    #[serde(default)]
    pub name: String,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_update: DateTime<Utc>,
}

/// Fetch the metadata for `(path, version)`
pub async fn read_metadata(
    store: &dyn KeyValueStore,
    path: &str,
    version: &str,
) -> StoreResult<Option<StoredMetadata>> {
    let key = keys::meta(path, version);
    match store.get(&key).await? {
        Some(value) => value.decode(&key).map(Some),
        None => Ok(None),
    }
}

/// Write the metadata for `(path, version)`
pub async fn write_metadata(
    store: &dyn KeyValueStore,
    path: &str,
    version: &str,
    metadata: &StoredMetadata,
) -> StoreResult<()> {
    let key = keys::meta(path, version);
    store.set(&key, StoreValue::encode(&key, metadata)?).await
}

/// Read the version index for `path`
///
/// A missing index, or one that is not a list, reads as empty.
pub async fn read_versions(store: &dyn KeyValueStore, path: &str) -> StoreResult<Vec<String>> {
    let key = keys::versions(path);
    let Some(value) = store.get(&key).await? else {
        return Ok(Vec::new());
    };

    match value.decode::<Vec<String>>(&key) {
        Ok(versions) => Ok(versions),
        Err(e) => {
            warn!("Ignoring unreadable version index for '{}': {}", path, e);
            Ok(Vec::new())
        }
    }
}

/// Write the version index for `path`
pub async fn write_versions(
    store: &dyn KeyValueStore,
    path: &str,
    versions: &[String],
) -> StoreResult<()> {
    let key = keys::versions(path);
    store.set(&key, StoreValue::encode(&key, &versions)?).await
}

/// Add `version` to an index, keeping entries unique
pub fn insert_version(versions: &mut Vec<String>, version: &str) {
    if !versions.iter().any(|v| v == version) {
        versions.push(version.to_string());
    }
}

/// Drop `version` from an index if present
pub fn remove_version(versions: &mut Vec<String>, version: &str) {
    versions.retain(|v| v != version);
}
