//! Entry points for creating and finding assets
//!
//! `Cfs` bundles a store and an engine configuration so callers do not have
//! to thread both through every constructor.

use super::entry::{report, Asset};
use super::metadata::{self, StoredMetadata};
use super::path::AssetPath;
use crate::blob::Blob;
use crate::config::CacheConfig;
use crate::error::{CfsError, CfsResult};
use crate::store::{KeyValueStore, MemoryStore};
use std::sync::Arc;

/// Asset cache bound to one store
#[derive(Clone)]
pub struct Cfs {
    store: Arc<dyn KeyValueStore>,
    config: Arc<CacheConfig>,
}

impl Cfs {
    /// Create a cache over `store`
    pub fn new(store: Arc<dyn KeyValueStore>, config: CacheConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Create a cache over a fresh in-memory store
    pub fn in_memory(config: CacheConfig) -> Self {
        Self::new(Arc::new(MemoryStore::new()), config)
    }

    /// Create an asset from `pathname?version` and an in-memory payload
    ///
    /// The display name is the basename of the path. With auto-save enabled
    /// the payload is persisted in the background.
    pub fn create_asset(&self, asset_path: &str, payload: Blob) -> CfsResult<Asset> {
        let parsed = AssetPath::parse(asset_path)?;
        let name = parsed.name();

        Ok(Asset::with_payload(
            self.store.clone(),
            self.config.clone(),
            parsed.path,
            name,
            payload,
            Some(&parsed.version),
        ))
    }

    /// Find an existing asset by `pathname?version` and start loading it
    pub async fn load_asset(&self, asset_path: &str) -> CfsResult<Asset> {
        Asset::locate(self.store.clone(), self.config.clone(), asset_path).await
    }

    /// Open `(path, version)` and load it in the background, whether or not it exists
    pub fn open(&self, path: &str, version: Option<&str>) -> Asset {
        Asset::open(self.store.clone(), self.config.clone(), path, version)
    }

    /// Versions of `path` present in the store
    pub async fn versions(&self, path: &str) -> CfsResult<Vec<String>> {
        metadata::read_versions(self.store.as_ref(), path)
            .await
            .map_err(|e| report(CfsError::store("Listing versions of", path, "*", e)))
    }

    /// Stored metadata for `(path, version)`, without fetching the payload
    pub async fn metadata(&self, path: &str, version: &str) -> CfsResult<Option<StoredMetadata>> {
        metadata::read_metadata(self.store.as_ref(), path, version)
            .await
            .map_err(|e| report(CfsError::store("Reading metadata of", path, version, e)))
    }

    /// Underlying store
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Engine configuration
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::FlakyStore;

    fn blob(bytes: &[u8]) -> Blob {
        Blob::new(bytes.to_vec(), "application/octet-stream")
    }

    #[tokio::test]
    async fn create_asset_then_load_fresh() {
        let cfs = Cfs::in_memory(CacheConfig::default());
        let logo = Blob::guess(vec![137u8, 80, 78, 71], "logo.png");

        let asset = cfs.create_asset("images/logo.png", logo.clone()).unwrap();
        assert!(asset.is_loaded());
        assert_eq!(asset.name(), "logo.png");
        assert_eq!(asset.version(), "default");
        asset.settled().await.unwrap();

        let fresh = cfs.open("images/logo.png", Some("default"));
        fresh.settled().await.unwrap();
        assert_eq!(fresh.payload(), Some(logo));
    }

    #[tokio::test]
    async fn create_versioned_asset_indexes_version() {
        let cfs = Cfs::in_memory(CacheConfig::default());
        let v2 = blob(b"second draft");

        cfs.create_asset("doc.txt?v2", v2.clone())
            .unwrap()
            .settled()
            .await
            .unwrap();
        assert_eq!(cfs.versions("doc.txt").await.unwrap(), vec!["v2"]);

        let other = cfs.open("doc.txt", None);
        assert!(other.settled().await.unwrap_err().is_not_found());
        other.load_version("v2").await.unwrap();
        assert_eq!(other.payload(), Some(v2));
    }

    #[tokio::test]
    async fn load_asset_requires_metadata() {
        let cfs = Cfs::in_memory(CacheConfig::default());
        assert!(cfs.load_asset("nowhere.bin").await.unwrap_err().is_not_found());

        cfs.create_asset("here.bin?v1", blob(b"x"))
            .unwrap()
            .settled()
            .await
            .unwrap();

        let asset = cfs.load_asset("here.bin?v1").await.unwrap();
        asset.settled().await.unwrap();
        assert_eq!(asset.payload().unwrap().bytes(), b"x");
    }

    #[test]
    fn create_asset_rejects_empty_path() {
        let cfs = Cfs::in_memory(CacheConfig {
            auto_save: false,
            ..CacheConfig::default()
        });
        assert!(matches!(
            cfs.create_asset("?", blob(b"x")),
            Err(CfsError::InvalidAssetPath(_))
        ));
    }

    #[tokio::test]
    async fn metadata_without_payload_fetch() {
        let cfs = Cfs::in_memory(CacheConfig::default());
        assert!(cfs.metadata("a.js", "default").await.unwrap().is_none());

        cfs.create_asset("lib/a.js", blob(b"x"))
            .unwrap()
            .settled()
            .await
            .unwrap();

        let stored = cfs.metadata("lib/a.js", "default").await.unwrap().unwrap();
        assert_eq!(stored.name, "a.js");
    }

    #[tokio::test]
    async fn versions_of_unknown_path_is_empty() {
        let cfs = Cfs::in_memory(CacheConfig::default());
        assert!(cfs.versions("unknown").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_failures_carry_operation() {
        let flaky = Arc::new(FlakyStore {
            fail_get: Some("cfs:meta:"),
            ..FlakyStore::default()
        });
        let cfs = Cfs::new(flaky, CacheConfig::default());

        let err = cfs.versions("doc.txt").await.unwrap_err();
        assert!(matches!(err, CfsError::Store { operation: "Listing versions of", .. }));

        let err = cfs.metadata("doc.txt", "v2").await.unwrap_err();
        assert!(matches!(err, CfsError::Store { operation: "Reading metadata of", .. }));

        let err = cfs.load_asset("doc.txt?v2").await.unwrap_err();
        assert!(matches!(err, CfsError::Store { operation: "Locating", .. }));
    }
}
