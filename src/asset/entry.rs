//! Asset lifecycle: save, load, remove and version switching
//!
//! Every multi-step operation is an ordered chain of independent store
//! calls, not a transaction. Partial states reachable on failure:
//!
//! | Operation | Fails at | Store afterwards |
//! |-----------|----------|------------------|
//! | save | metadata write | unchanged |
//! | save | index read/write | metadata written, index and payload stale |
//! | save | payload write | metadata and index updated, payload missing or stale |
//! | remove | metadata remove | unchanged |
//! | remove | index read/write | metadata gone, index still lists the version |
//! | remove | payload remove | metadata gone, index updated, payload orphaned |
//!
//! Between the index write and the payload write of a save, a reader can see
//! the version listed and still get `NotFound` for the payload.

use super::event::{AssetEvent, AssetEvents, EVENT_CAPACITY};
use super::keys;
use super::metadata::{self, StoredMetadata};
use super::path::{basename, AssetPath, DEFAULT_VERSION};
use crate::blob::Blob;
use crate::config::CacheConfig;
use crate::error::{CfsError, CfsResult};
use crate::store::{KeyValueStore, StoreResult, StoreValue};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

const SAVING: &str = "Saving";
const LOADING: &str = "Loading";
const REMOVING: &str = "Removing";
const SWITCHING: &str = "Switching version of";
const LISTING: &str = "Listing versions of";
const LOCATING: &str = "Locating";

#[derive(Debug)]
struct AssetState {
    name: String,
    version: String,
    payload: Option<Blob>,
    last_update: Option<DateTime<Utc>>,
    loaded: bool,
}

struct Shared {
    path: String,
    state: Mutex<AssetState>,
    store: Arc<dyn KeyValueStore>,
    config: Arc<CacheConfig>,
    events: broadcast::Sender<AssetEvent>,
    first_subscriber: Mutex<Option<AssetEvents>>,
    pending: Mutex<Vec<JoinHandle<()>>>,
    // First background failure not yet returned by `settled`
    failure: Mutex<Option<CfsError>>,
}

/// Handle to one cached asset
///
/// Clones share the same in-memory state. Two handles created separately
/// for the same `(path, version)` do not see each other's changes except
/// through the store.
///
/// Constructors that schedule background work call `tokio::spawn` and must
/// run inside a Tokio runtime.
#[derive(Clone)]
pub struct Asset {
    inner: Arc<Shared>,
}

impl Asset {
    /// Create an asset from an in-memory payload
    ///
    /// The asset is loaded immediately. With auto-save enabled the payload is
    /// persisted in the background and [`AssetEvent::Saved`] fires when done.
    pub fn with_payload(
        store: Arc<dyn KeyValueStore>,
        config: Arc<CacheConfig>,
        path: impl Into<String>,
        name: impl Into<String>,
        payload: Blob,
        version: Option<&str>,
    ) -> Self {
        let state = AssetState {
            name: name.into(),
            version: version.unwrap_or(DEFAULT_VERSION).to_string(),
            payload: Some(payload),
            last_update: Some(Utc::now()),
            loaded: true,
        };

        let asset = Self::build(store, config, path.into(), state);
        asset.emit(AssetEvent::Loaded);

        if asset.inner.config.auto_save {
            asset.spawn_save();
        }

        asset
    }

    /// Create an asset and load it from the store in the background
    ///
    /// Wait for [`AssetEvent::Loaded`] or [`Asset::settled`] before using
    /// the payload.
    pub fn open(
        store: Arc<dyn KeyValueStore>,
        config: Arc<CacheConfig>,
        path: impl Into<String>,
        version: Option<&str>,
    ) -> Self {
        let path = path.into();
        let state = AssetState {
            name: basename(&path),
            version: version.unwrap_or(DEFAULT_VERSION).to_string(),
            payload: None,
            last_update: None,
            loaded: false,
        };

        let asset = Self::build(store, config, path, state);
        let task = asset.clone();
        asset.spawn(async move { task.load().await.map(|_| ()) });
        asset
    }

    /// Resolve `pathname?version` to an asset that exists in the store
    pub async fn locate(
        store: Arc<dyn KeyValueStore>,
        config: Arc<CacheConfig>,
        asset_path: &str,
    ) -> CfsResult<Self> {
        let AssetPath { path, version } = AssetPath::parse(asset_path)?;

        let found = metadata::read_metadata(store.as_ref(), &path, &version)
            .await
            .map_err(|e| report(CfsError::store(LOCATING, &path, &version, e)))?;

        if found.is_none() {
            return Err(CfsError::not_found(path, version));
        }

        debug!("Located asset '{}' (version {})", path, version);
        Ok(Self::open(store, config, path, Some(&version)))
    }

    fn build(
        store: Arc<dyn KeyValueStore>,
        config: Arc<CacheConfig>,
        path: String,
        state: AssetState,
    ) -> Self {
        let (events, first) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Shared {
                path,
                state: Mutex::new(state),
                store,
                config,
                events,
                first_subscriber: Mutex::new(Some(first)),
                pending: Mutex::new(Vec::new()),
                failure: Mutex::new(None),
            }),
        }
    }

    /// Logical path of the asset
    pub fn path(&self) -> &str {
        &self.inner.path
    }

    /// Current version tag
    pub fn version(&self) -> String {
        self.inner.state.lock().version.clone()
    }

    /// Display name
    pub fn name(&self) -> String {
        self.inner.state.lock().name.clone()
    }

    /// Whether the payload is resident and consistent with the store
    pub fn is_loaded(&self) -> bool {
        self.inner.state.lock().loaded
    }

    /// Time of the last successful save, as known to this handle
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.inner.state.lock().last_update
    }

    /// Resident payload, if any
    pub fn payload(&self) -> Option<Blob> {
        self.inner.state.lock().payload.clone()
    }

    /// Size of the resident payload
    pub fn size(&self) -> Option<u64> {
        self.inner.state.lock().payload.as_ref().map(Blob::size)
    }

    /// Mime type of the resident payload
    pub fn mime_type(&self) -> Option<String> {
        self.inner
            .state
            .lock()
            .payload
            .as_ref()
            .map(|blob| blob.mime_type().to_string())
    }

    /// Replace the payload
    ///
    /// With auto-save enabled this schedules a background save.
    pub fn set_payload(&self, payload: Blob) {
        self.inner.state.lock().payload = Some(payload);

        if self.inner.config.auto_save {
            self.spawn_save();
        }
    }

    /// Subscribe to lifecycle events
    ///
    /// The first subscriber also receives events emitted during construction.
    pub fn subscribe(&self) -> AssetEvents {
        self.inner
            .first_subscriber
            .lock()
            .take()
            .unwrap_or_else(|| self.inner.events.subscribe())
    }

    /// Wait for every background save or load scheduled so far
    ///
    /// Returns the first failure since the previous call, if any.
    pub async fn settled(&self) -> CfsResult<()> {
        let handles = std::mem::take(&mut *self.inner.pending.lock());
        let mut outcome = Ok(());

        for handle in handles {
            if let Err(e) = handle.await {
                if outcome.is_ok() {
                    outcome = Err(CfsError::Task(e.to_string()));
                }
            }
        }

        match self.inner.failure.lock().take() {
            Some(err) => Err(err),
            None => outcome,
        }
    }

    /// Persist metadata, version index and payload, in that order
    pub async fn save(&self) -> CfsResult<()> {
        let (name, version, payload) = {
            let state = self.inner.state.lock();
            (state.name.clone(), state.version.clone(), state.payload.clone())
        };

        let Some(payload) = payload else {
            return Err(report(CfsError::NotLoaded {
                path: self.inner.path.clone(),
                version,
            }));
        };

        let stored = StoredMetadata {
            name,
            last_update: Utc::now(),
        };

        self.save_chain(&version, &stored, payload)
            .await
            .map_err(|e| report(CfsError::store(SAVING, self.path(), &version, e)))?;

        {
            let mut state = self.inner.state.lock();
            if state.version == version {
                state.last_update = Some(stored.last_update);
                state.loaded = state.payload.is_some();
            }
        }

        self.emit(AssetEvent::Loaded);

        if self.inner.config.logs_info() {
            info!("Asset '{}' (version {}) saved.", self.path(), version);
        }

        Ok(())
    }

    async fn save_chain(
        &self,
        version: &str,
        stored: &StoredMetadata,
        payload: Blob,
    ) -> StoreResult<()> {
        let store = self.inner.store.as_ref();
        let path = self.path();

        metadata::write_metadata(store, path, version, stored).await?;

        let mut versions = metadata::read_versions(store, path).await?;
        metadata::insert_version(&mut versions, version);
        metadata::write_versions(store, path, &versions).await?;

        store
            .set(&keys::payload(path, version), StoreValue::Blob(payload))
            .await
    }

    /// Load the current version from the store
    ///
    /// A stale entry is removed, [`AssetEvent::Expire`] fires and the call
    /// fails with [`CfsError::Expired`].
    pub async fn load(&self) -> CfsResult<Blob> {
        let version = self.version();
        self.load_chain(&version).await.map_err(report)
    }

    async fn load_chain(&self, version: &str) -> CfsResult<Blob> {
        let stored = self.fetch_metadata(LOADING, version).await?;

        {
            let mut state = self.inner.state.lock();
            if state.version == version {
                if !stored.name.is_empty() {
                    state.name = stored.name.clone();
                }
                state.last_update = Some(stored.last_update);
            }
        }

        if self.inner.config.is_expired(stored.last_update, Utc::now()) {
            debug!(
                "Asset '{}' (version {}) is older than {:?}, purging",
                self.path(),
                version,
                self.inner.config.max_age()
            );

            self.remove_chain(version)
                .await
                .map_err(|e| CfsError::store(REMOVING, self.path(), version, e))?;
            self.emit(AssetEvent::Expire(version.to_string()));

            return Err(CfsError::Expired {
                path: self.inner.path.clone(),
                version: version.to_string(),
            });
        }

        let payload = self.fetch_payload(LOADING, version).await?;

        let applied = {
            let mut state = self.inner.state.lock();
            let current = state.version == version;
            if current {
                state.payload = Some(payload.clone());
                state.loaded = true;
            }
            current
        };

        if !applied {
            debug!(
                "Asset '{}' moved off version {} while loading it, keeping the newer state",
                self.path(),
                version
            );
            return Ok(payload);
        }

        self.emit(AssetEvent::Loaded);

        if self.inner.config.logs_info() {
            info!("Asset '{}' (version {}) loaded.", self.path(), version);
        }

        Ok(payload)
    }

    /// Delete the current version: metadata, then index entry, then payload
    ///
    /// Returns the removed version. Removing a version that was never saved
    /// still runs the whole chain and succeeds.
    pub async fn remove(&self) -> CfsResult<String> {
        let version = self.version();

        self.remove_chain(&version)
            .await
            .map_err(|e| report(CfsError::store(REMOVING, self.path(), &version, e)))?;

        Ok(version)
    }

    async fn remove_chain(&self, version: &str) -> StoreResult<()> {
        let store = self.inner.store.as_ref();
        let path = self.path();

        store.remove(&keys::meta(path, version)).await?;

        let mut versions = metadata::read_versions(store, path).await?;
        metadata::remove_version(&mut versions, version);
        metadata::write_versions(store, path, &versions).await?;

        store.remove(&keys::payload(path, version)).await?;

        {
            let mut state = self.inner.state.lock();
            if state.version == version {
                state.payload = None;
                state.loaded = false;
            }
        }

        self.emit(AssetEvent::Removed);
        Ok(())
    }

    /// Versions of this path present in the store
    pub async fn versions(&self) -> CfsResult<Vec<String>> {
        metadata::read_versions(self.inner.store.as_ref(), self.path())
            .await
            .map_err(|e| report(CfsError::store(LISTING, self.path(), self.version(), e)))
    }

    /// Switch this handle to another stored version
    ///
    /// Unlike [`Asset::load`], no expiry check is made.
    pub async fn load_version(&self, version: &str) -> CfsResult<()> {
        self.inner.state.lock().loaded = false;
        self.switch_chain(version).await.map_err(report)
    }

    async fn switch_chain(&self, version: &str) -> CfsResult<()> {
        let stored = self.fetch_metadata(SWITCHING, version).await?;
        let payload = self.fetch_payload(SWITCHING, version).await?;

        {
            let mut state = self.inner.state.lock();
            state.version = version.to_string();
            state.payload = Some(payload);
            state.last_update = Some(stored.last_update);
            state.loaded = true;
        }

        self.emit(AssetEvent::Loaded);

        if self.inner.config.logs_info() {
            info!("Asset '{}' switched to version {}.", self.path(), version);
        }

        Ok(())
    }

    async fn fetch_metadata(
        &self,
        operation: &'static str,
        version: &str,
    ) -> CfsResult<StoredMetadata> {
        metadata::read_metadata(self.inner.store.as_ref(), self.path(), version)
            .await
            .map_err(|e| CfsError::store(operation, self.path(), version, e))?
            .ok_or_else(|| CfsError::not_found(self.path(), version))
    }

    async fn fetch_payload(&self, operation: &'static str, version: &str) -> CfsResult<Blob> {
        let key = keys::payload(self.path(), version);

        let value = self
            .inner
            .store
            .get(&key)
            .await
            .and_then(|value| value.map(|v| v.into_blob(&key)).transpose())
            .map_err(|e| CfsError::store(operation, self.path(), version, e))?;

        value.ok_or_else(|| CfsError::not_found(self.path(), version))
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = CfsResult<()>> + Send + 'static,
    {
        let inner = self.inner.clone();
        let handle = tokio::spawn(async move {
            // Already logged by the operation itself
            if let Err(err) = task.await {
                let mut failure = inner.failure.lock();
                if failure.is_none() {
                    *failure = Some(err);
                }
            }
        });

        let mut pending = self.inner.pending.lock();
        pending.retain(|handle| !handle.is_finished());
        pending.push(handle);
    }

    fn spawn_save(&self) {
        let task = self.clone();
        self.spawn(async move {
            task.save().await?;
            task.emit(AssetEvent::Saved);
            Ok(())
        });
    }

    fn emit(&self, event: AssetEvent) {
        // No receivers is fine
        let _ = self.inner.events.send(event);
    }
}

/// Log a failed operation at ERROR and hand the error back
pub(super) fn report(err: CfsError) -> CfsError {
    error!("{}", err);
    err
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Asset")
            .field("path", &self.inner.path)
            .field("version", &state.version)
            .field("name", &state.name)
            .field("loaded", &state.loaded)
            .field("size", &state.payload.as_ref().map(Blob::size))
            .field("backend", &self.inner.store.backend_name())
            .finish()
    }
}
