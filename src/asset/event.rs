//! Lifecycle notifications for an asset

use tokio::sync::broadcast;

/// Buffered events per subscriber before it starts lagging
pub(crate) const EVENT_CAPACITY: usize = 64;

/// Something that happened to an asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetEvent {
    /// Payload is resident and consistent with the store
    Loaded,
    /// A background auto-save completed
    Saved,
    /// The version was removed from the store
    Removed,
    /// The version was found stale on load and purged
    Expire(String),
}

/// Receiving end of an asset's event stream
pub type AssetEvents = broadcast::Receiver<AssetEvent>;
