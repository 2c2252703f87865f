//! cfs - versioned client-side asset cache
//!
//! Keeps binary assets under a logical path and a version tag on top of any
//! async key-value store, with a per-path version index and lazy expiry.

pub mod asset;
pub mod blob;
pub mod cli;
pub mod config;
pub mod error;
pub mod store;

pub use asset::{Asset, AssetEvent, AssetPath, Cfs};
pub use blob::Blob;
pub use config::{CacheConfig, LogLevel};
pub use error::{CfsError, CfsResult};
pub use store::{FileStore, KeyValueStore, MemoryStore};
