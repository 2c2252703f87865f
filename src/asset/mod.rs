//! Versioned asset engine
//!
//! Assets are addressed by `(path, version)` and persisted as two store
//! entries: a small metadata record and the payload bytes. A per-path
//! version index lists every version with backing data.
//!
//! # Store Layout
//!
//! | Key | Value |
//! |-----|-------|
//! | `cfs:meta:{path}:{version}` | `{ name, lastUpdate }` |
//! | `cfs:meta:versions:{path}` | list of versions |
//! | `cfs:fs:{path}:{version}` | payload blob |
//!
//! Expiry is lazy: an entry older than the configured max age is purged
//! when a load discovers it.

mod entry;
mod event;
mod factory;
pub mod keys;
mod metadata;
mod path;

pub use entry::Asset;
pub use event::{AssetEvent, AssetEvents};
pub use factory::Cfs;
pub use metadata::StoredMetadata;
pub use path::{basename, AssetPath, DEFAULT_VERSION};
