//! Store key layout
//!
//! These formats are shared with existing stored data and must not change.

/// Metadata record for one version of an asset
pub fn meta(path: &str, version: &str) -> String {
    format!("cfs:meta:{}:{}", path, version)
}

/// Version index for an asset path
pub fn versions(path: &str) -> String {
    format!("cfs:meta:versions:{}", path)
}

/// Payload bytes for one version of an asset
pub fn payload(path: &str, version: &str) -> String {
    format!("cfs:fs:{}:{}", path, version)
}
