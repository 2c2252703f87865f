//! Error types for cfs
//!
//! All modules use `CfsResult<T>` as their return type. Store adapters
//! report failures with their own [`StoreError`], which the asset engine
//! wraps with the operation, path and version it was working on.

use crate::store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cfs operations
pub type CfsResult<T> = Result<T, CfsError>;

/// All errors that can occur in cfs
#[derive(Error, Debug)]
pub enum CfsError {
    // Asset errors
    #[error("Asset '{path}' (version {version}) not found")]
    NotFound { path: String, version: String },

    #[error("Asset '{path}' (version {version}) was expired")]
    Expired { path: String, version: String },

    #[error("{operation} asset '{path}' (version {version}) failed: {source}")]
    Store {
        operation: &'static str,
        path: String,
        version: String,
        #[source]
        source: StoreError,
    },

    #[error("Asset '{path}' (version {version}) has no payload to save")]
    NotLoaded { path: String, version: String },

    #[error("Invalid asset path: '{0}'")]
    InvalidAssetPath(String),

    #[error("Background asset task failed: {0}")]
    Task(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl CfsError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Wrap a store failure with the asset it happened on
    pub fn store(
        operation: &'static str,
        path: impl Into<String>,
        version: impl Into<String>,
        source: StoreError,
    ) -> Self {
        Self::Store {
            operation,
            path: path.into(),
            version: version.into(),
            source,
        }
    }

    /// Create a not-found error for a (path, version) pair
    pub fn not_found(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self::NotFound {
            path: path.into(),
            version: version.into(),
        }
    }

    /// True when the asset never existed (or its payload is missing)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True when the asset existed but aged out
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired { .. })
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => Some("List known versions with: cfs versions <path>"),
            Self::Expired { .. } => Some("Store the asset again with: cfs put <path> <file>"),
            Self::InvalidAssetPath(_) => Some("Asset paths look like: images/logo.png?v2"),
            Self::ConfigInvalid { .. } => Some("Reset the configuration with: cfs config init --force"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CfsError::not_found("doc.txt", "v2");
        assert_eq!(err.to_string(), "Asset 'doc.txt' (version v2) not found");
    }

    #[test]
    fn store_error_carries_context() {
        let err = CfsError::store(
            "Saving",
            "images/logo.png",
            "default",
            StoreError::Backend("disk full".to_string()),
        );
        let message = err.to_string();
        assert!(message.contains("Saving"));
        assert!(message.contains("images/logo.png"));
        assert!(message.contains("default"));
        assert!(message.contains("disk full"));
    }

    #[test]
    fn expired_is_distinct_from_not_found() {
        let expired = CfsError::Expired {
            path: "a".to_string(),
            version: "default".to_string(),
        };
        assert!(expired.is_expired());
        assert!(!expired.is_not_found());
        assert!(CfsError::not_found("a", "default").is_not_found());
    }

    #[test]
    fn error_hint() {
        let err = CfsError::InvalidAssetPath(String::new());
        assert_eq!(err.hint(), Some("Asset paths look like: images/logo.png?v2"));
        assert!(CfsError::Task("boom".to_string()).hint().is_none());
    }
}
