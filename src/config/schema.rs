//! Configuration schema for cfs
//!
//! Configuration is stored at `~/.config/cfs/config.toml`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// One day, in milliseconds
pub const DEFAULT_MAX_AGE_MS: u64 = 24 * 60 * 60 * 1000;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Asset engine settings
    pub cache: CacheConfig,

    /// Store backend settings
    pub store: StoreConfig,
}

/// Engine log verbosity
///
/// Only gates informational messages; errors are always logged. Config
/// files may spell it as a name (`"info"`) or as the numeric level (`0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "LogLevelRepr")]
pub enum LogLevel {
    Info = 0,
    Warn = 1,
    Error = 2,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LogLevelRepr {
    Level(u8),
    Name(String),
}

impl TryFrom<LogLevelRepr> for LogLevel {
    type Error = String;

    fn try_from(repr: LogLevelRepr) -> Result<Self, String> {
        match repr {
            LogLevelRepr::Level(level) => {
                Self::from_u8(level).ok_or_else(|| format!("unknown log level {}", level))
            }
            LogLevelRepr::Name(name) => name.parse(),
        }
    }
}

impl LogLevel {
    /// Parse a numeric level (INFO=0, WARN=1, ERROR=2)
    pub fn from_u8(level: u8) -> Option<Self> {
        match level {
            0 => Some(Self::Info),
            1 => Some(Self::Warn),
            2 => Some(Self::Error),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" | "0" => Ok(Self::Info),
            "warn" | "1" => Ok(Self::Warn),
            "error" | "2" => Ok(Self::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

/// Asset engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Minimum level for engine info logging
    pub log_level: LogLevel,

    /// Persist assets when created with a payload or when the payload changes
    pub auto_save: bool,

    /// Age in milliseconds after which a stored asset is expired on load
    pub max_age_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Error,
            auto_save: true,
            max_age_ms: DEFAULT_MAX_AGE_MS,
        }
    }
}

impl CacheConfig {
    /// Whether successful saves and loads are reported
    pub fn logs_info(&self) -> bool {
        self.log_level == LogLevel::Info
    }

    /// Expiry threshold
    pub fn max_age(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.max_age_ms)
    }

    /// An asset is expired once its age strictly exceeds `max_age`
    pub fn is_expired(&self, last_update: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let age_ms = now.signed_duration_since(last_update).num_milliseconds();
        u64::try_from(age_ms).is_ok_and(|age| age > self.max_age_ms)
    }
}

/// Store backend settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory for the file store (defaults to the data dir)
    pub dir: Option<PathBuf>,
}
