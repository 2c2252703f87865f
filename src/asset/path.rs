//! Asset path parsing
//!
//! An asset path is `{pathname}?{version}`; the version part is optional.

use crate::error::{CfsError, CfsResult};
use std::fmt;

/// Version used when none is given
pub const DEFAULT_VERSION: &str = "default";

const VERSION_SEPARATOR: char = '?';

/// A parsed `(path, version)` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetPath {
    pub path: String,
    pub version: String,
}

impl AssetPath {
    /// Build from parts, defaulting the version
    pub fn new(path: impl Into<String>, version: Option<&str>) -> Self {
        Self {
            path: path.into(),
            version: version.unwrap_or(DEFAULT_VERSION).to_string(),
        }
    }

    /// Parse `pathname?version`
    ///
    /// Empty segments are ignored, so `?v2` has no pathname and
    /// `logo.png?` uses the default version.
    pub fn parse(asset_path: &str) -> CfsResult<Self> {
        let mut segments = asset_path
            .split(VERSION_SEPARATOR)
            .filter(|segment| !segment.is_empty());

        let path = segments
            .next()
            .ok_or_else(|| CfsError::InvalidAssetPath(asset_path.to_string()))?;

        Ok(Self::new(path, segments.next()))
    }

    /// Display name: the last component of the path
    pub fn name(&self) -> String {
        basename(&self.path)
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.path, VERSION_SEPARATOR, self.version)
    }
}

/// Last `/`-separated component, ignoring trailing slashes
pub fn basename(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    trimmed
        .rsplit('/')
        .next()
        .unwrap_or(trimmed)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_version() {
        let parsed = AssetPath::parse("doc.txt?v2").unwrap();
        assert_eq!(parsed.path, "doc.txt");
        assert_eq!(parsed.version, "v2");
    }

    #[test]
    fn parse_defaults_version() {
        assert_eq!(AssetPath::parse("images/logo.png").unwrap().version, DEFAULT_VERSION);
        assert_eq!(AssetPath::parse("images/logo.png?").unwrap().version, DEFAULT_VERSION);
    }

    #[test]
    fn parse_skips_empty_segments() {
        let parsed = AssetPath::parse("??a.css??v3").unwrap();
        assert_eq!(parsed, AssetPath::new("a.css", Some("v3")));
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(matches!(
            AssetPath::parse("?"),
            Err(CfsError::InvalidAssetPath(_))
        ));
        assert!(AssetPath::parse("").is_err());
    }

    #[test]
    fn name_is_basename() {
        assert_eq!(AssetPath::parse("images/icons/logo.png?v1").unwrap().name(), "logo.png");
        assert_eq!(basename("doc.txt"), "doc.txt");
        assert_eq!(basename("fonts/"), "fonts");
    }

    #[test]
    fn display_roundtrips() {
        let path = AssetPath::new("doc.txt", None);
        assert_eq!(path.to_string(), "doc.txt?default");
        assert_eq!(AssetPath::parse(&path.to_string()).unwrap(), path);
    }
}
