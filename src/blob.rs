//! Binary payloads

use crate::error::{CfsError, CfsResult};
use bytes::Bytes;
use std::path::Path;

/// Mime type used when nothing better is known
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// An immutable chunk of bytes tagged with a mime type
///
/// Cloning is cheap: the bytes are reference counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    data: Bytes,
    mime_type: String,
}

impl Blob {
    /// Create a blob from raw bytes
    pub fn new(data: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Create a blob, guessing the mime type from a file name
    pub fn guess(data: impl Into<Bytes>, file_name: &str) -> Self {
        Self::new(data, mime_from_path(Path::new(file_name)))
    }

    /// Read a file into a blob
    pub async fn from_file(path: &Path, mime_type: Option<&str>) -> CfsResult<Self> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| CfsError::io(format!("reading {}", path.display()), e))?;

        let mime_type = mime_type.unwrap_or_else(|| mime_from_path(path));
        Ok(Self::new(data, mime_type))
    }

    /// Payload size in bytes
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Mime type of the payload
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Shared handle to the bytes
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Borrow the bytes
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Guess a mime type from a file extension
pub fn mime_from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain",
        Some("html" | "htm") => "text/html",
        Some("css") => "text/css",
        Some("js" | "mjs") => "text/javascript",
        Some("json") => "application/json",
        Some("wasm") => "application/wasm",
        Some("pdf") => "application/pdf",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("mp3") => "audio/mpeg",
        Some("mp4") => "video/mp4",
        _ => DEFAULT_MIME_TYPE,
    }
}
