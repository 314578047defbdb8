//! Configuration for the gzip middleware

use cuttle_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Content-type substrings compressed by default.
///
/// This is a template: every config instance gets its own copy, so
/// customizing one instance never touches another.
const DEFAULT_HANDLED_TYPES: &[&str] = &[
    "json",
    "xml",
    "yaml",
    "html",
    "text/plain",
    "application/javascript",
    "text/css",
    "text/csv",
];

/// Gzip middleware configuration
///
/// Immutable once the middleware is constructed; any number of concurrent
/// requests read it without locking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GzipConfig {
    /// Minimum response body size to compress, in bytes. Bodies must be
    /// strictly larger than this to be compressed.
    #[serde(default = "default_min_size")]
    pub min_size: usize,

    /// Compression level (0-9, clamped to 9 at encode time)
    #[serde(default = "default_level")]
    pub level: u32,

    /// Content-type substrings eligible for compression. Matched as
    /// substrings of the lower-cased content-type, so `json` matches
    /// `application/json`.
    #[serde(default = "default_handled_types")]
    pub handled_types: Vec<String>,
}

impl Default for GzipConfig {
    fn default() -> Self {
        Self {
            min_size: 500,
            level: 5,
            handled_types: default_handled_types(),
        }
    }
}

fn default_min_size() -> usize {
    500
}

fn default_level() -> u32 {
    5
}

fn default_handled_types() -> Vec<String> {
    DEFAULT_HANDLED_TYPES.iter().map(|s| s.to_string()).collect()
}

impl GzipConfig {
    /// Replace the handled content types
    #[must_use]
    pub fn with_handled_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.handled_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the handled content types from raw byte entries.
    ///
    /// Entries must be valid UTF-8; anything else is rejected here, at
    /// construction time, rather than surfacing during a request.
    pub fn with_handled_types_from_bytes<I, T>(mut self, types: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut handled = Vec::new();
        for entry in types {
            let entry = std::str::from_utf8(entry.as_ref())
                .map_err(|e| Error::Config(format!("handled type is not valid UTF-8: {e}")))?;
            handled.push(entry.to_string());
        }
        self.handled_types = handled;
        Ok(self)
    }

    /// Normalize handled-type entries to the comparison convention (single
    /// lower-case form). Called once when the middleware takes ownership of
    /// the config.
    pub(crate) fn normalized(mut self) -> Self {
        for entry in &mut self.handled_types {
            *entry = entry.to_lowercase();
        }
        self
    }

    /// Check if a content-type is eligible for compression
    pub(crate) fn is_handled_type(&self, content_type: &str) -> bool {
        let ct = content_type.to_lowercase();
        self.handled_types.iter().any(|entry| ct.contains(entry))
    }

    /// Check if a body of `len` bytes exceeds the size threshold
    pub(crate) fn exceeds_min_size(&self, len: usize) -> bool {
        len > self.min_size
    }
}
