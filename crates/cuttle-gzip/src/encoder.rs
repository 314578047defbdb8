//! Blocking gzip encoding
//!
//! CPU-bound; callers in async context must go through
//! [`CompressionPool`](crate::pool::CompressionPool) instead of calling
//! [`gzip_compress`] directly.

use bytes::Bytes;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

/// Highest level flate2 accepts for gzip.
const MAX_LEVEL: u32 = 9;

/// Compress `data` with gzip at the given level (clamped to 9).
pub fn gzip_compress(data: &[u8], level: u32) -> std::io::Result<Bytes> {
    let mut encoder = GzEncoder::new(
        Vec::with_capacity(data.len() / 2),
        Compression::new(level.min(MAX_LEVEL)),
    );
    encoder.write_all(data)?;
    let compressed = encoder.finish()?;
    Ok(Bytes::from(compressed))
}
