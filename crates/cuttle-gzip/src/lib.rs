//! Gzip compression middleware for cuttle pipelines
//!
//! Compresses response bodies when all of these hold:
//! - the client advertises `gzip` in `Accept-Encoding`
//! - the body is larger than a configurable minimum size
//! - the content-type matches a configured set of substrings
//!
//! Features:
//! - compression runs on a worker pool, never on the request task
//! - owned or caller-supplied worker pool with explicit shutdown semantics
//! - automatic `Content-Encoding` / `Content-Length` rewriting
//! - fail-open: a compression failure returns the original response

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod config;
pub mod encoder;
pub mod middleware;
pub mod pool;

pub use config::GzipConfig;
pub use middleware::GzipMiddleware;
pub use pool::CompressionPool;

use cuttle_core::{PipelineBuilder, Result};
use std::sync::Arc;

/// Register gzip compression on a pipeline.
///
/// Appends a [`GzipMiddleware`] built from `config` to the host's ordered
/// middleware list. The middleware owns its compression pool; construction
/// fails if the pool cannot be created.
pub fn use_gzip_compression(
    builder: PipelineBuilder,
    config: GzipConfig,
) -> Result<PipelineBuilder> {
    Ok(builder.with_middleware(Arc::new(GzipMiddleware::new(config)?)))
}
