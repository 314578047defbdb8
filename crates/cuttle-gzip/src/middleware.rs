//! Gzip middleware implementation

use crate::config::GzipConfig;
use crate::pool::CompressionPool;
use async_trait::async_trait;
use bytes::Bytes;
use cuttle_core::middleware::{Body, Middleware, Next};
use cuttle_core::{Error, Result};
use http::header::{
    ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE, TRANSFER_ENCODING,
};
use http::response::Parts;
use http::{HeaderValue, Request, Response};
use http_body_util::BodyExt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Gzip compression middleware
///
/// Wraps the rest of the pipeline, awaits its response, and compresses the
/// body when the client advertises gzip, the body exceeds the configured
/// size threshold, and the content-type is eligible. Compression runs on a
/// worker pool so the request task is never blocked by CPU-bound work.
///
/// A failed compression is logged and the original response is returned
/// unchanged: either both `content-encoding` and `content-length` reflect
/// the compressed body, or neither header is touched.
#[derive(Debug)]
pub struct GzipMiddleware {
    config: Arc<GzipConfig>,
    pool: CompressionPool,
}

impl GzipMiddleware {
    /// Create a middleware owning its compression pool.
    ///
    /// The pool is created here and torn down when the middleware is
    /// dropped, aborting any queued compression tasks. Fails if the pool
    /// cannot be created.
    pub fn new(config: GzipConfig) -> Result<Self> {
        Ok(Self {
            config: Arc::new(config.normalized()),
            pool: CompressionPool::owned()?,
        })
    }

    /// Create a middleware submitting to a caller-owned runtime.
    ///
    /// The caller keeps shutdown responsibility for the runtime; this
    /// middleware only submits tasks to it.
    pub fn with_handle(config: GzipConfig, handle: tokio::runtime::Handle) -> Self {
        Self {
            config: Arc::new(config.normalized()),
            pool: CompressionPool::external(handle),
        }
    }
}

#[async_trait]
impl Middleware for GzipMiddleware {
    async fn call(&self, req: Request<Body>, next: Next) -> Result<Response<Body>> {
        // The request is consumed by the rest of the chain; keep the one
        // header the decision needs.
        let accept_encoding = req.headers().get(ACCEPT_ENCODING).cloned();

        let response = next.run(req).await?;

        let (mut parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| Error::Internal(format!("failed to read response body: {e}")))?
            .to_bytes();

        // No content: hand the response back without evaluating the
        // content gates at all.
        if body.is_empty() {
            return Ok(Response::from_parts(parts, Body::from(body)));
        }

        if !should_compress(accept_encoding.as_ref(), &parts, &body, &self.config) {
            return Ok(Response::from_parts(parts, Body::from(body)));
        }

        match self.pool.compress(body.clone(), self.config.level).await {
            Ok(compressed) => {
                debug!(
                    original = body.len(),
                    compressed = compressed.len(),
                    "response compressed"
                );
                apply_gzip_headers(&mut parts, compressed.len());
                Ok(Response::from_parts(parts, Body::from(compressed)))
            }
            Err(e) => {
                // Compression is an optimization, not a correctness
                // requirement: fail open with the untouched original.
                warn!(error = %e, "compression failed, returning uncompressed response");
                Ok(Response::from_parts(parts, Body::from(body)))
            }
        }
    }
}

/// Decide whether a materialized response should be compressed.
///
/// Three independent gates, all required: the client accepts gzip, the body
/// exceeds the size threshold, and the content-type matches a handled
/// entry. Absent or malformed headers count as "no".
fn should_compress(
    accept_encoding: Option<&HeaderValue>,
    parts: &Parts,
    body: &Bytes,
    config: &GzipConfig,
) -> bool {
    let encoding_ok = accept_encoding
        .map(|value| contains_gzip(value.as_bytes()))
        .unwrap_or(false);

    let size_ok = config.exceeds_min_size(body.len());

    let type_ok = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|ct| config.is_handled_type(ct))
        .unwrap_or(false);

    encoding_ok && size_ok && type_ok
}

/// Raw byte scan of the accept-encoding value; matched case-sensitively.
fn contains_gzip(value: &[u8]) -> bool {
    value.windows(4).any(|window| window == b"gzip")
}

/// Rewrite transport headers for the compressed body.
///
/// Runs unconditionally once compression succeeds: the content-type is left
/// as-is, `content-encoding: gzip` is appended, and `content-length` is
/// overwritten so downstream transports never see a stale length.
fn apply_gzip_headers(parts: &mut Parts, compressed_len: usize) {
    parts
        .headers
        .append(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
    parts
        .headers
        .insert(CONTENT_LENGTH, HeaderValue::from(compressed_len));
    // A concrete content-length supersedes any transfer-encoding.
    parts.headers.remove(TRANSFER_ENCODING);
}
