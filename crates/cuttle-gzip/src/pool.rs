//! Worker pool for offloaded compression
//!
//! The middleware never compresses on the request task. Work is submitted
//! to a pool of blocking threads and the calling task suspends until the
//! worker finishes or the pool rejects the task.

use crate::encoder;
use bytes::Bytes;
use cuttle_core::{Error, Result};
use tokio::runtime::{Builder, Handle, Runtime};

/// Execution resource for blocking compression work.
///
/// Either owned (a dedicated runtime created by the middleware and shut
/// down with it) or external (a caller-supplied handle; the pool only
/// submits work and never manages the runtime's lifecycle).
#[derive(Debug)]
pub struct CompressionPool {
    handle: Handle,
    owned: Option<Runtime>,
}

impl CompressionPool {
    /// Create a pool backed by a dedicated runtime.
    ///
    /// Dropping the pool aborts queued tasks rather than waiting for them.
    pub fn owned() -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("cuttle-gzip")
            .build()
            .map_err(|e| Error::WorkerPool(format!("failed to create pool: {e}")))?;
        Ok(Self {
            handle: runtime.handle().clone(),
            owned: Some(runtime),
        })
    }

    /// Wrap a caller-owned runtime handle.
    ///
    /// Shutdown responsibility stays with the caller; dropping the pool
    /// leaves the runtime untouched.
    pub fn external(handle: Handle) -> Self {
        Self {
            handle,
            owned: None,
        }
    }

    /// Compress `body` on the pool and await the result.
    ///
    /// The single suspension point of the middleware: the calling task
    /// yields until the worker completes. A pool that is shutting down
    /// surfaces as [`Error::WorkerPool`]; codec failures as [`Error::Io`].
    pub async fn compress(&self, body: Bytes, level: u32) -> Result<Bytes> {
        let compressed = self
            .handle
            .spawn_blocking(move || encoder::gzip_compress(&body, level))
            .await
            .map_err(|e| Error::WorkerPool(e.to_string()))??;
        Ok(compressed)
    }
}

impl Drop for CompressionPool {
    fn drop(&mut self) {
        // Abort queued work instead of waiting; teardown never raises.
        if let Some(runtime) = self.owned.take() {
            runtime.shutdown_background();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_owned_pool_compresses() {
        let pool = CompressionPool::owned().unwrap();
        let body = Bytes::from("content ".repeat(100));
        let compressed = pool.compress(body.clone(), 5).await.unwrap();
        assert!(compressed.len() < body.len());
    }

    #[tokio::test]
    async fn test_external_pool_uses_caller_runtime() {
        let pool = CompressionPool::external(Handle::current());
        let body = Bytes::from("content ".repeat(100));
        assert!(pool.compress(body, 5).await.is_ok());
    }

    #[tokio::test]
    async fn test_shut_down_pool_rejects_tasks() {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .build()
            .unwrap();
        let handle = runtime.handle().clone();
        runtime.shutdown_background();

        let pool = CompressionPool::external(handle);
        let result = pool.compress(Bytes::from_static(b"body"), 5).await;
        assert!(matches!(result, Err(Error::WorkerPool(_))));
    }
}
