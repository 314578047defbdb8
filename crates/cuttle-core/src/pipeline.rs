//! Host-side middleware registration
//!
//! The host application owns an ordered list of middlewares. It registers
//! them once through [`PipelineBuilder`], then builds a shared stack from
//! which a [`Next`](crate::middleware::Next) is constructed per request.

use crate::middleware::Middleware;
use std::sync::Arc;

/// Ordered middleware list builder.
///
/// Registration order is invocation order.
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl PipelineBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    /// Append a middleware to the end of the chain
    #[must_use]
    pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// Build the shared middleware stack
    #[must_use]
    pub fn build(self) -> Arc<[Arc<dyn Middleware>]> {
        self.middlewares.into()
    }

    /// Number of registered middlewares
    #[must_use]
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Check if the chain is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}
