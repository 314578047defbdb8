//! # Cuttle Core
//!
//! Core abstractions shared by cuttle middlewares:
//! - the [`Middleware`] trait and [`Next`] continuation
//! - host-side registration via [`PipelineBuilder`]
//! - common error types
//!
//! A middleware wraps the rest of the pipeline: it receives the request and
//! a [`Next`] value, delegates downstream, and may inspect or rewrite the
//! response before handing it back upstream.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod error;
pub mod middleware;
pub mod pipeline;

pub use error::{Error, Result};
pub use middleware::{Body, HandlerFn, Middleware, Next};
pub use pipeline::PipelineBuilder;

// Re-export commonly used HTTP types
pub use bytes::Bytes;
pub use http::{Request, Response, StatusCode};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::middleware::{Body, Middleware, Next};
    pub use crate::pipeline::PipelineBuilder;
}
