//! Middleware trait and chain continuation

use crate::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use std::fmt;
use std::sync::Arc;

/// Body type used throughout the pipeline: a fully materialized byte body.
pub type Body = Full<Bytes>;

/// A middleware in the pipeline.
///
/// Implementations receive the request together with the [`Next`]
/// continuation for the remainder of the chain, and return the response
/// they want the upstream caller to see.
#[async_trait]
pub trait Middleware: Send + Sync + fmt::Debug {
    /// Process a request, delegating downstream via `next`.
    async fn call(&self, req: Request<Body>, next: Next) -> Result<Response<Body>>;
}

/// The handler at the end of the chain ("the rest of the pipeline").
pub type HandlerFn = Box<
    dyn Fn(
            Request<Body>,
        )
            -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response<Body>>> + Send>>
        + Send
        + Sync,
>;

/// Continuation for the remaining middlewares and the final handler.
///
/// `Next` is cheap to clone; each request gets its own, and running it
/// consumes it.
pub struct Next {
    stack: Arc<[Arc<dyn Middleware>]>,
    index: usize,
    handler: Option<Arc<HandlerFn>>,
}

impl Next {
    /// Continuation over a middleware stack with no final handler.
    pub fn new(stack: Arc<[Arc<dyn Middleware>]>) -> Self {
        Self {
            stack,
            index: 0,
            handler: None,
        }
    }

    /// Continuation over a middleware stack terminated by `handler`.
    pub fn with_handler(stack: Arc<[Arc<dyn Middleware>]>, handler: HandlerFn) -> Self {
        Self {
            stack,
            index: 0,
            handler: Some(Arc::new(handler)),
        }
    }

    /// Invoke the next middleware, or the final handler once the stack is
    /// exhausted.
    pub async fn run(self, req: Request<Body>) -> Result<Response<Body>> {
        if let Some(middleware) = self.stack.get(self.index) {
            let next = Self {
                stack: Arc::clone(&self.stack),
                index: self.index + 1,
                handler: self.handler.clone(),
            };
            middleware.call(req, next).await
        } else if let Some(handler) = self.handler {
            handler(req).await
        } else {
            Err(Error::Middleware(
                "chain exhausted without a final handler".to_string(),
            ))
        }
    }
}

impl Clone for Next {
    fn clone(&self) -> Self {
        Self {
            stack: Arc::clone(&self.stack),
            index: self.index,
            handler: self.handler.clone(),
        }
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("index", &self.index)
            .field("remaining", &(self.stack.len() - self.index))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct Recorder {
        name: &'static str,
        seen: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl Middleware for Recorder {
        async fn call(&self, req: Request<Body>, next: Next) -> Result<Response<Body>> {
            self.seen.lock().unwrap().push(self.name);
            next.run(req).await
        }
    }

    fn request() -> Request<Body> {
        Request::builder().uri("/test").body(Body::from("")).unwrap()
    }

    #[tokio::test]
    async fn test_exhausted_chain_errors() {
        let stack: Arc<[Arc<dyn Middleware>]> = Arc::new([]);
        let result = Next::new(stack).run(request()).await;
        assert!(matches!(result, Err(Error::Middleware(_))));
    }

    #[tokio::test]
    async fn test_middlewares_run_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let first = Arc::new(Recorder {
            name: "first",
            seen: Arc::clone(&seen),
        }) as Arc<dyn Middleware>;
        let second = Arc::new(Recorder {
            name: "second",
            seen: Arc::clone(&seen),
        }) as Arc<dyn Middleware>;

        let stack: Arc<[Arc<dyn Middleware>]> = Arc::new([first, second]);
        let next = Next::with_handler(
            stack,
            Box::new(|_req| Box::pin(async { Ok(Response::new(Body::from("done"))) })),
        );

        let response = next.run(request()).await.unwrap();
        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_final_handler_receives_request() {
        let stack: Arc<[Arc<dyn Middleware>]> = Arc::new([]);
        let next = Next::with_handler(
            stack,
            Box::new(|req| {
                Box::pin(async move {
                    assert_eq!(req.uri().path(), "/test");
                    Ok(Response::new(Body::from("handled")))
                })
            }),
        );
        assert!(next.run(request()).await.is_ok());
    }
}
