//! Error types for cuttle pipelines

/// Result type alias using [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Main error type for cuttle middlewares
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid header name, header value, or message construction
    #[error("HTTP error: {0}")]
    Http(#[from] http::Error),

    /// Middleware chain error
    #[error("Middleware error: {0}")]
    Middleware(String),

    /// Configuration rejected at construction time
    #[error("Configuration error: {0}")]
    Config(String),

    /// The worker pool rejected or lost a submitted task
    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    /// I/O error, including codec failures
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (should not happen in production)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Convert error to HTTP status code
    pub fn to_status_code(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Error::Http(_) => StatusCode::BAD_REQUEST,
            Error::WorkerPool(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            Error::WorkerPool("shutting down".to_string()).to_status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            Error::Config("bad handled type".to_string()).to_status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::Middleware("chain exhausted".to_string()).to_status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "encoder failed");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("encoder failed"));
    }
}
