use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Main error type for the streaming server
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Video not found: {0}")]
    NotFound(String),

    #[error("Credentials required for video: {0}")]
    Unauthorized(String),

    #[error("Caller not entitled to video: {0}")]
    Forbidden(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StreamError {
    /// Short label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            StreamError::NotFound(_) => "not_found",
            StreamError::Unauthorized(_) => "unauthorized",
            StreamError::Forbidden(_) => "forbidden",
            StreamError::Io(_) => "io",
            StreamError::Config(_) => "config",
        }
    }

    /// HTTP status this error is surfaced as
    pub fn status(&self) -> StatusCode {
        match self {
            StreamError::NotFound(_) => StatusCode::NOT_FOUND,
            StreamError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            StreamError::Forbidden(_) => StatusCode::FORBIDDEN,
            StreamError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for StreamError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            StreamError::Unauthorized(_) => {
                (status, [(header::WWW_AUTHENTICATE, "Bearer")]).into_response()
            }
            StreamError::NotFound(_) | StreamError::Forbidden(_) => status.into_response(),
            StreamError::Io(_) if status == StatusCode::NOT_FOUND => status.into_response(),
            other => (status, other.to_string()).into_response(),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, StreamError>;
