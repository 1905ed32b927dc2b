//! Error types for the resource client.
//!
//! # Design
//! `InvalidArgument` is the only variant returned before any I/O happens; it
//! never reaches the error handler. Every other variant is produced inside the
//! request primitive and is routed through the configured `ErrorHandler`.

/// Errors produced by `ResourceEndpoint` and `ResourceClient`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// A required argument was missing or empty.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The server answered outside the 2xx range. The body is kept for
    /// debugging; it is never interpreted.
    #[error("request failed with status {status}")]
    HttpStatus { status: u16, body: String },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was not the expected JSON.
    #[error("failed to parse response body: {0}")]
    Parse(String),

    /// The request payload could not be encoded as JSON.
    #[error("failed to serialize request body: {0}")]
    Serialization(String),

    /// The client configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Status code carried by an `HttpStatus` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::Config(err.to_string())
    }
}
