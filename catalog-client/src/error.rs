//! Client error types
//!
//! Only transport and decoding problems are errors. A backend answer with
//! `success: false` is a normal [`Envelope`](shared::Envelope) value.

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Body was not a JSON envelope
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (token file, upload sources)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad configuration (base URL, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session token could not be read
    #[error("Session error: {0}")]
    Session(String),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
