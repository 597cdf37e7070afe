//! Error types for backend relay operations

use thiserror::Error;

/// Result type alias for backend relay operations
pub type Result<T> = std::result::Result<T, BrokerClientError>;

/// Errors that can occur while relaying to the backend broker
#[derive(Error, Debug)]
pub enum BrokerClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timed out
    #[error("Request to backend broker timed out: {0}")]
    Timeout(String),

    /// Connection failed
    #[error("Connection to backend broker failed: {0}")]
    ConnectionFailed(String),

    /// Backend answered but the body could not be read
    #[error("Failed to read backend response body: {0}")]
    BodyError(String),

    /// Failed to encode an outbound body
    #[error("Failed to encode request body: {0}")]
    EncodeError(String),

    /// Failed to parse a backend response
    #[error("Failed to parse backend response: {0}")]
    ParseError(String),
}

impl BrokerClientError {
    /// Classify a transport error from reqwest
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else if err.is_body() || err.is_decode() {
            Self::BodyError(err.to_string())
        } else {
            Self::HttpError(err)
        }
    }
}
