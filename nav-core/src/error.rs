/// Error types for the metadata client
use thiserror::Error;

/// Failure of a single metadata fetch.
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[cfg(feature = "api")]
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Bad response status {status} for {url}")]
    Status { url: String, status: u16 },

    /// Failed to decode the JSON body
    #[error("Failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// Server answered with an empty list
    #[error("Empty response for {0}")]
    Empty(String),
}

/// Type alias for Results using ApiError
pub type Result<T> = std::result::Result<T, ApiError>;
