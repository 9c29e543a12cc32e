//! Error types for bpassword-client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Failure categories surfaced by the credential API client.
///
/// HTTP error statuses map onto fixed variants; transport failures are
/// classified by the typed predicates on [`reqwest::Error`] rather than by
/// inspecting error text.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("API Key not configured")]
    NotConfigured,

    #[error("Invalid API Key")]
    Unauthorized,

    #[error("Access forbidden")]
    Forbidden,

    #[error("Resource not found")]
    NotFound,

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("{0}")]
    RequestFailed(String),

    #[error("Network error. Check your connection and API URL.")]
    Network,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    Unknown(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        // Connection refused, DNS/TLS failure, timeout, or an unsendable
        // request (including a malformed base URL) all count as "can't reach
        // the service". Anything else (body decode etc.) passes through.
        if err.is_connect() || err.is_timeout() || err.is_request() || err.is_builder() {
            ApiError::Network
        } else {
            ApiError::Unknown(err.to_string())
        }
    }
}
