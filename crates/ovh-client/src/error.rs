//! OVH API client error types.

/// Errors from OVH API calls.
#[derive(Debug, thiserror::Error)]
pub enum OvhApiError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The API returned a non-2xx status.
    #[error("OVH API {endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Request body serialization failed.
    #[error("failed to serialize request body for {endpoint}: {source}")]
    Serialization {
        endpoint: String,
        source: serde_json::Error,
    },
    /// A header value contained characters HTTP does not allow.
    #[error("invalid value for header {name}: {reason}")]
    InvalidHeader { name: &'static str, reason: String },
    /// A request path did not form a valid URL.
    #[error("invalid request URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ovh_core::ConfigError),
}
