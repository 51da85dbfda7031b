//! Error types for feed fetching.
//!
//! A failed fetch has no recovery path: the caller logs it and the
//! corresponding overlay stays empty.

/// Errors that can occur while fetching a GeoJSON feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {message}")]
    Client {
        /// Builder error description.
        message: String,
    },

    /// The request could not be sent or the body could not be read.
    #[error("request to {url} failed: {message}")]
    Request {
        /// The feed URL.
        url: String,
        /// Transport error description.
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("{url} returned {status}: {body}")]
    Status {
        /// The feed URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The body is not a GeoJSON `FeatureCollection`.
    #[error("{url} is not a GeoJSON FeatureCollection: {source}")]
    Decode {
        /// The feed URL.
        url: String,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}
