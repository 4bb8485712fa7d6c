use std::time::Duration;

use multiverse_core::error::CoreError;

use crate::retry::Retryable;

/// Failures surfaced by the sync pipeline.
///
/// Whether a failure is worth retrying is a property of the variant, see
/// [`Retryable`].
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Upstream answered 429. The fetcher has already slept `retry_after`.
    #[error("Upstream rate limited (waited {}s)", retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    /// Transport-level failure: connect, timeout, body read.
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream returned a non-2xx status other than 429.
    #[error("Upstream returned HTTP {status}")]
    HttpStatus { status: u16 },

    /// Response body or page envelope could not be decoded.
    #[error("Malformed upstream response: {0}")]
    Decode(String),

    /// A URL (seed or cursor) could not be parsed.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A single record failed validation before write.
    #[error("Invalid record: {0}")]
    Validation(String),

    /// The local store rejected a write.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Retryable for SyncError {
    fn is_retryable(&self) -> bool {
        match self {
            SyncError::RateLimited { .. } => true,
            // A request that could not even be built will fail the same way again.
            SyncError::Network(e) => !e.is_builder(),
            SyncError::HttpStatus { status } => *status >= 500,
            SyncError::Decode(_)
            | SyncError::InvalidUrl { .. }
            | SyncError::Validation(_)
            | SyncError::Database(_) => false,
        }
    }
}

impl From<CoreError> for SyncError {
    fn from(err: CoreError) -> Self {
        SyncError::Validation(err.to_string())
    }
}
