use std::time::Duration;

use thiserror::Error;

/// ORS error code for requests exceeding the server limits, e.g. a route
/// longer than the profile's maximum distance for alternative routes.
pub const ORS_REQUEST_EXCEEDS_LIMITS: u32 = 2004;

#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} (code {code:?}) - {message}")]
    Api {
        status: u16,
        code: Option<u32>,
        message: String,
    },

    #[error("Directions request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// How the resolver should read a failed directions call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request is too large for the service, a weaker request may pass
    ServiceLimitExceeded,

    /// Network error, non-2xx answer, timeout or unreadable body
    ServiceUnavailable,

    /// The request was malformed before it reached the service
    InvalidRequest,
}

/// Classifies a directions failure. Every kind is recoverable by moving on to
/// the next strategy; the distinction only matters for logging.
pub fn classify(error: &DirectionsError) -> FailureKind {
    match error {
        DirectionsError::Api {
            code: Some(ORS_REQUEST_EXCEEDS_LIMITS),
            ..
        } => FailureKind::ServiceLimitExceeded,
        DirectionsError::InvalidRequest(_) => FailureKind::InvalidRequest,
        DirectionsError::Request(_)
        | DirectionsError::Api { .. }
        | DirectionsError::Timeout(_)
        | DirectionsError::Deserialize(_) => FailureKind::ServiceUnavailable,
    }
}
