//! # API Errors
//!
//! The error taxonomy for the remote API boundary. Remote failures are
//! classified exactly once, in the adapter that observed them, and
//! everything above the boundary matches on these variants instead of
//! inspecting provider-specific error strings.

use crate::types::BatchFailureEntry;

/// A classified failure from the remote eventing API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The named rule does not exist (or vanished mid-operation).
    #[error("rule not found: {0}")]
    NotFound(String),
    /// The request was malformed (bad pattern, bad state, oversized batch).
    /// Retrying the same request cannot succeed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// The remote rejected the call due to rate limiting. Transient; the
    /// host owns retry policy.
    #[error("request throttled: {0}")]
    Throttling(String),
    /// The remote service failed internally. Transient.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// A batched target mutation rejected some of its entries. The engine
    /// treats this as a hard failure of the whole pass; there is no
    /// partial-commit reporting.
    #[error("batch call rejected {} of its entries", .failures.len())]
    PartialBatch { failures: Vec<BatchFailureEntry> },
    /// The request never produced a classified remote response (connection
    /// refused, malformed body, …).
    #[error("transport failure: {0}")]
    Transport(String),
}

impl ApiError {
    /// Whether the host may meaningfully retry the whole operation.
    /// The engine itself never retries; this only informs logging and the
    /// host-facing error code.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::Throttling(_) | ApiError::ServiceUnavailable(_) | ApiError::Transport(_)
        )
    }
}
