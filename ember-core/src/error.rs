//! Error types for ember.
//!
//! One taxonomy for the whole service, using `thiserror`. Only
//! listing-level failures are ever surfaced to callers; per-item failures
//! inside a fan-out are swallowed by the fetch coordinator.

use thiserror::Error;

use crate::types::ItemId;

/// Result type alias using `EmberError`.
pub type Result<T> = std::result::Result<T, EmberError>;

/// Main error type for all ember operations.
#[derive(Debug, Error)]
pub enum EmberError {
    // ═══════════════════════════════════════════════════════════════════════════
    // UPSTREAM ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Transport-level failure reaching the upstream service.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The upstream request exceeded the fixed deadline.
    #[error("upstream request timed out after {seconds}s")]
    UpstreamTimeout {
        /// The configured timeout that was exceeded.
        seconds: u64,
    },

    /// The upstream payload could not be decoded.
    #[error("upstream payload malformed: {0}")]
    UpstreamMalformed(String),

    /// The item does not exist upstream.
    ///
    /// This is an expected, recoverable outcome of `fetch_item`, not a
    /// request failure: the fetch coordinator drops such ids silently.
    #[error("item {0} not found upstream")]
    ItemNotFound(ItemId),

    // ═══════════════════════════════════════════════════════════════════════════
    // LOCAL ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The request's cancellation token fired before the operation finished.
    #[error("operation cancelled")]
    Cancelled,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl EmberError {
    /// Returns true for failures of the upstream service itself
    /// (transport, deadline, undecodable payload) as opposed to a missing
    /// item or a local condition.
    pub fn is_systemic(&self) -> bool {
        matches!(
            self,
            EmberError::UpstreamUnavailable(_)
                | EmberError::UpstreamTimeout { .. }
                | EmberError::UpstreamMalformed(_)
        )
    }

    /// Returns true if this is the expected "no such item" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, EmberError::ItemNotFound(_))
    }
}
