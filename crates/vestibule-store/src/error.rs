//! Error types for ticket stores.

use thiserror::Error;

/// Errors for ticket store operations.
///
/// Every variant is transient from the caller's point of view: joins and
/// status reads surface it to their caller to retry, and the admission
/// processor leaves the affected message unacknowledged for redelivery.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("ticket store unavailable: {reason}")]
    Unavailable { reason: String },
}

impl StoreError {
    /// Build an `Unavailable` error from any displayable cause.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}
