//! Error types for flag stores.

use thiserror::Error;

/// Errors for remote flag fetches.
///
/// Callers on the request path never surface these to end users; both
/// variants resolve by failing open to "waiting room disabled".
#[derive(Debug, Clone, Error)]
pub enum FlagError {
    #[error("flag store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("flag not found: {name}")]
    Missing { name: String },
}

impl FlagError {
    /// Build an `Unavailable` error from any displayable cause.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}
