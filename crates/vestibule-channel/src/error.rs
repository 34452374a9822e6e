//! Error types for delivery channels.

use thiserror::Error;

/// Errors for delivery channel operations.
#[derive(Debug, Clone, Error)]
pub enum ChannelError {
    #[error("delivery channel unavailable: {reason}")]
    Unavailable { reason: String },
}

impl ChannelError {
    /// Build an `Unavailable` error from any displayable cause.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}
