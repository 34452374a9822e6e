//! Error types for pass signing and verification.

use thiserror::Error;

/// Errors for pass operations.
///
/// Verification failures are expected traffic for the gatekeeper: an expired
/// or malformed pass means "no valid pass", never a fatal error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PassError {
    /// The signing secret was empty.
    #[error("signing secret must not be empty")]
    EmptySecret,

    /// The pass is not structurally a signed token.
    #[error("malformed pass: {reason}")]
    Malformed { reason: String },

    /// The signature does not match the payload.
    #[error("pass signature mismatch")]
    SignatureMismatch,

    /// The pass was valid once but its expiry has passed.
    #[error("pass expired")]
    Expired,
}

impl PassError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}
