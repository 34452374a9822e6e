//! Engine error type.

use thiserror::Error;
use vestibule_channel::ChannelError;
use vestibule_store::StoreError;

/// Errors surfaced by the engine services.
///
/// `UnknownToken` is the 404-class outcome: the token was never issued or
/// its entry expired, and the two are deliberately indistinguishable. The
/// dependency variants are 500-class; callers are expected to retry.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("token not found or expired")]
    UnknownToken,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}
