//! Pass claims.

use serde::{Deserialize, Serialize};
use vestibule_core::Token;

/// Default pass lifetime: 300 seconds.
pub const DEFAULT_PASS_TTL_SECS: u64 = 300;

/// Claims carried by a signed pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassClaims {
    /// The queue-entry token this pass is scoped to.
    pub sub: Token,

    /// Issued at (Unix seconds).
    pub iat: u64,

    /// Expires at (Unix seconds).
    pub exp: u64,
}

impl PassClaims {
    /// Whether the pass has expired at `now` (Unix seconds).
    #[must_use]
    pub const fn is_expired(&self, now: u64) -> bool {
        now >= self.exp
    }

    /// Seconds of validity left at `now`; 0 once expired.
    #[must_use]
    pub const fn remaining_secs(&self, now: u64) -> u64 {
        self.exp.saturating_sub(now)
    }
}
