//! Globally ordered ticket numbers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Globally unique, strictly increasing integer establishing queue order.
///
/// Ticket numbers are assigned by the sequencer's atomic increment and start
/// at 1. Gaps can occur when a join fails after its increment succeeded;
/// duplicates cannot.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Debug, Default,
)]
#[serde(transparent)]
pub struct TicketNumber(u64);

impl TicketNumber {
    /// Wrap a raw ticket value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw ticket value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Queue position relative to a now-serving watermark.
    ///
    /// Best-effort and never negative: a stale watermark or an already-served
    /// ticket clamps to 0.
    #[must_use]
    pub const fn position_behind(self, now_serving: u64) -> u64 {
        self.0.saturating_sub(now_serving)
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TicketNumber {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
