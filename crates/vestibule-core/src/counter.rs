//! The singleton counter record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Selects one of the counter record's monotone fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CounterField {
    /// The issue watermark: the highest ticket number handed out.
    NextTicket,
    /// The promotion watermark: advanced once per successfully promoted entry.
    NowServing,
}

impl CounterField {
    /// Field name as stored on the counter record.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NextTicket => "nextTicket",
            Self::NowServing => "nowServing",
        }
    }
}

impl fmt::Display for CounterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Singleton record holding the global ticket sequence and the now-serving
/// watermark.
///
/// Both fields are mutated only by atomic increment and never decrease. The
/// record lives in the ticket store under a reserved key that cannot collide
/// with any token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterRecord {
    /// Highest ticket number issued so far; 0 before the first join.
    pub next_ticket: u64,

    /// Ticket-number boundary up to which promotion has occurred.
    pub now_serving: u64,
}

impl CounterRecord {
    /// Read one field by selector.
    #[must_use]
    pub const fn get(&self, field: CounterField) -> u64 {
        match field {
            CounterField::NextTicket => self.next_ticket,
            CounterField::NowServing => self.now_serving,
        }
    }
}
