//! Queue entries and their status machine.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{TicketNumber, Token};

/// Status of a queue entry.
///
/// The only transition is `Waiting → Allowed`; it never reverts. Unknown wire
/// values deserialize into [`EntryStatus::Other`] and are passed through
/// verbatim so newer writers can introduce states without breaking older
/// readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    /// Holding a ticket, not yet admitted.
    Waiting,
    /// Promoted; may be exchanged for a pass.
    Allowed,
    /// Forward-compatible passthrough for statuses this version doesn't know.
    #[serde(untagged)]
    Other(String),
}

impl EntryStatus {
    /// Whether this entry is still waiting for admission.
    #[must_use]
    pub fn is_waiting(&self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// Whether this entry has been admitted.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Wire representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Waiting => "WAITING",
            Self::Allowed => "ALLOWED",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One admitted-or-waiting client in the queue.
///
/// Created by the enqueue service, promoted (`Waiting → Allowed`) by the
/// admission processor, and removed by the store's expiry mechanism once
/// `expires_at` has passed, regardless of status. An entry absent from the
/// store is indistinguishable from one that expired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    /// Opaque primary key.
    pub token: Token,

    /// Current position in the status machine.
    pub status: EntryStatus,

    /// Globally ordered ticket.
    pub ticket_number: TicketNumber,

    /// When the entry was created.
    pub created_at: DateTime<Utc>,

    /// Eligible for removal after this instant, whatever the status.
    pub expires_at: DateTime<Utc>,
}

impl QueueEntry {
    /// Build a fresh `Waiting` entry expiring `ttl_secs` from `now`.
    #[must_use]
    pub fn new_waiting(
        token: Token,
        ticket_number: TicketNumber,
        now: DateTime<Utc>,
        ttl_secs: u64,
    ) -> Self {
        Self {
            token,
            status: EntryStatus::Waiting,
            ticket_number,
            created_at: now,
            expires_at: now + Duration::seconds(i64::try_from(ttl_secs).unwrap_or(i64::MAX)),
        }
    }

    /// Whether the entry's time-to-live has elapsed at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_at(now: DateTime<Utc>) -> QueueEntry {
        QueueEntry::new_waiting(Token::new(), TicketNumber::new(1), now, 60)
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(
            serde_json::to_string(&EntryStatus::Waiting).unwrap(),
            "\"WAITING\""
        );
        assert_eq!(
            serde_json::to_string(&EntryStatus::Allowed).unwrap(),
            "\"ALLOWED\""
        );
    }

    #[test]
    fn unknown_status_round_trips_verbatim() {
        let status: EntryStatus = serde_json::from_str("\"QUARANTINED\"").unwrap();
        assert_eq!(status, EntryStatus::Other("QUARANTINED".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"QUARANTINED\"");
    }

    #[test]
    fn new_entries_wait() {
        let now = Utc::now();
        let entry = entry_at(now);
        assert!(entry.status.is_waiting());
        assert_eq!(entry.created_at, now);
    }

    #[test]
    fn expiry_boundary() {
        let now = Utc::now();
        let entry = entry_at(now);
        assert!(!entry.is_expired(now));
        assert!(!entry.is_expired(now + Duration::seconds(59)));
        assert!(entry.is_expired(now + Duration::seconds(60)));
        assert!(entry.is_expired(now + Duration::seconds(61)));
    }

    #[test]
    fn camel_case_wire_shape() {
        let now = Utc::now();
        let entry = entry_at(now);
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("ticketNumber").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("expiresAt").is_some());
    }
}
