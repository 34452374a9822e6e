//! Test fixtures for common vestibule types.

use std::sync::Arc;

use vestibule_core::{Clock, DateTime, EntryStatus, QueueEntry, TicketNumber, Token, Utc};
use vestibule_pass::{PassSigner, SigningSecret};

/// Shared test signing secret.
#[must_use]
pub fn test_secret() -> SigningSecret {
    SigningSecret::new(b"vestibule-test-secret").expect("non-empty test secret")
}

/// A pass signer on the given clock with the default TTL.
#[must_use]
pub fn test_signer(clock: Arc<dyn Clock>) -> PassSigner {
    PassSigner::new(test_secret(), clock)
}

/// A `WAITING` entry created at `now` with a one-hour TTL.
#[must_use]
pub fn waiting_entry(ticket: u64, now: DateTime<Utc>) -> QueueEntry {
    QueueEntry::new_waiting(Token::new(), TicketNumber::new(ticket), now, 3600)
}

/// An `ALLOWED` entry created at `now` with a one-hour TTL.
#[must_use]
pub fn allowed_entry(ticket: u64, now: DateTime<Utc>) -> QueueEntry {
    let mut entry = waiting_entry(ticket, now);
    entry.status = EntryStatus::Allowed;
    entry
}
