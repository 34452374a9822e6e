//! Ticket store interface.

use async_trait::async_trait;
use vestibule_core::{CounterField, CounterRecord, QueueEntry, Token};

use crate::error::StoreError;

/// Result of a conditional promotion attempt.
///
/// The promotion is guarded by "entry currently exists", which keeps a
/// TTL-expired entry from being resurrected. `AlreadyAllowed` is split out of
/// the success case so callers advancing the now-serving watermark do so once
/// per entry, not once per redelivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoteOutcome {
    /// The entry was `WAITING` and is now `ALLOWED`.
    Promoted,
    /// The entry was already `ALLOWED`; re-promotion is a no-op.
    AlreadyAllowed,
    /// No live entry under this token; the condition failed.
    Missing,
}

/// Durable mapping from token to queue entry, plus the singleton counter.
///
/// Keys are tokens plus one reserved counter key. The counter increment must
/// be linearizable across arbitrary concurrent callers; entry writes need
/// only ordinary conditional-update semantics because every transition is
/// idempotent.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Fetch the live entry for `token`.
    ///
    /// Returns `None` for a token that was never issued or whose entry has
    /// expired; the two are indistinguishable by design.
    ///
    /// # Errors
    /// Returns `StoreError` on transient unavailability.
    async fn get_entry(&self, token: &Token) -> Result<Option<QueueEntry>, StoreError>;

    /// Write a freshly created entry.
    ///
    /// Must succeed before the entry's token is handed to a client.
    ///
    /// # Errors
    /// Returns `StoreError` on transient unavailability.
    async fn put_entry(&self, entry: QueueEntry) -> Result<(), StoreError>;

    /// Conditionally set `status = ALLOWED`, guarded by "entry exists".
    ///
    /// # Errors
    /// Returns `StoreError` only for transient failures unrelated to the
    /// condition; condition verdicts come back as [`PromoteOutcome`].
    async fn promote_entry(&self, token: &Token) -> Result<PromoteOutcome, StoreError>;

    /// Atomically increment a counter field, initializing it to 0 if absent,
    /// and return the new value.
    ///
    /// # Errors
    /// Returns `StoreError` on transient unavailability.
    async fn increment_counter(&self, field: CounterField) -> Result<u64, StoreError>;

    /// Read the current counter record.
    ///
    /// An absent record reads as all-zero.
    ///
    /// # Errors
    /// Returns `StoreError` on transient unavailability.
    async fn read_counter(&self) -> Result<CounterRecord, StoreError>;
}
