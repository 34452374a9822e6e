//! In-memory ticket store implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vestibule_core::{Clock, CounterField, CounterRecord, EntryStatus, QueueEntry, Token};

use crate::error::StoreError;
use crate::ticket_store::{PromoteOutcome, TicketStore};

/// Result of an expired-entry sweep.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SweepReport {
    /// Entries examined.
    pub scanned: usize,
    /// Expired entries removed.
    pub removed: usize,
}

/// Configuration for the in-memory ticket store.
#[derive(Debug, Clone)]
pub struct MemoryTicketStoreConfig {
    /// Maximum entries removed per sweep (prevents long pauses).
    pub max_removals_per_sweep: usize,
}

impl Default for MemoryTicketStoreConfig {
    fn default() -> Self {
        Self {
            max_removals_per_sweep: 10_000,
        }
    }
}

/// In-memory ticket store.
///
/// Suitable for testing and single-node deployments. Expiry is lazy: reads
/// and promotions treat an entry past its `expires_at` as absent, and
/// [`MemoryTicketStore::sweep_expired`] reclaims the memory in bounded
/// batches.
pub struct MemoryTicketStore {
    entries: RwLock<HashMap<Token, QueueEntry>>,
    counter: RwLock<CounterRecord>,
    clock: Arc<dyn Clock>,
    config: MemoryTicketStoreConfig,
}

impl MemoryTicketStore {
    /// Create a new in-memory store on the given clock.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_config(clock, MemoryTicketStoreConfig::default())
    }

    /// Create a new in-memory store with explicit configuration.
    #[must_use]
    pub fn with_config(clock: Arc<dyn Clock>, config: MemoryTicketStoreConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            counter: RwLock::new(CounterRecord::default()),
            clock,
            config,
        }
    }

    /// Number of live (unexpired) entries.
    #[must_use]
    pub fn live_entries(&self) -> usize {
        let now = self.clock.now();
        self.entries
            .read()
            .values()
            .filter(|e| !e.is_expired(now))
            .count()
    }

    /// Remove expired entries, at most `max_removals_per_sweep` per call.
    pub fn sweep_expired(&self) -> SweepReport {
        let now = self.clock.now();
        let mut entries = self.entries.write();

        let mut report = SweepReport {
            scanned: entries.len(),
            removed: 0,
        };
        let expired: Vec<Token> = entries
            .values()
            .filter(|e| e.is_expired(now))
            .take(self.config.max_removals_per_sweep)
            .map(|e| e.token)
            .collect();
        for token in expired {
            entries.remove(&token);
            report.removed += 1;
        }

        if report.removed > 0 {
            debug!(
                scanned = report.scanned,
                removed = report.removed,
                "swept expired queue entries"
            );
        }
        report
    }
}

#[async_trait]
impl TicketStore for MemoryTicketStore {
    async fn get_entry(&self, token: &Token) -> Result<Option<QueueEntry>, StoreError> {
        let now = self.clock.now();
        Ok(self
            .entries
            .read()
            .get(token)
            .filter(|e| !e.is_expired(now))
            .cloned())
    }

    async fn put_entry(&self, entry: QueueEntry) -> Result<(), StoreError> {
        self.entries.write().insert(entry.token, entry);
        Ok(())
    }

    async fn promote_entry(&self, token: &Token) -> Result<PromoteOutcome, StoreError> {
        let now = self.clock.now();
        let mut entries = self.entries.write();

        let Some(entry) = entries.get_mut(token) else {
            return Ok(PromoteOutcome::Missing);
        };
        if entry.is_expired(now) {
            // The condition ("entry exists") must not resurrect it.
            entries.remove(token);
            return Ok(PromoteOutcome::Missing);
        }
        if entry.status.is_allowed() {
            return Ok(PromoteOutcome::AlreadyAllowed);
        }
        entry.status = EntryStatus::Allowed;
        Ok(PromoteOutcome::Promoted)
    }

    async fn increment_counter(&self, field: CounterField) -> Result<u64, StoreError> {
        let mut counter = self.counter.write();
        let slot = match field {
            CounterField::NextTicket => &mut counter.next_ticket,
            CounterField::NowServing => &mut counter.now_serving,
        };
        *slot += 1;
        Ok(*slot)
    }

    async fn read_counter(&self) -> Result<CounterRecord, StoreError> {
        Ok(*self.counter.read())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use vestibule_core::{ManualClock, TicketNumber};

    use super::*;

    fn store_on(clock: &Arc<ManualClock>) -> MemoryTicketStore {
        MemoryTicketStore::new(Arc::clone(clock) as Arc<dyn Clock>)
    }

    fn waiting_entry(clock: &ManualClock, ticket: u64, ttl_secs: u64) -> QueueEntry {
        QueueEntry::new_waiting(Token::new(), TicketNumber::new(ticket), clock.now(), ttl_secs)
    }

    #[tokio::test]
    async fn put_then_get() {
        let clock = ManualClock::starting_now();
        let store = store_on(&clock);
        let entry = waiting_entry(&clock, 1, 60);
        let token = entry.token;

        store.put_entry(entry.clone()).await.unwrap();
        assert_eq!(store.get_entry(&token).await.unwrap(), Some(entry));
    }

    #[tokio::test]
    async fn unknown_token_is_absent() {
        let clock = ManualClock::starting_now();
        let store = store_on(&clock);
        assert_eq!(store.get_entry(&Token::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_entry_reads_as_absent() {
        let clock = ManualClock::starting_now();
        let store = store_on(&clock);
        let entry = waiting_entry(&clock, 1, 60);
        let token = entry.token;
        store.put_entry(entry).await.unwrap();

        clock.advance(Duration::from_secs(61));
        assert_eq!(store.get_entry(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn promote_waiting_entry() {
        let clock = ManualClock::starting_now();
        let store = store_on(&clock);
        let entry = waiting_entry(&clock, 1, 60);
        let token = entry.token;
        store.put_entry(entry).await.unwrap();

        assert_eq!(
            store.promote_entry(&token).await.unwrap(),
            PromoteOutcome::Promoted
        );
        let promoted = store.get_entry(&token).await.unwrap().unwrap();
        assert!(promoted.status.is_allowed());
    }

    #[tokio::test]
    async fn promotion_is_idempotent() {
        let clock = ManualClock::starting_now();
        let store = store_on(&clock);
        let entry = waiting_entry(&clock, 1, 60);
        let token = entry.token;
        store.put_entry(entry).await.unwrap();

        assert_eq!(
            store.promote_entry(&token).await.unwrap(),
            PromoteOutcome::Promoted
        );
        assert_eq!(
            store.promote_entry(&token).await.unwrap(),
            PromoteOutcome::AlreadyAllowed
        );
        let still_allowed = store.get_entry(&token).await.unwrap().unwrap();
        assert!(still_allowed.status.is_allowed());
    }

    #[tokio::test]
    async fn promote_missing_or_expired_fails_condition() {
        let clock = ManualClock::starting_now();
        let store = store_on(&clock);

        assert_eq!(
            store.promote_entry(&Token::new()).await.unwrap(),
            PromoteOutcome::Missing
        );

        let entry = waiting_entry(&clock, 1, 60);
        let token = entry.token;
        store.put_entry(entry).await.unwrap();
        clock.advance(Duration::from_secs(120));
        assert_eq!(
            store.promote_entry(&token).await.unwrap(),
            PromoteOutcome::Missing
        );
    }

    #[tokio::test]
    async fn counter_initializes_then_increments() {
        let clock = ManualClock::starting_now();
        let store = store_on(&clock);

        assert_eq!(
            store.increment_counter(CounterField::NextTicket).await.unwrap(),
            1
        );
        assert_eq!(
            store.increment_counter(CounterField::NextTicket).await.unwrap(),
            2
        );
        assert_eq!(
            store.increment_counter(CounterField::NowServing).await.unwrap(),
            1
        );

        let counter = store.read_counter().await.unwrap();
        assert_eq!(counter.next_ticket, 2);
        assert_eq!(counter.now_serving, 1);
    }

    #[tokio::test]
    async fn sweep_removes_only_expired() {
        let clock = ManualClock::starting_now();
        let store = store_on(&clock);
        let short = waiting_entry(&clock, 1, 10);
        let long = waiting_entry(&clock, 2, 1_000);
        let long_token = long.token;
        store.put_entry(short).await.unwrap();
        store.put_entry(long).await.unwrap();

        clock.advance(Duration::from_secs(30));
        let report = store.sweep_expired();
        assert_eq!(report.scanned, 2);
        assert_eq!(report.removed, 1);
        assert!(store.get_entry(&long_token).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn sweep_respects_removal_bound() {
        let clock = ManualClock::starting_now();
        let store = MemoryTicketStore::with_config(
            Arc::clone(&clock) as Arc<dyn Clock>,
            MemoryTicketStoreConfig {
                max_removals_per_sweep: 3,
            },
        );
        for ticket in 0..10 {
            store
                .put_entry(waiting_entry(&clock, ticket, 10))
                .await
                .unwrap();
        }

        clock.advance(Duration::from_secs(30));
        assert_eq!(store.sweep_expired().removed, 3);
        assert_eq!(store.sweep_expired().removed, 3);
    }
}
