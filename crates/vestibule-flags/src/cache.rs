//! Process-local flag cache with fail-open refresh.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, warn};
use vestibule_core::Clock;

use crate::error::FlagError;
use crate::store::{is_truthy, FlagStore};

/// Default cache time-to-live: 30 seconds.
pub const DEFAULT_FLAG_TTL_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, Default)]
struct CacheState {
    value: Option<bool>,
    last_checked_at: Option<DateTime<Utc>>,
}

/// Per-process cache of the "waiting room enabled" flag.
///
/// Each service instance owns its own cache; there is no cross-process
/// coordination, and staleness up to the TTL is an accepted trade-off.
///
/// Refresh policy: a value older than the TTL (or never fetched) triggers a
/// refresh. A successful refresh updates both the value and the check
/// timestamp. A failed refresh fails open - the value becomes `false` so
/// traffic passes through - but the timestamp is deliberately left alone, so
/// the next read retries the fetch instead of caching the failure for a full
/// TTL. During an extended outage this means one fetch attempt per read; no
/// backoff is applied here.
pub struct FlagCache {
    store: Arc<dyn FlagStore>,
    clock: Arc<dyn Clock>,
    name: String,
    ttl: Duration,
    state: Mutex<CacheState>,
}

impl FlagCache {
    /// Create a cache for `name` with the default 30 s TTL.
    #[must_use]
    pub fn new(store: Arc<dyn FlagStore>, name: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(
            store,
            name,
            Duration::from_secs(DEFAULT_FLAG_TTL_SECS),
            clock,
        )
    }

    /// Create a cache with an explicit TTL.
    #[must_use]
    pub fn with_ttl(
        store: Arc<dyn FlagStore>,
        name: impl Into<String>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            clock,
            name: name.into(),
            ttl,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Current flag value, refreshing if unset or stale.
    pub async fn current(&self) -> bool {
        let now = self.clock.now();
        if let Some(value) = self.fresh_value(now) {
            return value;
        }

        match self.store.fetch(&self.name).await {
            Ok(raw) => {
                let enabled = is_truthy(&raw);
                let mut state = self.state.lock();
                state.value = Some(enabled);
                state.last_checked_at = Some(now);
                debug!(flag = %self.name, enabled, "refreshed waiting-room flag");
                enabled
            }
            Err(error) => {
                warn!(flag = %self.name, %error, "flag refresh failed, failing open");
                // Fail open, but leave the timestamp untouched so the next
                // read retries instead of trusting the failure for a TTL.
                self.state.lock().value = Some(false);
                false
            }
        }
    }

    fn fresh_value(&self, now: DateTime<Utc>) -> Option<bool> {
        let state = self.state.lock();
        let value = state.value?;
        let checked_at = state.last_checked_at?;
        let age = now.signed_duration_since(checked_at);
        (age <= chrono::Duration::from_std(self.ttl).unwrap_or_else(|_| chrono::Duration::zero()))
            .then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use vestibule_core::ManualClock;

    use super::*;

    /// Flag store that replays a script of responses and counts fetches.
    struct ScriptedFlagStore {
        responses: Mutex<VecDeque<Result<String, FlagError>>>,
        fetches: AtomicUsize,
    }

    impl ScriptedFlagStore {
        fn new(responses: Vec<Result<String, FlagError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                fetches: AtomicUsize::new(0),
            })
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FlagStore for ScriptedFlagStore {
        async fn fetch(&self, _name: &str) -> Result<String, FlagError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(FlagError::unavailable("script exhausted")))
        }
    }

    fn cache_on(
        store: &Arc<ScriptedFlagStore>,
        clock: &Arc<ManualClock>,
        ttl_secs: u64,
    ) -> FlagCache {
        FlagCache::with_ttl(
            Arc::clone(store) as Arc<dyn FlagStore>,
            "waiting-room-enabled",
            Duration::from_secs(ttl_secs),
            Arc::clone(clock) as Arc<dyn Clock>,
        )
    }

    #[tokio::test]
    async fn caches_within_ttl() {
        let clock = ManualClock::starting_now();
        let store = ScriptedFlagStore::new(vec![Ok("true".into())]);
        let cache = cache_on(&store, &clock, 30);

        assert!(cache.current().await);
        clock.advance(Duration::from_secs(10));
        assert!(cache.current().await);
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn refreshes_after_ttl() {
        let clock = ManualClock::starting_now();
        let store = ScriptedFlagStore::new(vec![Ok("true".into()), Ok("false".into())]);
        let cache = cache_on(&store, &clock, 30);

        assert!(cache.current().await);
        clock.advance(Duration::from_secs(31));
        assert!(!cache.current().await);
        assert_eq!(store.fetch_count(), 2);
    }

    #[tokio::test]
    async fn fetch_failure_with_empty_cache_fails_open() {
        let clock = ManualClock::starting_now();
        let store = ScriptedFlagStore::new(vec![Err(FlagError::unavailable("down"))]);
        let cache = cache_on(&store, &clock, 30);

        assert!(!cache.current().await);
    }

    #[tokio::test]
    async fn failure_does_not_start_a_ttl_window() {
        let clock = ManualClock::starting_now();
        let store = ScriptedFlagStore::new(vec![
            Err(FlagError::unavailable("down")),
            Err(FlagError::unavailable("down")),
            Ok("true".into()),
        ]);
        let cache = cache_on(&store, &clock, 30);

        // Every read during the outage retries; none of them trusts the
        // failed result for a TTL.
        assert!(!cache.current().await);
        assert!(!cache.current().await);
        assert!(cache.current().await);
        assert_eq!(store.fetch_count(), 3);
    }

    #[tokio::test]
    async fn failure_after_success_keeps_retrying_until_recovery() {
        let clock = ManualClock::starting_now();
        let store = ScriptedFlagStore::new(vec![
            Ok("true".into()),
            Err(FlagError::unavailable("down")),
            Ok("true".into()),
        ]);
        let cache = cache_on(&store, &clock, 30);

        assert!(cache.current().await);
        clock.advance(Duration::from_secs(31));
        // Outage: fail open now, retry on the very next read.
        assert!(!cache.current().await);
        assert!(cache.current().await);
        assert_eq!(store.fetch_count(), 3);
    }
}
