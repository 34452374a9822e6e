//! In-memory delivery channel implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::trace;
use vestibule_core::Clock;

use crate::channel::{DeliveredMessage, DeliveryChannel, MessageId, QueueNotice};
use crate::error::ChannelError;

/// How often a waiting receiver re-checks for visible messages.
const RECEIVE_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Configuration for the in-memory delivery channel.
#[derive(Debug, Clone)]
pub struct MemoryDeliveryChannelConfig {
    /// Seconds a received message stays invisible before redelivery.
    pub visibility_timeout_secs: u64,
}

impl Default for MemoryDeliveryChannelConfig {
    fn default() -> Self {
        Self {
            visibility_timeout_secs: 30,
        }
    }
}

struct StoredMessage {
    id: MessageId,
    group: String,
    notice: QueueNotice,
    seq: u64,
    visible_at: DateTime<Utc>,
    delivery_count: u32,
}

#[derive(Default)]
struct ChannelState {
    messages: Vec<StoredMessage>,
    next_seq: u64,
}

/// In-memory delivery channel with visibility-timeout redelivery.
///
/// Suitable for testing and single-node deployments. Visible messages are
/// handed out in publish order; a message received but not acknowledged
/// becomes visible again once its visibility timeout elapses, which is how
/// at-least-once delivery shows up here.
pub struct MemoryDeliveryChannel {
    state: Mutex<ChannelState>,
    clock: Arc<dyn Clock>,
    config: MemoryDeliveryChannelConfig,
}

impl MemoryDeliveryChannel {
    /// Create a new in-memory channel on the given clock.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_config(clock, MemoryDeliveryChannelConfig::default())
    }

    /// Create a new in-memory channel with explicit configuration.
    #[must_use]
    pub fn with_config(clock: Arc<dyn Clock>, config: MemoryDeliveryChannelConfig) -> Self {
        Self {
            state: Mutex::new(ChannelState::default()),
            clock,
            config,
        }
    }

    /// Messages currently held, visible or not.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.state.lock().messages.len()
    }

    fn take_visible(&self, max: usize) -> Vec<DeliveredMessage> {
        let now = self.clock.now();
        let invisible_until = now
            + chrono::Duration::seconds(
                i64::try_from(self.config.visibility_timeout_secs).unwrap_or(i64::MAX),
            );

        let mut state = self.state.lock();
        state.messages.sort_by_key(|m| m.seq);

        let mut batch = Vec::new();
        for message in state
            .messages
            .iter_mut()
            .filter(|m| m.visible_at <= now)
            .take(max)
        {
            message.visible_at = invisible_until;
            message.delivery_count += 1;
            batch.push(DeliveredMessage {
                id: message.id,
                group: message.group.clone(),
                notice: message.notice,
                delivery_count: message.delivery_count,
            });
        }
        batch
    }
}

#[async_trait]
impl DeliveryChannel for MemoryDeliveryChannel {
    async fn publish(&self, group: &str, notice: QueueNotice) -> Result<(), ChannelError> {
        let mut state = self.state.lock();
        let seq = state.next_seq;
        state.next_seq += 1;
        state.messages.push(StoredMessage {
            id: MessageId::new(),
            group: group.to_string(),
            notice,
            seq,
            visible_at: self.clock.now(),
            delivery_count: 0,
        });
        trace!(group, ticket = %notice.ticket_number, "published queue notice");
        Ok(())
    }

    async fn receive(
        &self,
        max: usize,
        wait: Duration,
    ) -> Result<Vec<DeliveredMessage>, ChannelError> {
        if max == 0 {
            return Ok(Vec::new());
        }

        let deadline = tokio::time::Instant::now() + wait;
        loop {
            let batch = self.take_visible(max);
            if !batch.is_empty() {
                return Ok(batch);
            }
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return Ok(Vec::new());
            }
            tokio::time::sleep(remaining.min(RECEIVE_POLL_INTERVAL)).await;
        }
    }

    async fn acknowledge(&self, ids: &[MessageId]) -> Result<(), ChannelError> {
        let mut state = self.state.lock();
        state.messages.retain(|m| !ids.contains(&m.id));
        Ok(())
    }
}
