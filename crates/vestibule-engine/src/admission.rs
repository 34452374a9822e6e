//! Admission processor.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use vestibule_channel::{DeliveryChannel, MessageId};
use vestibule_core::{CounterField, QueueConfig};
use vestibule_store::{PromoteOutcome, StoreError, TicketStore};

use crate::error::EngineError;

/// What to do with a channel message after a promotion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageDisposition {
    /// The message is fully handled; remove it from the channel.
    Acknowledge,
    /// Leave the message for redelivery.
    Retain,
}

/// Pure dispatch over the conditional-promotion outcome.
///
/// Every condition verdict acknowledges: a fresh promotion is done, a
/// duplicate delivery of an already-allowed entry is a no-op, and a missing
/// entry means the TTL already expired it so the message is stale. Only a
/// transient store failure retains the message, relying on at-least-once
/// redelivery.
#[must_use]
pub const fn disposition(outcome: &Result<PromoteOutcome, StoreError>) -> MessageDisposition {
    match outcome {
        Ok(_) => MessageDisposition::Acknowledge,
        Err(_) => MessageDisposition::Retain,
    }
}

/// Summary of one admission cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Messages received from the channel.
    pub received: usize,
    /// Entries newly promoted to `ALLOWED`.
    pub promoted: usize,
    /// Duplicate deliveries of entries already `ALLOWED`.
    pub already_allowed: usize,
    /// Stale messages whose entries had expired.
    pub stale: usize,
    /// Messages left on the channel for redelivery.
    pub retained: usize,
    /// Messages acknowledged in the batch delete.
    pub acknowledged: usize,
}

/// Promotes waiting entries in bounded, idempotent batches.
///
/// Safe to run concurrently with itself: promotion and acknowledgment are
/// both idempotent, and message redelivery is expected rather than guarded
/// against.
pub struct AdmissionProcessor {
    store: Arc<dyn TicketStore>,
    channel: Arc<dyn DeliveryChannel>,
    config: QueueConfig,
}

impl AdmissionProcessor {
    /// Create a processor over the given store and channel.
    #[must_use]
    pub fn new(
        store: Arc<dyn TicketStore>,
        channel: Arc<dyn DeliveryChannel>,
        config: QueueConfig,
    ) -> Self {
        Self {
            store,
            channel,
            config,
        }
    }

    /// Run one admission cycle.
    ///
    /// Receives up to `batch_size` messages, attempts the conditional
    /// promotion for each, advances the now-serving watermark once per newly
    /// promoted entry, then acknowledges every fully handled message in one
    /// batch. An empty channel produces zero store writes and zero
    /// acknowledgments. A failed acknowledgment batch is tolerated; the
    /// unacknowledged successes are simply reprocessed later.
    ///
    /// # Errors
    /// Returns `EngineError` when the channel cannot deliver at all, or when
    /// the store failed on every message in the batch (total unavailability);
    /// the external trigger should alert and retry.
    pub async fn run_once(&self) -> Result<BatchReport, EngineError> {
        let messages = self
            .channel
            .receive(
                self.config.batch_size,
                Duration::from_secs(self.config.receive_wait_secs),
            )
            .await?;

        if messages.is_empty() {
            debug!("no messages in the channel to process");
            return Ok(BatchReport::default());
        }

        let mut report = BatchReport {
            received: messages.len(),
            ..BatchReport::default()
        };
        let mut ack_ids: Vec<MessageId> = Vec::with_capacity(messages.len());
        let mut last_store_error: Option<StoreError> = None;

        for message in &messages {
            let token = message.notice.token;
            let outcome = self.store.promote_entry(&token).await;
            match &outcome {
                Ok(PromoteOutcome::Promoted) => {
                    report.promoted += 1;
                    self.advance_now_serving().await;
                }
                Ok(PromoteOutcome::AlreadyAllowed) => {
                    report.already_allowed += 1;
                }
                Ok(PromoteOutcome::Missing) => {
                    report.stale += 1;
                    debug!(%token, "entry no longer exists, dropping stale message");
                }
                Err(error) => {
                    report.retained += 1;
                    warn!(%token, %error, "promotion failed, leaving message for redelivery");
                    last_store_error = Some(error.clone());
                }
            }
            if disposition(&outcome) == MessageDisposition::Acknowledge {
                ack_ids.push(message.id);
            }
        }

        if ack_ids.is_empty() {
            // Nothing in the batch got through: treat it as total store
            // unavailability and surface it to the trigger.
            if let Some(error) = last_store_error {
                return Err(EngineError::Store(error));
            }
        } else {
            match self.channel.acknowledge(&ack_ids).await {
                Ok(()) => report.acknowledged = ack_ids.len(),
                Err(error) => {
                    warn!(%error, "acknowledgment failed, messages will be redelivered");
                }
            }
        }

        info!(
            received = report.received,
            promoted = report.promoted,
            already_allowed = report.already_allowed,
            stale = report.stale,
            retained = report.retained,
            acknowledged = report.acknowledged,
            "admission cycle complete"
        );
        Ok(report)
    }

    /// Best-effort watermark advance after a fresh promotion. The watermark
    /// only feeds position estimates; promotion itself is the source of
    /// truth, so a transient failure here is logged and not retried.
    async fn advance_now_serving(&self) {
        if let Err(error) = self.store.increment_counter(CounterField::NowServing).await {
            warn!(%error, "failed to advance now-serving watermark");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_verdicts_acknowledge() {
        assert_eq!(
            disposition(&Ok(PromoteOutcome::Promoted)),
            MessageDisposition::Acknowledge
        );
        assert_eq!(
            disposition(&Ok(PromoteOutcome::AlreadyAllowed)),
            MessageDisposition::Acknowledge
        );
        assert_eq!(
            disposition(&Ok(PromoteOutcome::Missing)),
            MessageDisposition::Acknowledge
        );
    }

    #[test]
    fn transient_failure_retains() {
        assert_eq!(
            disposition(&Err(StoreError::unavailable("throttled"))),
            MessageDisposition::Retain
        );
    }
}
