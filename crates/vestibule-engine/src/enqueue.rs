//! Enqueue service.

use std::sync::Arc;

use tracing::{info, warn};
use vestibule_channel::{DeliveryChannel, QueueNotice};
use vestibule_core::{Clock, QueueConfig, QueueEntry, Token};
use vestibule_flags::FlagStore;
use vestibule_store::{Sequencer, TicketStore};

use crate::error::EngineError;

/// Result of a join request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The caller is in the queue and should poll with this token.
    Queued {
        /// Opaque handle for status polling.
        token: Token,
    },
    /// The waiting room is switched off; go straight through.
    DirectAccess,
}

/// Accepts join requests and places callers into the queue.
pub struct EnqueueService {
    sequencer: Sequencer,
    store: Arc<dyn TicketStore>,
    channel: Arc<dyn DeliveryChannel>,
    flags: Arc<dyn FlagStore>,
    clock: Arc<dyn Clock>,
    config: QueueConfig,
}

impl EnqueueService {
    /// Create an enqueue service over the given collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn TicketStore>,
        channel: Arc<dyn DeliveryChannel>,
        flags: Arc<dyn FlagStore>,
        clock: Arc<dyn Clock>,
        config: QueueConfig,
    ) -> Self {
        Self {
            sequencer: Sequencer::new(Arc::clone(&store)),
            store,
            channel,
            flags,
            clock,
            config,
        }
    }

    /// Join the queue.
    ///
    /// The waiting-room flag is evaluated fresh on every call - this is a
    /// different trust domain from the gatekeeper's cached check. When the
    /// room is disabled, or the flag store cannot be reached, the caller gets
    /// [`JoinOutcome::DirectAccess`] and no entry is created.
    ///
    /// The entry write must succeed before the token is returned. A failure
    /// after the sequencer increment wastes a ticket number; gaps in the
    /// sequence are tolerated, duplicate or missing entries are not.
    ///
    /// # Errors
    /// Returns `EngineError` when the store or channel cannot complete; the
    /// caller is expected to retry the join.
    pub async fn join(&self) -> Result<JoinOutcome, EngineError> {
        match self.flags.fetch_enabled(&self.config.flag_name).await {
            Ok(true) => {}
            Ok(false) => return Ok(JoinOutcome::DirectAccess),
            Err(error) => {
                warn!(%error, "flag fetch failed during join, failing open");
                return Ok(JoinOutcome::DirectAccess);
            }
        }

        let ticket_number = self.sequencer.next_ticket().await?;
        let token = Token::new();
        let entry = QueueEntry::new_waiting(
            token,
            ticket_number,
            self.clock.now(),
            self.config.entry_ttl_secs,
        );
        self.store.put_entry(entry).await?;
        self.channel
            .publish(
                &self.config.sequence_group,
                QueueNotice {
                    token,
                    ticket_number,
                },
            )
            .await?;

        info!(%token, ticket = %ticket_number, "queued new entry");
        Ok(JoinOutcome::Queued { token })
    }
}
