//! Ticket sequencer.

use std::sync::Arc;

use vestibule_core::{CounterField, TicketNumber};

use crate::error::StoreError;
use crate::ticket_store::TicketStore;

/// Issues globally unique, strictly increasing ticket numbers.
///
/// The sequencer delegates entirely to the store's atomic increment; it holds
/// no state of its own, so any number of clones or instances share one
/// sequence. The first ticket ever issued is 1.
#[derive(Clone)]
pub struct Sequencer {
    store: Arc<dyn TicketStore>,
}

impl Sequencer {
    /// Create a sequencer over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn TicketStore>) -> Self {
        Self { store }
    }

    /// Issue the next ticket number.
    ///
    /// Linearizable across all concurrent callers: no two calls ever return
    /// the same value. A failed call issues nothing; the resulting gap in the
    /// sequence is tolerated.
    ///
    /// # Errors
    /// Returns `StoreError` if the store cannot complete the increment; the
    /// caller must treat this as a hard failure for the join.
    pub async fn next_ticket(&self) -> Result<TicketNumber, StoreError> {
        let value = self.store.increment_counter(CounterField::NextTicket).await?;
        Ok(TicketNumber::new(value))
    }
}
