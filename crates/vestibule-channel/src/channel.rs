//! Delivery channel interface.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vestibule_core::{TicketNumber, Token};

use crate::error::ChannelError;

/// Identifier of one in-flight channel message.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Create a new random `MessageId`.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MessageId")
            .field(&self.0.to_string())
            .finish()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payload published once per join: the new entry and its queue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueNotice {
    /// Token of the freshly written entry.
    pub token: Token,
    /// Ticket assigned to the entry.
    pub ticket_number: TicketNumber,
}

/// One message handed to a consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredMessage {
    /// Handle used to acknowledge the message.
    pub id: MessageId,
    /// Sequence group the notice was published under.
    pub group: String,
    /// The notice itself.
    pub notice: QueueNotice,
    /// How many times this message has been delivered, starting at 1.
    pub delivery_count: u32,
}

/// Ordered, at-least-once message channel.
///
/// Messages published under one sequence group are delivered in publish order
/// when nothing has been redelivered; redelivery after a missed
/// acknowledgment may reorder. Consumers must be idempotent.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Publish a notice under a sequence group.
    ///
    /// # Errors
    /// Returns `ChannelError` on transient unavailability.
    async fn publish(&self, group: &str, notice: QueueNotice) -> Result<(), ChannelError>;

    /// Receive up to `max` visible messages, waiting up to `wait` if the
    /// channel is momentarily empty.
    ///
    /// Received messages become invisible for the channel's visibility
    /// timeout; unacknowledged messages reappear afterwards.
    ///
    /// # Errors
    /// Returns `ChannelError` on transient unavailability.
    async fn receive(
        &self,
        max: usize,
        wait: Duration,
    ) -> Result<Vec<DeliveredMessage>, ChannelError>;

    /// Delete a batch of messages. Unknown ids are ignored, so acknowledging
    /// a redelivered duplicate is harmless.
    ///
    /// # Errors
    /// Returns `ChannelError` on transient unavailability.
    async fn acknowledge(&self, ids: &[MessageId]) -> Result<(), ChannelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_wire_shape() {
        let notice = QueueNotice {
            token: Token::new(),
            ticket_number: TicketNumber::new(7),
        };
        let value = serde_json::to_value(notice).unwrap();
        assert_eq!(value["ticketNumber"], 7);
        assert!(value.get("token").is_some());
    }
}
