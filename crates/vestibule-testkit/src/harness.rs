//! Full in-memory waiting-room stack on one manual clock.

use std::sync::Arc;

use vestibule_channel::{DeliveryChannel, MemoryDeliveryChannel};
use vestibule_core::{Clock, ManualClock, QueueConfig};
use vestibule_flags::{FlagStore, StaticFlagStore};
use vestibule_store::{MemoryTicketStore, TicketStore};

/// The in-memory collaborators every integration test wires together.
///
/// The harness owns the concrete types so tests can reach the extra surface
/// (manual clock, flag mutation, channel depth); the `*_dyn` accessors hand
/// out the trait-object views the services expect. The default configuration
/// skips the empty-channel wait so cycles return immediately.
pub struct WaitingRoomHarness {
    pub clock: Arc<ManualClock>,
    pub store: Arc<MemoryTicketStore>,
    pub channel: Arc<MemoryDeliveryChannel>,
    pub flags: Arc<StaticFlagStore>,
    pub config: QueueConfig,
}

impl WaitingRoomHarness {
    /// A harness with the waiting room switched on.
    #[must_use]
    pub fn new() -> Self {
        let clock = ManualClock::starting_now();
        let config = QueueConfig {
            receive_wait_secs: 0,
            ..QueueConfig::default()
        };
        Self {
            store: Arc::new(MemoryTicketStore::new(
                Arc::clone(&clock) as Arc<dyn Clock>
            )),
            channel: Arc::new(MemoryDeliveryChannel::new(
                Arc::clone(&clock) as Arc<dyn Clock>
            )),
            flags: Arc::new(StaticFlagStore::with_flag(config.flag_name.clone(), "true")),
            clock,
            config,
        }
    }

    /// Switch the waiting room on or off.
    pub fn set_waiting_room(&self, enabled: bool) {
        self.flags
            .set(self.config.flag_name.clone(), if enabled { "true" } else { "false" });
    }

    /// The store as the trait object services take.
    #[must_use]
    pub fn store_dyn(&self) -> Arc<dyn TicketStore> {
        Arc::clone(&self.store) as Arc<dyn TicketStore>
    }

    /// The channel as the trait object services take.
    #[must_use]
    pub fn channel_dyn(&self) -> Arc<dyn DeliveryChannel> {
        Arc::clone(&self.channel) as Arc<dyn DeliveryChannel>
    }

    /// The flag store as the trait object services take.
    #[must_use]
    pub fn flags_dyn(&self) -> Arc<dyn FlagStore> {
        Arc::clone(&self.flags) as Arc<dyn FlagStore>
    }

    /// The clock as the trait object services take.
    #[must_use]
    pub fn clock_dyn(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock) as Arc<dyn Clock>
    }
}

impl Default for WaitingRoomHarness {
    fn default() -> Self {
        Self::new()
    }
}
