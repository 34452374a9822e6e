//! Fault-injection wrappers for dependency-failure tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use vestibule_channel::{ChannelError, DeliveredMessage, DeliveryChannel, MessageId, QueueNotice};
use vestibule_core::{CounterField, CounterRecord, QueueEntry, Token};
use vestibule_flags::{FlagError, FlagStore};
use vestibule_store::{PromoteOutcome, StoreError, TicketStore};

/// Which ticket-store operations should fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreFaultPlan {
    pub fail_get: bool,
    pub fail_put: bool,
    pub fail_promote: bool,
    pub fail_counter: bool,
}

impl StoreFaultPlan {
    /// Fail every operation.
    #[must_use]
    pub const fn total_outage() -> Self {
        Self {
            fail_get: true,
            fail_put: true,
            fail_promote: true,
            fail_counter: true,
        }
    }
}

/// Ticket store wrapper that fails selected operations on command.
pub struct FaultInjectingStore {
    inner: Arc<dyn TicketStore>,
    plan: RwLock<StoreFaultPlan>,
}

impl FaultInjectingStore {
    /// Wrap a store with no faults armed.
    #[must_use]
    pub fn new(inner: Arc<dyn TicketStore>) -> Self {
        Self {
            inner,
            plan: RwLock::new(StoreFaultPlan::default()),
        }
    }

    /// Replace the fault plan.
    pub fn set_plan(&self, plan: StoreFaultPlan) {
        *self.plan.write() = plan;
    }

    /// Clear all faults.
    pub fn heal(&self) {
        *self.plan.write() = StoreFaultPlan::default();
    }

    fn injected() -> StoreError {
        StoreError::unavailable("injected fault")
    }
}

#[async_trait]
impl TicketStore for FaultInjectingStore {
    async fn get_entry(&self, token: &Token) -> Result<Option<QueueEntry>, StoreError> {
        if self.plan.read().fail_get {
            return Err(Self::injected());
        }
        self.inner.get_entry(token).await
    }

    async fn put_entry(&self, entry: QueueEntry) -> Result<(), StoreError> {
        if self.plan.read().fail_put {
            return Err(Self::injected());
        }
        self.inner.put_entry(entry).await
    }

    async fn promote_entry(&self, token: &Token) -> Result<PromoteOutcome, StoreError> {
        if self.plan.read().fail_promote {
            return Err(Self::injected());
        }
        self.inner.promote_entry(token).await
    }

    async fn increment_counter(&self, field: CounterField) -> Result<u64, StoreError> {
        if self.plan.read().fail_counter {
            return Err(Self::injected());
        }
        self.inner.increment_counter(field).await
    }

    async fn read_counter(&self) -> Result<CounterRecord, StoreError> {
        if self.plan.read().fail_counter {
            return Err(Self::injected());
        }
        self.inner.read_counter().await
    }
}

/// Which channel operations should fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelFaultPlan {
    pub fail_publish: bool,
    pub fail_receive: bool,
    pub fail_acknowledge: bool,
}

/// Delivery channel wrapper that fails selected operations on command.
pub struct FaultInjectingChannel {
    inner: Arc<dyn DeliveryChannel>,
    plan: RwLock<ChannelFaultPlan>,
}

impl FaultInjectingChannel {
    /// Wrap a channel with no faults armed.
    #[must_use]
    pub fn new(inner: Arc<dyn DeliveryChannel>) -> Self {
        Self {
            inner,
            plan: RwLock::new(ChannelFaultPlan::default()),
        }
    }

    /// Replace the fault plan.
    pub fn set_plan(&self, plan: ChannelFaultPlan) {
        *self.plan.write() = plan;
    }

    /// Clear all faults.
    pub fn heal(&self) {
        *self.plan.write() = ChannelFaultPlan::default();
    }

    fn injected() -> ChannelError {
        ChannelError::unavailable("injected fault")
    }
}

#[async_trait]
impl DeliveryChannel for FaultInjectingChannel {
    async fn publish(&self, group: &str, notice: QueueNotice) -> Result<(), ChannelError> {
        if self.plan.read().fail_publish {
            return Err(Self::injected());
        }
        self.inner.publish(group, notice).await
    }

    async fn receive(
        &self,
        max: usize,
        wait: Duration,
    ) -> Result<Vec<DeliveredMessage>, ChannelError> {
        if self.plan.read().fail_receive {
            return Err(Self::injected());
        }
        self.inner.receive(max, wait).await
    }

    async fn acknowledge(&self, ids: &[MessageId]) -> Result<(), ChannelError> {
        if self.plan.read().fail_acknowledge {
            return Err(Self::injected());
        }
        self.inner.acknowledge(ids).await
    }
}

/// Flag store that is always unreachable.
#[derive(Debug, Default)]
pub struct DownFlagStore;

#[async_trait]
impl FlagStore for DownFlagStore {
    async fn fetch(&self, _name: &str) -> Result<String, FlagError> {
        Err(FlagError::unavailable("flag store is down"))
    }
}
