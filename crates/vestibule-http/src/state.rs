//! Shared handler state.

use std::sync::Arc;

use vestibule_engine::{EnqueueService, StatusService};
use vestibule_gate::Gatekeeper;

/// Everything the handlers and the gate middleware need.
#[derive(Clone)]
pub struct AppState {
    pub enqueue: Arc<EnqueueService>,
    pub status: Arc<StatusService>,
    pub gatekeeper: Arc<Gatekeeper>,
}

impl AppState {
    /// Bundle the services into handler state.
    #[must_use]
    pub fn new(
        enqueue: Arc<EnqueueService>,
        status: Arc<StatusService>,
        gatekeeper: Arc<Gatekeeper>,
    ) -> Self {
        Self {
            enqueue,
            status,
            gatekeeper,
        }
    }
}
