//! Status service.

use std::sync::Arc;

use tracing::debug;
use vestibule_core::{EntryStatus, Token};
use vestibule_pass::{PassSigner, PassToken};
use vestibule_store::TicketStore;

use crate::error::EngineError;

/// A token's reported state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReport {
    /// Admitted. Carries a freshly signed pass when the service has a signer.
    Allowed {
        /// Pass to exchange at the gatekeeper, if this variant issues them.
        pass: Option<PassToken>,
    },
    /// Still waiting, this many tickets behind the now-serving watermark.
    Waiting {
        /// Best-effort position estimate; never negative.
        position: u64,
    },
    /// A status this version doesn't know, passed through verbatim.
    Other {
        /// The stored status value.
        status: String,
    },
}

/// Reports queue state for a token.
pub struct StatusService {
    store: Arc<dyn TicketStore>,
    signer: Option<PassSigner>,
}

impl StatusService {
    /// Create a status service that only reports state.
    #[must_use]
    pub fn new(store: Arc<dyn TicketStore>) -> Self {
        Self {
            store,
            signer: None,
        }
    }

    /// Create the signing variant: `ALLOWED` reports carry a pass.
    ///
    /// Issuing a pass is one-way and re-issuable; it changes no queue state.
    #[must_use]
    pub fn with_signer(store: Arc<dyn TicketStore>, signer: PassSigner) -> Self {
        Self {
            store,
            signer: Some(signer),
        }
    }

    /// Report the state of `token`.
    ///
    /// The waiting position is `ticket_number - now_serving`, clamped at
    /// zero. It is an eventually consistent estimate: a stale watermark can
    /// make it read high, never negative.
    ///
    /// # Errors
    /// - [`EngineError::UnknownToken`] when no live entry exists (absent,
    ///   expired, or never issued - indistinguishable by design)
    /// - [`EngineError::Store`] on transient store failure; retryable
    pub async fn status(&self, token: &Token) -> Result<StatusReport, EngineError> {
        let entry = self
            .store
            .get_entry(token)
            .await?
            .ok_or(EngineError::UnknownToken)?;

        match entry.status {
            EntryStatus::Allowed => Ok(StatusReport::Allowed {
                pass: self.signer.as_ref().map(|signer| signer.sign(token)),
            }),
            EntryStatus::Waiting => {
                let counter = self.store.read_counter().await?;
                let position = entry.ticket_number.position_behind(counter.now_serving);
                debug!(%token, ticket = %entry.ticket_number, position, "reported waiting status");
                Ok(StatusReport::Waiting { position })
            }
            EntryStatus::Other(status) => Ok(StatusReport::Other { status }),
        }
    }
}
