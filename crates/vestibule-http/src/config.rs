//! Service configuration and wiring.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use vestibule_channel::MemoryDeliveryChannel;
use vestibule_core::{Clock, QueueConfig, SystemClock, DEFAULT_FLAG_NAME};
use vestibule_engine::{AdmissionProcessor, EnqueueService, StatusService};
use vestibule_flags::{FlagCache, FlagStore, HttpFlagStore, StaticFlagStore, DEFAULT_FLAG_TTL_SECS};
use vestibule_gate::{GateConfig, Gatekeeper};
use vestibule_pass::{PassSigner, SigningSecret, DEFAULT_PASS_TTL_SECS};
use vestibule_store::MemoryTicketStore;

use crate::state::AppState;

/// Default flag-store request timeout.
const FLAG_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Service configuration, loaded from `VESTIBULE_`-prefixed environment
/// variables (e.g. `VESTIBULE_SIGNING_SECRET`).
///
/// `signing_secret` and `waiting_room_url` are required; a missing value
/// fails startup immediately and is never retried. Everything else has a
/// default.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Socket address to bind, e.g. `0.0.0.0:8080`.
    pub bind_addr: Option<String>,
    /// Shared HMAC secret for pass signing.
    pub signing_secret: String,
    /// Where queue-less visitors are redirected.
    pub waiting_room_url: String,
    /// Base URL of the HTTP flag store; unset means the room is always on.
    pub flag_store_url: Option<String>,
    /// Name of the waiting-room flag.
    pub flag_name: Option<String>,
    /// Seconds until queue entries expire.
    pub entry_ttl_secs: Option<u64>,
    /// Admission batch size.
    pub batch_size: Option<usize>,
    /// Seconds between admission cycles.
    pub admission_interval_secs: Option<u64>,
    /// Gatekeeper flag-cache TTL in seconds.
    pub flag_ttl_secs: Option<u64>,
    /// Pass lifetime in seconds.
    pub pass_ttl_secs: Option<u64>,
}

impl HttpConfig {
    /// Load from the environment.
    ///
    /// # Errors
    /// Returns an error when a required setting is absent or malformed.
    pub fn load() -> anyhow::Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix("VESTIBULE").separator("__"))
            .build()
            .context("building configuration")?;
        cfg.try_deserialize()
            .context("required settings absent or malformed")
    }

    /// Socket address to bind.
    #[must_use]
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or("0.0.0.0:8080")
    }

    /// Seconds between admission cycles.
    #[must_use]
    pub fn admission_interval(&self) -> Duration {
        Duration::from_secs(self.admission_interval_secs.unwrap_or(1))
    }

    fn queue_config(&self) -> QueueConfig {
        let defaults = QueueConfig::default();
        QueueConfig {
            entry_ttl_secs: self.entry_ttl_secs.unwrap_or(defaults.entry_ttl_secs),
            batch_size: self.batch_size.unwrap_or(defaults.batch_size),
            flag_name: self
                .flag_name
                .clone()
                .unwrap_or_else(|| DEFAULT_FLAG_NAME.to_string()),
            ..defaults
        }
    }

    fn flag_store(&self) -> anyhow::Result<Arc<dyn FlagStore>> {
        match &self.flag_store_url {
            Some(url) => Ok(Arc::new(
                HttpFlagStore::new(url.clone(), FLAG_REQUEST_TIMEOUT)
                    .context("building flag store client")?,
            )),
            // No remote flag store configured: run with the room switched on.
            None => Ok(Arc::new(StaticFlagStore::with_flag(
                self.queue_config().flag_name,
                "true",
            ))),
        }
    }
}

/// The wired single-node service: handler state plus the admission processor
/// and the store handle its maintenance loops need.
pub struct Service {
    pub state: AppState,
    pub processor: Arc<AdmissionProcessor>,
    pub store: Arc<MemoryTicketStore>,
}

/// Wire the full in-process stack from configuration.
///
/// # Errors
/// Returns an error when the signing secret is empty or the flag store
/// client cannot be built; both are startup-fatal configuration errors.
pub fn build_service(config: &HttpConfig) -> anyhow::Result<Service> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let queue_config = config.queue_config();

    let store = Arc::new(MemoryTicketStore::new(Arc::clone(&clock)));
    let channel = Arc::new(MemoryDeliveryChannel::new(Arc::clone(&clock)));
    let flags = config.flag_store()?;

    let secret =
        SigningSecret::new(config.signing_secret.as_bytes()).context("signing secret")?;
    let signer = PassSigner::with_ttl(
        secret,
        config.pass_ttl_secs.unwrap_or(DEFAULT_PASS_TTL_SECS),
        Arc::clone(&clock),
    );

    let enqueue = Arc::new(EnqueueService::new(
        store.clone() as Arc<dyn vestibule_store::TicketStore>,
        channel.clone() as Arc<dyn vestibule_channel::DeliveryChannel>,
        Arc::clone(&flags),
        Arc::clone(&clock),
        queue_config.clone(),
    ));
    let status = Arc::new(StatusService::with_signer(
        store.clone() as Arc<dyn vestibule_store::TicketStore>,
        signer.clone(),
    ));
    let processor = Arc::new(AdmissionProcessor::new(
        store.clone() as Arc<dyn vestibule_store::TicketStore>,
        channel as Arc<dyn vestibule_channel::DeliveryChannel>,
        queue_config.clone(),
    ));

    let flag_cache = FlagCache::with_ttl(
        flags,
        queue_config.flag_name,
        Duration::from_secs(config.flag_ttl_secs.unwrap_or(DEFAULT_FLAG_TTL_SECS)),
        Arc::clone(&clock),
    );
    let gatekeeper = Arc::new(Gatekeeper::new(
        flag_cache,
        signer,
        clock,
        GateConfig::new(config.waiting_room_url.clone()),
    ));

    Ok(Service {
        state: AppState::new(enqueue, status, gatekeeper),
        processor,
        store,
    })
}
