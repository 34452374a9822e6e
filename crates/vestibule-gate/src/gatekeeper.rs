//! Gatekeeper decision logic.

use std::sync::Arc;

use tracing::debug;
use vestibule_core::Clock;
use vestibule_flags::FlagCache;
use vestibule_pass::PassSigner;

use crate::cookie::{PassCookie, DEFAULT_COOKIE_NAME};
use crate::request::GateRequest;

/// Default name of the one-time pass URL parameter.
pub const DEFAULT_PASS_PARAM: &str = "pass_token";

/// Gatekeeper configuration.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Where queue-less visitors are sent.
    pub waiting_room_url: String,
    /// Name of the pass cookie.
    pub cookie_name: String,
    /// Name of the one-time pass URL parameter.
    pub pass_param: String,
}

impl GateConfig {
    /// Configuration with default cookie and parameter names.
    #[must_use]
    pub fn new(waiting_room_url: impl Into<String>) -> Self {
        Self {
            waiting_room_url: waiting_room_url.into(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            pass_param: DEFAULT_PASS_PARAM.to_string(),
        }
    }
}

/// What the gatekeeper decided for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Let the request reach the protected resource unmodified.
    PassThrough,
    /// Send the requester elsewhere, optionally setting the pass cookie.
    Redirect {
        /// `Location` header value.
        location: String,
        /// `Set-Cookie` payload, present only on the param-to-cookie exchange.
        set_cookie: Option<PassCookie>,
    },
}

/// Evaluates every inbound request against the waiting-room state.
///
/// Holds a per-process [`FlagCache`]; in a horizontally scaled deployment
/// each instance refreshes independently and staleness up to the cache TTL
/// is accepted.
pub struct Gatekeeper {
    flag_cache: FlagCache,
    signer: PassSigner,
    clock: Arc<dyn Clock>,
    config: GateConfig,
}

impl Gatekeeper {
    /// Create a gatekeeper.
    #[must_use]
    pub fn new(
        flag_cache: FlagCache,
        signer: PassSigner,
        clock: Arc<dyn Clock>,
        config: GateConfig,
    ) -> Self {
        Self {
            flag_cache,
            signer,
            clock,
            config,
        }
    }

    /// Decide what happens to one request.
    ///
    /// 1. Waiting room off (or unknowable): pass through.
    /// 2. Valid pass cookie: pass through.
    /// 3. Valid one-time URL parameter: redirect to the canonical URL with
    ///    the pass re-emitted as a cookie. This is the only place a
    ///    URL-delivered credential becomes a session pass.
    /// 4. Otherwise: redirect to the waiting room.
    ///
    /// An expired or malformed pass is never an error; it logs and falls
    /// through to the next step.
    pub async fn evaluate(&self, request: &GateRequest) -> GateDecision {
        if !self.flag_cache.current().await {
            return GateDecision::PassThrough;
        }

        if let Some(raw) = request.cookie_value(&self.config.cookie_name) {
            match self.signer.verify(raw) {
                Ok(_) => return GateDecision::PassThrough,
                Err(error) => {
                    debug!(%error, "pass cookie rejected, continuing to redirect");
                }
            }
        }

        if let Some(raw) = request.query_param(&self.config.pass_param) {
            match self.signer.verify(raw) {
                Ok(claims) => {
                    return GateDecision::Redirect {
                        location: request.canonical_location(&self.config.pass_param),
                        set_cookie: Some(PassCookie {
                            name: self.config.cookie_name.clone(),
                            value: raw.to_string(),
                            max_age_secs: claims.remaining_secs(self.clock.unix_seconds()),
                        }),
                    };
                }
                Err(error) => {
                    debug!(%error, "pass URL parameter rejected, continuing to redirect");
                }
            }
        }

        GateDecision::Redirect {
            location: self.config.waiting_room_url.clone(),
            set_cookie: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use vestibule_core::{ManualClock, Token};
    use vestibule_flags::{FlagStore, StaticFlagStore};
    use vestibule_testkit::{test_signer, DownFlagStore};

    use super::*;

    const WAITING_ROOM: &str = "https://queue.example/";
    const FLAG: &str = "waiting-room-enabled";

    fn gatekeeper_with(
        flags: Arc<dyn FlagStore>,
        clock: &Arc<ManualClock>,
    ) -> Gatekeeper {
        let clock_dyn = Arc::clone(clock) as Arc<dyn Clock>;
        Gatekeeper::new(
            FlagCache::new(flags, FLAG, Arc::clone(&clock_dyn)),
            test_signer(Arc::clone(&clock_dyn)),
            clock_dyn,
            GateConfig::new(WAITING_ROOM),
        )
    }

    fn enabled_gatekeeper(clock: &Arc<ManualClock>) -> Gatekeeper {
        gatekeeper_with(Arc::new(StaticFlagStore::with_flag(FLAG, "true")), clock)
    }

    fn signed_pass(clock: &Arc<ManualClock>) -> String {
        test_signer(Arc::clone(clock) as Arc<dyn Clock>)
            .sign(&Token::new())
            .into_string()
    }

    #[tokio::test]
    async fn disabled_room_passes_through() {
        let clock = ManualClock::starting_now();
        let gatekeeper =
            gatekeeper_with(Arc::new(StaticFlagStore::with_flag(FLAG, "false")), &clock);

        let decision = gatekeeper.evaluate(&GateRequest::new("shop.example", "/")).await;
        assert_eq!(decision, GateDecision::PassThrough);
    }

    #[tokio::test]
    async fn flag_outage_with_empty_cache_fails_open() {
        let clock = ManualClock::starting_now();
        let gatekeeper = gatekeeper_with(Arc::new(DownFlagStore), &clock);

        let decision = gatekeeper.evaluate(&GateRequest::new("shop.example", "/")).await;
        assert_eq!(decision, GateDecision::PassThrough);
    }

    #[tokio::test]
    async fn no_pass_redirects_to_waiting_room() {
        let clock = ManualClock::starting_now();
        let gatekeeper = enabled_gatekeeper(&clock);

        let decision = gatekeeper.evaluate(&GateRequest::new("shop.example", "/")).await;
        assert_eq!(
            decision,
            GateDecision::Redirect {
                location: WAITING_ROOM.to_string(),
                set_cookie: None,
            }
        );
    }

    #[tokio::test]
    async fn valid_cookie_passes_through() {
        let clock = ManualClock::starting_now();
        let gatekeeper = enabled_gatekeeper(&clock);
        let pass = signed_pass(&clock);

        let request = GateRequest::new("shop.example", "/")
            .with_cookie_header(format!("waiting-room-pass={pass}"));
        assert_eq!(gatekeeper.evaluate(&request).await, GateDecision::PassThrough);
    }

    #[tokio::test]
    async fn expired_cookie_redirects_instead_of_erroring() {
        let clock = ManualClock::starting_now();
        let gatekeeper = enabled_gatekeeper(&clock);
        let pass = signed_pass(&clock);

        clock.advance(Duration::from_secs(301));
        let request = GateRequest::new("shop.example", "/")
            .with_cookie_header(format!("waiting-room-pass={pass}"));
        assert_eq!(
            gatekeeper.evaluate(&request).await,
            GateDecision::Redirect {
                location: WAITING_ROOM.to_string(),
                set_cookie: None,
            }
        );
    }

    #[tokio::test]
    async fn garbage_cookie_redirects_instead_of_erroring() {
        let clock = ManualClock::starting_now();
        let gatekeeper = enabled_gatekeeper(&clock);

        let request = GateRequest::new("shop.example", "/")
            .with_cookie_header("waiting-room-pass=not-a-pass");
        assert!(matches!(
            gatekeeper.evaluate(&request).await,
            GateDecision::Redirect { set_cookie: None, .. }
        ));
    }

    #[tokio::test]
    async fn url_param_exchanges_into_a_cookie() {
        let clock = ManualClock::starting_now();
        let gatekeeper = enabled_gatekeeper(&clock);
        let pass = signed_pass(&clock);

        clock.advance(Duration::from_secs(100));
        let request = GateRequest::new("shop.example", "/checkout")
            .with_query(format!("item=42&pass_token={pass}"));
        let decision = gatekeeper.evaluate(&request).await;

        let GateDecision::Redirect {
            location,
            set_cookie: Some(cookie),
        } = decision
        else {
            panic!("expected redirect with cookie, got {decision:?}");
        };
        assert_eq!(location, "https://shop.example/checkout?item=42");
        assert_eq!(cookie.name, "waiting-room-pass");
        assert_eq!(cookie.value, pass);
        assert_eq!(cookie.max_age_secs, 200, "remaining validity, not full TTL");
    }

    #[tokio::test]
    async fn invalid_url_param_redirects_to_waiting_room() {
        let clock = ManualClock::starting_now();
        let gatekeeper = enabled_gatekeeper(&clock);
        let pass = signed_pass(&clock);

        clock.advance(Duration::from_secs(301));
        let request =
            GateRequest::new("shop.example", "/").with_query(format!("pass_token={pass}"));
        assert_eq!(
            gatekeeper.evaluate(&request).await,
            GateDecision::Redirect {
                location: WAITING_ROOM.to_string(),
                set_cookie: None,
            }
        );
    }

    #[tokio::test]
    async fn cookie_wins_over_url_param() {
        let clock = ManualClock::starting_now();
        let gatekeeper = enabled_gatekeeper(&clock);
        let pass = signed_pass(&clock);

        let request = GateRequest::new("shop.example", "/")
            .with_cookie_header(format!("waiting-room-pass={pass}"))
            .with_query(format!("pass_token={pass}"));
        assert_eq!(gatekeeper.evaluate(&request).await, GateDecision::PassThrough);
    }
}
