//! Pass signing and verification.

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use vestibule_core::{Clock, Token};

use crate::claims::{PassClaims, DEFAULT_PASS_TTL_SECS};
use crate::error::PassError;
use crate::secret::SigningSecret;

/// Fixed header for every pass: HS256, JWT framing.
const HEADER_JSON: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// A signed, encoded pass ready for a cookie or URL parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassToken(String);

impl PassToken {
    /// The encoded token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the encoded token text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PassToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Signs and verifies passes with a shared HMAC-SHA256 secret.
#[derive(Clone)]
pub struct PassSigner {
    secret: SigningSecret,
    ttl_secs: u64,
    clock: Arc<dyn Clock>,
}

impl PassSigner {
    /// Create a signer issuing passes with the default 300 s lifetime.
    #[must_use]
    pub fn new(secret: SigningSecret, clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(secret, DEFAULT_PASS_TTL_SECS, clock)
    }

    /// Create a signer with an explicit pass lifetime.
    #[must_use]
    pub fn with_ttl(secret: SigningSecret, ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            secret,
            ttl_secs,
            clock,
        }
    }

    /// Issue a pass scoped to `token`.
    ///
    /// Re-issuable at any time; signing has no state to change.
    #[must_use]
    pub fn sign(&self, token: &Token) -> PassToken {
        let now = self.clock.unix_seconds();
        let claims = PassClaims {
            sub: *token,
            iat: now,
            exp: now + self.ttl_secs,
        };
        self.sign_claims(&claims)
    }

    fn sign_claims(&self, claims: &PassClaims) -> PassToken {
        let header = URL_SAFE_NO_PAD.encode(HEADER_JSON);
        let payload = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(claims).expect("pass claims serialize to JSON"),
        );
        let signing_input = format!("{header}.{payload}");
        let tag = self.compute_tag(signing_input.as_bytes());
        PassToken(format!(
            "{signing_input}.{}",
            URL_SAFE_NO_PAD.encode(tag)
        ))
    }

    /// Verify an encoded pass and return its claims.
    ///
    /// # Errors
    /// - [`PassError::Malformed`] when the text is not a three-part HS256
    ///   token
    /// - [`PassError::SignatureMismatch`] when the tag does not verify
    /// - [`PassError::Expired`] when the signature is good but `exp` has
    ///   passed
    pub fn verify(&self, raw: &str) -> Result<PassClaims, PassError> {
        let mut parts = raw.split('.');
        let (Some(header), Some(payload), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(PassError::malformed("expected three dot-separated parts"));
        };

        let header_bytes = URL_SAFE_NO_PAD
            .decode(header)
            .map_err(|_| PassError::malformed("header is not base64url"))?;
        let header_value: serde_json::Value = serde_json::from_slice(&header_bytes)
            .map_err(|_| PassError::malformed("header is not JSON"))?;
        if header_value.get("alg").and_then(serde_json::Value::as_str) != Some("HS256") {
            return Err(PassError::malformed("unsupported algorithm"));
        }

        let tag = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| PassError::malformed("signature is not base64url"))?;
        let signing_input = format!("{header}.{payload}");
        let expected = self.compute_tag(signing_input.as_bytes());
        if expected.ct_eq(&tag).unwrap_u8() != 1 {
            return Err(PassError::SignatureMismatch);
        }

        let payload_bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| PassError::malformed("payload is not base64url"))?;
        let claims: PassClaims = serde_json::from_slice(&payload_bytes)
            .map_err(|_| PassError::malformed("claims are not valid JSON"))?;

        if claims.is_expired(self.clock.unix_seconds()) {
            return Err(PassError::Expired);
        }
        Ok(claims)
    }

    fn compute_tag(&self, signing_input: &[u8]) -> Vec<u8> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input);
        mac.finalize().into_bytes().to_vec()
    }
}

impl fmt::Debug for PassSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassSigner")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}
