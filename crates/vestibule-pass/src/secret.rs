//! Signing secret with zeroize semantics.

use zeroize::ZeroizeOnDrop;

use crate::error::PassError;

/// Shared HMAC signing secret.
///
/// The bytes are wiped on drop and never appear in `Debug` output.
#[derive(Clone, ZeroizeOnDrop)]
pub struct SigningSecret {
    bytes: Vec<u8>,
}

impl SigningSecret {
    /// Create a secret from raw bytes.
    ///
    /// # Errors
    /// Returns [`PassError::EmptySecret`] for an empty secret; everything the
    /// gatekeeper trusts hangs off this key.
    pub fn new(bytes: impl AsRef<[u8]>) -> Result<Self, PassError> {
        let bytes = bytes.as_ref().to_vec();
        if bytes.is_empty() {
            return Err(PassError::EmptySecret);
        }
        Ok(Self { bytes })
    }

    /// Get the secret bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningSecret")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_secret() {
        assert!(matches!(
            SigningSecret::new(b"").unwrap_err(),
            PassError::EmptySecret
        ));
    }

    #[test]
    fn debug_redacts_bytes() {
        let secret = SigningSecret::new(b"super-secret").unwrap();
        let debug = format!("{secret:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("super-secret"));
    }
}
