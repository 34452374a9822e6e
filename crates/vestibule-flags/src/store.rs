//! Flag store interface and implementations.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::FlagError;

/// Interpret a flag value as a boolean: case-insensitive `"true"`.
#[must_use]
pub fn is_truthy(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Remote feature-flag store.
#[async_trait]
pub trait FlagStore: Send + Sync {
    /// Fetch the raw string value of a flag.
    ///
    /// # Errors
    /// Returns `FlagError` when the flag is missing or the store cannot be
    /// reached.
    async fn fetch(&self, name: &str) -> Result<String, FlagError>;

    /// Fetch a flag and interpret it as a boolean.
    ///
    /// # Errors
    /// Same as [`FlagStore::fetch`].
    async fn fetch_enabled(&self, name: &str) -> Result<bool, FlagError> {
        Ok(is_truthy(&self.fetch(name).await?))
    }
}

/// In-memory flag store for tests and single-node deployments.
#[derive(Debug, Default)]
pub struct StaticFlagStore {
    values: RwLock<HashMap<String, String>>,
}

impl StaticFlagStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with one flag preset.
    #[must_use]
    pub fn with_flag(name: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.set(name, value);
        store
    }

    /// Set or replace a flag value.
    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.values.write().insert(name.into(), value.into());
    }

    /// Remove a flag.
    pub fn remove(&self, name: &str) {
        self.values.write().remove(name);
    }
}

#[async_trait]
impl FlagStore for StaticFlagStore {
    async fn fetch(&self, name: &str) -> Result<String, FlagError> {
        self.values
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| FlagError::Missing {
                name: name.to_string(),
            })
    }
}

/// Flag store backed by a plain HTTP endpoint.
///
/// `GET {base_url}/{name}` returns the flag value as the response body.
/// Requests carry a bounded timeout; a timeout is a store failure, not a
/// distinct state.
#[derive(Debug, Clone)]
pub struct HttpFlagStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFlagStore {
    /// Create a store for `base_url` with the given per-request timeout.
    ///
    /// # Errors
    /// Returns `FlagError::Unavailable` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FlagError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FlagError::unavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl FlagStore for HttpFlagStore {
    async fn fetch(&self, name: &str) -> Result<String, FlagError> {
        let url = format!("{}/{name}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FlagError::unavailable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(FlagError::Missing {
                name: name.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(FlagError::unavailable(format!(
                "{url} returned {}",
                response.status()
            )));
        }
        let body = response
            .text()
            .await
            .map_err(|e| FlagError::unavailable(e.to_string()))?;
        Ok(body.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_is_case_insensitive() {
        assert!(is_truthy("true"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("  True  "));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("1"));
        assert!(!is_truthy(""));
    }

    #[tokio::test]
    async fn static_store_round_trip() {
        let store = StaticFlagStore::with_flag("waiting-room-enabled", "true");
        assert!(store.fetch_enabled("waiting-room-enabled").await.unwrap());

        store.set("waiting-room-enabled", "false");
        assert!(!store.fetch_enabled("waiting-room-enabled").await.unwrap());
    }

    #[tokio::test]
    async fn static_store_missing_flag() {
        let store = StaticFlagStore::new();
        assert!(matches!(
            store.fetch("nope").await.unwrap_err(),
            FlagError::Missing { .. }
        ));
    }
}
