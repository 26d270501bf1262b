//! In-memory secret store for testing

use super::SecretStore;
use async_trait::async_trait;
use eyre::{eyre, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Secret store that serves fixed values and counts fetches
#[derive(Default)]
pub struct InMemorySecretStore {
    secrets: HashMap<String, String>,
    failure_message: Option<String>,
    fetches: AtomicUsize,
}

impl InMemorySecretStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret, serializing `value` as JSON
    pub fn with_json(mut self, secret_id: impl Into<String>, value: serde_json::Value) -> Self {
        self.secrets.insert(secret_id.into(), value.to_string());
        self
    }

    /// Add a raw secret string
    pub fn with_secret(mut self, secret_id: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(secret_id.into(), value.into());
        self
    }

    /// Create a store whose every fetch fails
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure_message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Number of fetches attempted so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn fetch_secret_string(&self, secret_id: &str) -> Result<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.failure_message {
            return Err(eyre!("{}", message));
        }

        self.secrets
            .get(secret_id)
            .cloned()
            .ok_or_else(|| eyre!("secret '{}' not found", secret_id))
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}
