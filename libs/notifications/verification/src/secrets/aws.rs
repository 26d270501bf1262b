//! AWS Secrets Manager backend
//!
//! Uses the standard AWS SDK credential and region resolution:
//! - Lambda execution role (deployed)
//! - Environment variables: `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_REGION`
//! - Shared credentials file (local runs)

use crate::secrets::SecretStore;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_secretsmanager::Client;
use eyre::{eyre, Result};
use tracing::{debug, error};

/// Secret store backed by AWS Secrets Manager
pub struct SecretsManagerStore {
    client: Client,
}

impl SecretsManagerStore {
    /// Create a store with an existing Secrets Manager client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create from the default AWS SDK config
    ///
    /// Building the client does not contact AWS; the first request happens on
    /// the first fetch.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl SecretStore for SecretsManagerStore {
    async fn fetch_secret_string(&self, secret_id: &str) -> Result<String> {
        debug!(secret_id = %secret_id, "Fetching secret from AWS Secrets Manager");

        let output = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|e| {
                error!(secret_id = %secret_id, error = %e, "GetSecretValue failed");
                eyre!("failed to fetch secret '{}': {}", secret_id, e)
            })?;

        output
            .secret_string()
            .map(str::to_string)
            .ok_or_else(|| eyre!("secret '{}' has no SecretString value", secret_id))
    }

    fn name(&self) -> &'static str {
        "aws-secrets-manager"
    }
}
