//! VerificationNotifier - the invocation boundary
//!
//! Runs resolve → decode → compose → send strictly in sequence and collapses
//! every outcome into an [`InvocationResult`]. Nothing is retried.

use crate::composer::compose;
use crate::config::ConfigHandle;
use crate::decoder::decode;
use crate::error::{NotifierError, NotifierResult};
use crate::models::OutboundEmail;
use crate::provider::EmailProvider;
use crate::response::{InvocationResult, ResponseOptions};
use crate::secrets::SecretStore;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tracing::{error, info, instrument};

/// Generic message sent back when the provider fails; provider detail is only logged.
pub const DELIVERY_FAILURE_MESSAGE: &str = "Failed to send verification email via SendGrid.";

/// Sends verification emails in reaction to SNS notifications
pub struct VerificationNotifier<S: SecretStore, P: EmailProvider> {
    config: ConfigHandle,
    secrets: S,
    provider: P,
    options: ResponseOptions,
}

impl<S: SecretStore, P: EmailProvider> VerificationNotifier<S, P> {
    /// Create a new notifier. Keep one per process so the config cache survives.
    pub fn new(config: ConfigHandle, secrets: S, provider: P) -> Self {
        Self {
            config,
            secrets,
            provider,
            options: ResponseOptions::default(),
        }
    }

    /// Override response options
    pub fn with_options(mut self, options: ResponseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    pub fn secrets(&self) -> &S {
        &self.secrets
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Handle one invocation. Never fails: errors and panics become a 500 result.
    #[instrument(skip_all, fields(provider = self.provider.name()))]
    pub async fn handle(&self, event: &serde_json::Value) -> InvocationResult {
        let outcome = AssertUnwindSafe(self.process(event))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(NotifierError::from_panic(panic)));

        match outcome {
            Ok(email) => {
                info!(to = %email.to, "Verification email sent successfully");
                InvocationResult::success()
            }
            Err(e) => {
                error!(kind = e.kind(), error = %e, "Verification email invocation failed");
                InvocationResult::failure(&e, self.options)
            }
        }
    }

    /// Run the pipeline, returning the email that was sent
    pub async fn process(&self, event: &serde_json::Value) -> NotifierResult<OutboundEmail> {
        let config = self.config.get_or_resolve(&self.secrets).await?;
        let request = decode(event)?;
        let email = compose(config, &request);

        self.provider
            .send(&email, &config.provider_api_key)
            .await
            .map_err(|e| {
                error!(to = %email.to, error = %e, "Error sending email via provider");
                NotifierError::Delivery(DELIVERY_FAILURE_MESSAGE.to_string())
            })?;

        Ok(email)
    }
}
