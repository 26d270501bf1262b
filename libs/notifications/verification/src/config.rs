//! Configuration resolution
//!
//! The three values the notifier needs come from the environment when set,
//! otherwise from a single Secrets Manager lookup. The result is cached in a
//! [`ConfigHandle`] for the lifetime of the process, so warm invocations skip
//! the lookup entirely.

use crate::error::{NotifierError, NotifierResult};
use crate::secrets::SecretStore;
use core_config::{env_non_empty, non_empty, ConfigError, FromEnv};
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

pub const SENDGRID_API_KEY: &str = "SENDGRID_API_KEY";
pub const VERIFICATION_LINK_BASE: &str = "VERIFICATION_LINK_BASE";
pub const FROM_EMAIL: &str = "FROM_EMAIL";
pub const SECRETS_MANAGER_ARN: &str = "SECRETS_MANAGER_ARN";

/// Values available before any secret lookup
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConfigSource {
    pub sendgrid_api_key: Option<String>,
    pub verification_link_base: Option<String>,
    pub from_email: Option<String>,
    /// Secret to fetch when any of the above is missing
    pub secret_id: Option<String>,
}

impl ConfigSource {
    /// True when no secret lookup is needed
    pub fn is_complete(&self) -> bool {
        self.sendgrid_api_key.is_some()
            && self.verification_link_base.is_some()
            && self.from_email.is_some()
    }

    fn fill_from(&mut self, secret: SecretPayload) {
        fill(&mut self.sendgrid_api_key, secret.sendgrid_api_key);
        fill(&mut self.verification_link_base, secret.verification_link_base);
        fill(&mut self.from_email, secret.from_email);
    }

    fn into_config(self) -> NotifierResult<InvocationConfig> {
        let mut missing = Vec::new();
        if self.sendgrid_api_key.is_none() {
            missing.push(SENDGRID_API_KEY);
        }
        if self.verification_link_base.is_none() {
            missing.push(VERIFICATION_LINK_BASE);
        }
        if self.from_email.is_none() {
            missing.push(FROM_EMAIL);
        }

        match (self.sendgrid_api_key, self.verification_link_base, self.from_email) {
            (Some(provider_api_key), Some(verification_link_base), Some(from_email)) => {
                Ok(InvocationConfig {
                    provider_api_key,
                    verification_link_base,
                    from_email,
                })
            }
            _ => Err(NotifierError::missing_fields(&missing)),
        }
    }
}

impl std::fmt::Debug for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigSource")
            .field(
                "sendgrid_api_key",
                &self.sendgrid_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("verification_link_base", &self.verification_link_base)
            .field("from_email", &self.from_email)
            .field("secret_id", &self.secret_id)
            .finish()
    }
}

impl FromEnv for ConfigSource {
    /// Reads `SENDGRID_API_KEY`, `VERIFICATION_LINK_BASE`, `FROM_EMAIL` and
    /// `SECRETS_MANAGER_ARN`. Empty values count as unset.
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            sendgrid_api_key: env_non_empty(SENDGRID_API_KEY),
            verification_link_base: env_non_empty(VERIFICATION_LINK_BASE),
            from_email: env_non_empty(FROM_EMAIL),
            secret_id: env_non_empty(SECRETS_MANAGER_ARN),
        })
    }
}

fn fill(slot: &mut Option<String>, value: Option<String>) {
    if slot.is_none() {
        *slot = non_empty(value);
    }
}

/// Fully resolved configuration; every field is non-empty
#[derive(Clone, PartialEq, Eq)]
pub struct InvocationConfig {
    pub provider_api_key: String,
    pub verification_link_base: String,
    pub from_email: String,
}

impl std::fmt::Debug for InvocationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvocationConfig")
            .field("provider_api_key", &"<redacted>")
            .field("verification_link_base", &self.verification_link_base)
            .field("from_email", &self.from_email)
            .finish()
    }
}

/// JSON document stored in Secrets Manager
#[derive(Debug, Default, Deserialize)]
pub struct SecretPayload {
    #[serde(rename = "SENDGRID_API_KEY")]
    pub sendgrid_api_key: Option<String>,
    #[serde(rename = "VERIFICATION_LINK_BASE")]
    pub verification_link_base: Option<String>,
    #[serde(rename = "FROM_EMAIL")]
    pub from_email: Option<String>,
}

/// Resolve the invocation config, consulting `store` at most once.
///
/// Environment values take precedence; the secret only fills the gaps.
pub async fn resolve_config(
    mut source: ConfigSource,
    store: &dyn SecretStore,
) -> NotifierResult<InvocationConfig> {
    if source.is_complete() {
        debug!("Configuration fully provided by environment");
        return source.into_config();
    }

    let secret_id = source.secret_id.clone().ok_or_else(|| {
        NotifierError::Config(format!(
            "Configuration incomplete and {} is not set",
            SECRETS_MANAGER_ARN
        ))
    })?;

    info!(secret_id = %secret_id, store = store.name(), "Fetching configuration secret");

    let raw = store.fetch_secret_string(&secret_id).await.map_err(|e| {
        error!(secret_id = %secret_id, error = %e, "Secret fetch failed");
        NotifierError::Config(format!("Failed to fetch secret: {}", e))
    })?;

    let payload: SecretPayload = serde_json::from_str(&raw).map_err(|e| {
        error!(secret_id = %secret_id, error = %e, "Secret is not valid JSON");
        NotifierError::Config(format!("Secret payload is not valid JSON: {}", e))
    })?;

    source.fill_from(payload);
    source.into_config()
}

/// Lazily-populated, write-once holder for the resolved configuration.
///
/// Create one per process and pass it to every invocation. A failed
/// resolution leaves the handle empty so the next invocation retries.
#[derive(Debug, Default)]
pub struct ConfigHandle {
    source: ConfigSource,
    resolved: OnceCell<InvocationConfig>,
}

impl ConfigHandle {
    pub fn new(source: ConfigSource) -> Self {
        Self {
            source,
            resolved: OnceCell::new(),
        }
    }

    /// Return the cached config, resolving it first if needed
    pub async fn get_or_resolve(&self, store: &dyn SecretStore) -> NotifierResult<&InvocationConfig> {
        self.resolved
            .get_or_try_init(|| resolve_config(self.source.clone(), store))
            .await
    }

    /// Whether a config has already been resolved
    pub fn is_resolved(&self) -> bool {
        self.resolved.initialized()
    }
}
