//! Secret storage backends

pub mod aws;
pub mod memory;

pub use aws::SecretsManagerStore;
pub use memory::InMemorySecretStore;

use async_trait::async_trait;
use eyre::Result;

/// Trait for services that hold sensitive configuration
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the raw secret string stored under `secret_id`
    async fn fetch_secret_string(&self, secret_id: &str) -> Result<String>;

    /// Get backend name
    fn name(&self) -> &'static str;
}
