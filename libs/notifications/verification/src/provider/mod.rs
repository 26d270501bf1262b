//! Email provider implementations

pub mod mock;
pub mod sendgrid;

pub use mock::MockEmailProvider;
pub use sendgrid::SendGridProvider;

use crate::models::OutboundEmail;
use async_trait::async_trait;
use eyre::Result;

/// Result of sending an email
#[derive(Debug)]
pub struct SendResult {
    /// Provider-specific message ID
    pub message_id: String,
}

/// Trait for email providers
///
/// The API key is passed per call because it may only become known after the
/// first secret lookup.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Send an email
    async fn send(&self, email: &OutboundEmail, api_key: &str) -> Result<SendResult>;

    /// Get provider name
    fn name(&self) -> &'static str;
}
