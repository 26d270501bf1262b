//! Mock email provider for testing

use super::{EmailProvider, SendResult};
use crate::models::OutboundEmail;
use async_trait::async_trait;
use eyre::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Mock email provider that captures sent emails
pub struct MockEmailProvider {
    sent_emails: Arc<Mutex<Vec<OutboundEmail>>>,
    api_keys: Arc<Mutex<Vec<String>>>,
    attempts: AtomicUsize,
    failure_message: Option<String>,
}

impl MockEmailProvider {
    /// Create a new mock provider
    pub fn new() -> Self {
        Self {
            sent_emails: Arc::new(Mutex::new(Vec::new())),
            api_keys: Arc::new(Mutex::new(Vec::new())),
            attempts: AtomicUsize::new(0),
            failure_message: None,
        }
    }

    /// Create a mock provider that always fails
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure_message: Some(message.into()),
            ..Self::new()
        }
    }

    /// Get all successfully sent emails
    pub async fn sent_emails(&self) -> Vec<OutboundEmail> {
        self.sent_emails.lock().await.clone()
    }

    /// Get the count of successfully sent emails
    pub async fn sent_count(&self) -> usize {
        self.sent_emails.lock().await.len()
    }

    /// Number of send calls, successful or not
    pub fn attempt_count(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// API keys passed to each successful send
    pub async fn api_keys(&self) -> Vec<String> {
        self.api_keys.lock().await.clone()
    }

    /// Check if an email was sent to a specific address
    pub async fn was_sent_to(&self, email: &str) -> bool {
        self.sent_emails
            .lock()
            .await
            .iter()
            .any(|e| e.to == email)
    }
}

impl Default for MockEmailProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailProvider for MockEmailProvider {
    async fn send(&self, email: &OutboundEmail, api_key: &str) -> Result<SendResult> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(message) = &self.failure_message {
            return Err(eyre::eyre!("{}", message));
        }

        self.sent_emails.lock().await.push(email.clone());
        self.api_keys.lock().await.push(api_key.to_string());

        Ok(SendResult {
            message_id: format!("mock-{}", attempt),
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
