//! SendGrid email provider
//!
//! Sends emails via the SendGrid v3 HTTP API.

use crate::models::OutboundEmail;
use crate::provider::{EmailProvider, SendResult};
use async_trait::async_trait;
use core_config::env_or_default;
use eyre::{eyre, Result};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error};

/// SendGrid API base URL
pub const DEFAULT_SENDGRID_API_URL: &str = "https://api.sendgrid.com/v3";

/// SendGrid email provider
pub struct SendGridProvider {
    api_url: String,
    client: Client,
}

impl SendGridProvider {
    /// Create a provider targeting the given API base URL
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create from environment variables
    ///
    /// Reads `SENDGRID_API_URL` (optional, defaults to the public API).
    pub fn from_env() -> Self {
        Self::new(env_or_default("SENDGRID_API_URL", DEFAULT_SENDGRID_API_URL))
    }

    fn send_url(&self) -> String {
        format!("{}/mail/send", self.api_url)
    }
}

impl Default for SendGridProvider {
    fn default() -> Self {
        Self::new(DEFAULT_SENDGRID_API_URL)
    }
}

/// SendGrid API request payload
#[derive(Debug, Serialize)]
struct SendGridRequest {
    personalizations: Vec<Personalization>,
    from: EmailAddress,
    subject: String,
    content: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Personalization {
    to: Vec<EmailAddress>,
}

#[derive(Debug, Serialize)]
struct EmailAddress {
    email: String,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(rename = "type")]
    content_type: String,
    value: String,
}

impl From<&OutboundEmail> for SendGridRequest {
    fn from(email: &OutboundEmail) -> Self {
        Self {
            personalizations: vec![Personalization {
                to: vec![EmailAddress {
                    email: email.to.clone(),
                }],
            }],
            from: EmailAddress {
                email: email.from.clone(),
            },
            subject: email.subject.clone(),
            content: vec![Content {
                content_type: "text/plain".to_string(),
                value: email.text.clone(),
            }],
        }
    }
}

#[async_trait]
impl EmailProvider for SendGridProvider {
    async fn send(&self, email: &OutboundEmail, api_key: &str) -> Result<SendResult> {
        let request = SendGridRequest::from(email);

        debug!(
            to = %email.to,
            subject = %email.subject,
            "Sending email via SendGrid"
        );

        let response = self
            .client
            .post(self.send_url())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| eyre!("SendGrid request failed: {}", e))?;

        let status = response.status();

        if status.is_success() {
            // SendGrid returns message ID in X-Message-Id header
            let message_id = response
                .headers()
                .get("X-Message-Id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();

            debug!(message_id = %message_id, "Email accepted by SendGrid");

            Ok(SendResult { message_id })
        } else {
            let error_body = response.text().await.unwrap_or_default();
            error!(
                status = %status,
                error = %error_body,
                "SendGrid API error"
            );

            match status.as_u16() {
                429 => Err(eyre!("rate limit exceeded")),
                400 => Err(eyre!("invalid request: {}", error_body)),
                401 | 403 => Err(eyre!("authentication failed")),
                _ => Err(eyre!("SendGrid error ({}): {}", status, error_body)),
            }
        }
    }

    fn name(&self) -> &'static str {
        "sendgrid"
    }
}
