//! Error types for the verification notifier.

use std::any::Any;
use thiserror::Error;

/// Result type for notifier operations.
pub type NotifierResult<T> = Result<T, NotifierError>;

/// Errors that can terminate an invocation.
///
/// None of them is retried; the response mapper turns every variant into a
/// 500 result.
#[derive(Debug, Error)]
pub enum NotifierError {
    /// Required configuration absent after resolution, or the secret fetch failed.
    #[error("{0}")]
    Config(String),

    /// Inbound notification is malformed or lacks `email` / `token`.
    #[error("{0}")]
    Decode(String),

    /// The email provider rejected or failed the send.
    #[error("{0}")]
    Delivery(String),

    /// Anything else, including a panic inside the pipeline.
    #[error("{0}")]
    Unexpected(String),
}

impl NotifierError {
    /// Short name of the error kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Decode(_) => "decode",
            Self::Delivery(_) => "delivery",
            Self::Unexpected(_) => "unexpected",
        }
    }

    pub(crate) fn missing_fields(fields: &[&str]) -> Self {
        if fields.len() == 1 {
            Self::Config(format!("Missing required environment variable: {}", fields[0]))
        } else {
            Self::Config(format!(
                "Missing required environment variables: {}",
                fields.join(", ")
            ))
        }
    }

    /// Wrap a panic payload caught at the invocation boundary
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let detail = if let Some(msg) = payload.downcast_ref::<&str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "panic".to_string()
        };
        Self::Unexpected(format!("Unexpected error: {}", detail))
    }
}
