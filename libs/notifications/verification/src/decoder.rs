//! SNS event decoding
//!
//! Only the first record is read. Its `Sns.Message` field is itself a JSON
//! string that must carry non-empty `email` and `token` strings. Every failure
//! collapses into [`NotifierError::Decode`].

use crate::error::{NotifierError, NotifierResult};
use crate::models::VerificationRequest;
use aws_lambda_events::event::sns::SnsEvent;
use core_config::non_empty;
use serde::Deserialize;

// Payload published by the registration service (no official type exists)
#[derive(Debug, Deserialize)]
struct VerificationMessage {
    email: Option<String>,
    token: Option<String>,
}

/// Decode a raw Lambda event
///
/// The event is taken as untyped JSON so that a malformed envelope becomes a
/// decode error instead of a runtime deserialization failure.
pub fn decode(event: &serde_json::Value) -> NotifierResult<VerificationRequest> {
    let envelope = SnsEvent::deserialize(event)
        .map_err(|e| NotifierError::Decode(format!("Invalid SNS event: {}", e)))?;
    decode_envelope(&envelope)
}

/// Decode an already-parsed SNS event
pub fn decode_envelope(envelope: &SnsEvent) -> NotifierResult<VerificationRequest> {
    let record = envelope
        .records
        .first()
        .ok_or_else(|| NotifierError::Decode("SNS event contains no records".to_string()))?;

    let message: VerificationMessage = serde_json::from_str(&record.sns.message)
        .map_err(|e| NotifierError::Decode(format!("Invalid SNS message: {}", e)))?;

    match (non_empty(message.email), non_empty(message.token)) {
        (Some(email), Some(token)) => Ok(VerificationRequest { email, token }),
        _ => Err(NotifierError::Decode(
            "Invalid SNS message. 'email' and 'token' are required.".to_string(),
        )),
    }
}
