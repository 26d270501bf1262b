use serde::{Deserialize, Serialize};

/// Decoded SNS payload: who to email and which token to put in the link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub email: String,
    pub token: String,
}

/// Email handed to the delivery provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEmail {
    /// Recipient address
    pub to: String,
    /// Sender address
    pub from: String,
    /// Subject line
    pub subject: String,
    /// Plain text body
    pub text: String,
}
