//! Verification email composition

use crate::config::InvocationConfig;
use crate::models::{OutboundEmail, VerificationRequest};

pub const VERIFICATION_SUBJECT: &str = "Verify your email address";

/// Human-readable only; nothing here enforces the expiry.
pub const EXPIRY_NOTICE: &str = "This link will expire in 2 minutes.";

/// Build the verification link.
///
/// The token is appended verbatim. Tokens containing reserved URL characters
/// produce a malformed link.
pub fn verification_link(base: &str, token: &str) -> String {
    format!("{}?token={}", base, token)
}

/// Compose the verification email. Pure and deterministic.
pub fn compose(config: &InvocationConfig, request: &VerificationRequest) -> OutboundEmail {
    let link = verification_link(&config.verification_link_base, &request.token);

    OutboundEmail {
        to: request.email.clone(),
        from: config.from_email.clone(),
        subject: VERIFICATION_SUBJECT.to_string(),
        text: format!(
            "Click the following link to verify your email address: {}\n\n{}",
            link, EXPIRY_NOTICE
        ),
    }
}
