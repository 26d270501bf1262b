//! Verification email notifier
//!
//! Reacts to an SNS notification carrying `{ "email": ..., "token": ... }` and
//! sends the user a verification link through SendGrid.
//!
//! ## Pipeline
//!
//! ```text
//! SNS event
//!   ↓ ConfigHandle::get_or_resolve (env first, Secrets Manager fallback, cached)
//! InvocationConfig
//!   ↓ decoder::decode
//! VerificationRequest
//!   ↓ composer::compose
//! OutboundEmail
//!   ↓ EmailProvider::send
//! InvocationResult (200 / 500)
//! ```
//!
//! ## Components
//!
//! - **Config**: `ConfigSource`, `ConfigHandle`, `InvocationConfig`
//! - **Secrets**: `SecretStore` trait, `SecretsManagerStore`, `InMemorySecretStore`
//! - **Providers**: `EmailProvider` trait, `SendGridProvider`, `MockEmailProvider`
//! - **Boundary**: `VerificationNotifier`, `InvocationResult`, `ResponseOptions`

pub mod composer;
pub mod config;
pub mod decoder;
pub mod error;
pub mod models;
pub mod notifier;
pub mod provider;
pub mod response;
pub mod secrets;

pub use config::{ConfigHandle, ConfigSource, InvocationConfig};
pub use error::{NotifierError, NotifierResult};
pub use models::{OutboundEmail, VerificationRequest};
pub use notifier::VerificationNotifier;
pub use provider::{EmailProvider, MockEmailProvider, SendGridProvider, SendResult};
pub use response::{InvocationResult, ResponseBody, ResponseOptions};
pub use secrets::{InMemorySecretStore, SecretStore, SecretsManagerStore};
