//! Verify User Lambda
//!
//! Subscribed to the user-registration SNS topic. Each notification carries
//! an email address and a one-time token; the function emails the user a
//! verification link through SendGrid.
//!
//! ## Architecture
//!
//! ```text
//! SNS topic (user registered)
//!   ↓
//! lambda_runtime (this function)
//!   ↓ ConfigHandle (env vars, Secrets Manager fallback, cached per process)
//! VerificationNotifier
//!   ↓
//! SendGrid v3 API
//! ```
//!
//! ## Environment
//!
//! - `SENDGRID_API_KEY`, `VERIFICATION_LINK_BASE`, `FROM_EMAIL`: used directly when set
//! - `SECRETS_MANAGER_ARN`: secret holding whichever of the above are not set
//! - `SENDGRID_API_URL`: optional API base override
//! - `EXPOSE_ERROR_DETAIL`: echo error messages in 500 bodies (default: on outside production)
//! - `APP_ENV`, `RUST_LOG`: logging format and filter

use core_config::{Environment, FromEnv};
use eyre::{Result, WrapErr};
use lambda_runtime::{service_fn, LambdaEvent};
use std::sync::Arc;
use tracing::{info, info_span, Instrument};
use verification::{
    ConfigHandle, ConfigSource, EmailProvider, InvocationResult, ResponseOptions, SecretStore,
    SecretsManagerStore, SendGridProvider, VerificationNotifier,
};

/// Handle a single Lambda invocation.
///
/// Always returns `Ok`: failures are reported through the 500 result so the
/// runtime never marks the invocation as errored.
pub async fn function_handler<S: SecretStore, P: EmailProvider>(
    notifier: &VerificationNotifier<S, P>,
    event: LambdaEvent<serde_json::Value>,
) -> Result<InvocationResult, lambda_runtime::Error> {
    let (payload, context) = event.into_parts();
    let span = info_span!("invocation", request_id = %context.request_id);

    Ok(notifier.handle(&payload).instrument(span).await)
}

/// Run the Lambda function
///
/// 1. Sets up structured logging (JSON for production, compact text otherwise)
/// 2. Reads the configuration surface from the environment
/// 3. Builds the Secrets Manager client and the SendGrid provider
/// 4. Hands the notifier to the Lambda runtime loop
///
/// # Errors
///
/// Returns an error if `EXPOSE_ERROR_DETAIL` is malformed or the runtime
/// loop itself fails. Invocation failures never surface here.
pub async fn run() -> Result<()> {
    let environment = Environment::from_env();
    core_config::tracing::init_tracing(&environment);

    info!(
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        "Starting verify-user function"
    );

    let source = ConfigSource::from_env().wrap_err("Failed to read configuration")?;
    let options = ResponseOptions::from_env().wrap_err("Failed to read response options")?;
    info!(
        env_complete = source.is_complete(),
        secret_fallback = source.secret_id.is_some(),
        expose_error_detail = options.expose_error_detail,
        "Configuration surface loaded"
    );

    let secrets = SecretsManagerStore::from_env().await;
    let provider = SendGridProvider::from_env();

    let notifier = Arc::new(
        VerificationNotifier::new(ConfigHandle::new(source), secrets, provider).with_options(options),
    );

    lambda_runtime::run(service_fn(move |event: LambdaEvent<serde_json::Value>| {
        let notifier = Arc::clone(&notifier);
        async move { function_handler(&notifier, event).await }
    }))
    .await
    .map_err(|e| eyre::eyre!("Lambda runtime failed: {}", e))?;

    info!("Verify-user function stopped");
    Ok(())
}
