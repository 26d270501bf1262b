use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Install color-eyre for startup errors returned from `main`.
///
/// Safe to call multiple times. Colors are disabled because Lambda ships
/// stdout straight to CloudWatch.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .theme(color_eyre::config::Theme::new())
        .install();
}

/// Initialize tracing for a Lambda function.
///
/// - **Production** (`APP_ENV=production`): flattened JSON events, one per
///   line, which CloudWatch Logs Insights can query by field.
/// - **Development** (default): compact single-line text.
///
/// `RUST_LOG` overrides the default filter in both modes. An `ErrorLayer` is
/// installed so eyre reports carry the span trace of the failing invocation.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_tracing(environment: &Environment) {
    let is_production = environment.is_production();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if is_production {
            EnvFilter::new("info,aws_config=warn,aws_smithy_runtime=warn,hyper=warn")
        } else {
            EnvFilter::new("debug,hyper=info")
        }
    });

    let result = if is_production {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_target(false)
                    .without_time() // CloudWatch stamps every line
                    .with_current_span(true)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_ansi(false)
                    .with_target(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => info!(environment = ?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}
