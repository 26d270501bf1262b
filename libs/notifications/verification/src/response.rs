//! Invocation results
//!
//! Results follow the Lambda proxy shape: `{"statusCode": 200, "body": "<json>"}`
//! where `body` is the JSON-encoded [`ResponseBody`].

use crate::error::NotifierError;
use core_config::{env_flag, ConfigError, Environment, FromEnv};
use serde::{Deserialize, Serialize, Serializer};

pub const SUCCESS_MESSAGE: &str = "Verification email sent successfully.";
pub const FAILURE_MESSAGE: &str = "Failed to send verification email.";

/// Controls what a failed invocation reveals to its caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseOptions {
    /// Echo the underlying error message in the result body
    pub expose_error_detail: bool,
}

impl ResponseOptions {
    /// Defaults: detail exposed in development, hidden in production
    pub fn for_environment(environment: &Environment) -> Self {
        Self {
            expose_error_detail: environment.is_development(),
        }
    }
}

impl FromEnv for ResponseOptions {
    /// Reads `EXPOSE_ERROR_DETAIL`, falling back to the `APP_ENV` default
    fn from_env() -> Result<Self, ConfigError> {
        let fallback = Self::for_environment(&Environment::from_env());
        Ok(Self {
            expose_error_detail: env_flag("EXPOSE_ERROR_DETAIL", fallback.expose_error_detail)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The only externally observable output of an invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationResult {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    #[serde(serialize_with = "body_as_json_string")]
    pub body: ResponseBody,
}

impl InvocationResult {
    pub fn success() -> Self {
        Self {
            status_code: 200,
            body: ResponseBody {
                message: SUCCESS_MESSAGE.to_string(),
                error: None,
            },
        }
    }

    pub fn failure(error: &NotifierError, options: ResponseOptions) -> Self {
        Self {
            status_code: 500,
            body: ResponseBody {
                message: FAILURE_MESSAGE.to_string(),
                error: options.expose_error_detail.then(|| error.to_string()),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

fn body_as_json_string<S: Serializer>(body: &ResponseBody, serializer: S) -> Result<S::Ok, S::Error> {
    let encoded = serde_json::to_string(body).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&encoded)
}
