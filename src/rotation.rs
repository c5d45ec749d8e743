//! One-shot secret rotation
//!
//! Rotation is a single unconditional overwrite: generate a fresh token,
//! submit it via `PutSecretValue`, report the fixed `rotated` status.
//! Service-side failures are not classified or retried here.

use aws_sdk_secretsmanager::error::SdkError;
use aws_sdk_secretsmanager::operation::put_secret_value::PutSecretValueError;
use aws_sdk_secretsmanager::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::{Config, ConfigError};
use crate::token;

/// Status reported after a successful rotation.
pub const STATUS_ROTATED: &str = "rotated";

/// Rotation errors
#[derive(Debug, Error)]
pub enum RotationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("PutSecretValue failed: {0}")]
    PutSecretValue(#[from] SdkError<PutSecretValueError>),
}

impl RotationError {
    /// Error type name reported to the Runtime API.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Config(_) => "ConfigError",
            Self::PutSecretValue(_) => "PutSecretValueError",
        }
    }
}

/// Fixed invocation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RotationOutcome {
    pub status: &'static str,
}

impl RotationOutcome {
    #[must_use]
    pub fn rotated() -> Self {
        Self {
            status: STATUS_ROTATED,
        }
    }
}

/// Rotates a secret by overwriting it with a fresh random token.
///
/// The SDK client is built once and reused across invocations; the target
/// secret is re-resolved from the environment on every invocation.
#[derive(Debug, Clone)]
pub struct Rotator {
    client: Client,
}

impl Rotator {
    /// Build a rotator from ambient AWS configuration (credentials, region).
    ///
    /// `AWS_ENDPOINT_URL` redirects the SDK to a local emulator when set.
    pub async fn from_env() -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Ok(url) = std::env::var("AWS_ENDPOINT_URL") {
            loader = loader.endpoint_url(url);
        }
        let sdk_config = loader.load().await;
        Self::new(Client::new(&sdk_config))
    }

    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Handle one invocation. The event payload is accepted but unused.
    pub async fn handle(
        &self,
        _event: serde_json::Value,
    ) -> Result<RotationOutcome, RotationError> {
        let config = Config::from_env()?;
        self.rotate(&config).await
    }

    /// Generate a fresh token and submit it as the new secret value.
    pub async fn rotate(&self, config: &Config) -> Result<RotationOutcome, RotationError> {
        let token = token::generate(config.token_length);

        let output = self
            .client
            .put_secret_value()
            .secret_id(&config.secret_arn)
            .secret_string(&token)
            .send()
            .await?;

        // The token itself is never logged.
        info!(
            secret_id = %config.secret_arn,
            version_id = ?output.version_id(),
            "secret rotated"
        );

        Ok(RotationOutcome::rotated())
    }
}
