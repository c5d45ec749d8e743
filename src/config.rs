//! Environment-variable configuration
//!
//! Configuration is resolved fresh on every invocation, so a missing
//! `SECRET_ARN` fails that invocation before any write is attempted.

use thiserror::Error;

use crate::token::DEFAULT_TOKEN_LENGTH;

/// Required: identifier of the secret to rotate (ARN or name).
pub const SECRET_ARN_ENV: &str = "SECRET_ARN";

/// Optional: override for the generated token length.
pub const TOKEN_LENGTH_ENV: &str = "ROTATION_TOKEN_LENGTH";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SECRET_ARN environment variable is not set")]
    MissingSecretArn,

    #[error("invalid ROTATION_TOKEN_LENGTH value: {0:?}")]
    InvalidTokenLength(String),
}

/// Per-invocation rotation configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Target secret, passed to the store unmodified.
    pub secret_arn: String,
    /// Length of the generated replacement token.
    pub token_length: usize,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret_arn = lookup(SECRET_ARN_ENV)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingSecretArn)?;

        let token_length = match lookup(TOKEN_LENGTH_ENV) {
            Some(raw) => match raw.parse::<usize>() {
                Ok(len) if len > 0 => len,
                _ => return Err(ConfigError::InvalidTokenLength(raw)),
            },
            None => DEFAULT_TOKEN_LENGTH,
        };

        Ok(Self {
            secret_arn,
            token_length,
        })
    }
}
