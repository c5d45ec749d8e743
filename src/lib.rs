//! Secret rotation function for AWS Secrets Manager
//!
//! Rotates a secret by overwriting it with a freshly generated random token:
//! - 40 cryptographically random alphanumeric characters per rotation
//! - One `PutSecretValue` call per invocation, no staged rotation
//! - Runs as a Lambda custom runtime (`bootstrap`) or as a local one-shot

pub mod config;
pub mod rotation;
pub mod runtime;
pub mod token;

pub use config::Config;
pub use rotation::{RotationError, RotationOutcome, Rotator};
