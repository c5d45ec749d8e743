//! Lambda entrypoint for the secret-rotation function.
//!
//! Under Lambda the binary is named `bootstrap` and polls the Runtime API.
//! Without a Runtime API endpoint it performs a single local rotation and
//! prints the outcome, which is useful for development against an emulator.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use secret_rotation::{runtime, Rotator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "secret_rotation=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rotator = Rotator::from_env().await;

    if std::env::var(runtime::RUNTIME_API_ENV).is_ok() {
        runtime::run(&rotator).await?;
        Ok(())
    } else {
        let outcome = rotator.handle(serde_json::Value::Null).await?;
        println!("{}", serde_json::to_string(&outcome)?);
        Ok(())
    }
}
