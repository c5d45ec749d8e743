//! Lambda Runtime API client
//!
//! Polls the Runtime API for invocations and reports each result back,
//! either as a response body or as an `errorType`/`errorMessage` pair.
//! Any failure is propagated unmodified to the invoking runtime, which
//! owns logging, alerting, and retry policy.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::rotation::Rotator;

/// Environment variable holding the Runtime API endpoint (`host:port`).
pub const RUNTIME_API_ENV: &str = "AWS_LAMBDA_RUNTIME_API";

const API_VERSION: &str = "2018-06-01";

/// Runtime API errors
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("AWS_LAMBDA_RUNTIME_API environment variable is not set")]
    MissingEndpoint,

    #[error("Runtime API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invocation is missing the {0} header")]
    MissingHeader(&'static str),
}

/// A pending invocation delivered by the Runtime API.
#[derive(Debug)]
pub struct Invocation {
    pub request_id: String,
    pub function_arn: Option<String>,
    pub deadline_ms: Option<i64>,
    pub payload: Value,
}

/// HTTP client for the Runtime API.
pub struct RuntimeClient {
    http: reqwest::Client,
    base: String,
}

impl RuntimeClient {
    pub fn from_env() -> Result<Self, RuntimeError> {
        let endpoint =
            std::env::var(RUNTIME_API_ENV).map_err(|_| RuntimeError::MissingEndpoint)?;
        Ok(Self::new(&endpoint))
    }

    #[must_use]
    pub fn new(endpoint: &str) -> Self {
        Self {
            // No request timeout: `next` long-polls until an invocation arrives.
            http: reqwest::Client::new(),
            base: format!("http://{endpoint}/{API_VERSION}/runtime"),
        }
    }

    /// GET /runtime/invocation/next
    ///
    /// Blocks until the Runtime API delivers the next invocation.
    pub async fn next_invocation(&self) -> Result<Invocation, RuntimeError> {
        let response = self
            .http
            .get(format!("{}/invocation/next", self.base))
            .send()
            .await?;

        let request_id = header_string(&response, "lambda-runtime-aws-request-id")
            .ok_or(RuntimeError::MissingHeader("Lambda-Runtime-Aws-Request-Id"))?;
        let function_arn = header_string(&response, "lambda-runtime-invoked-function-arn");
        let deadline_ms = header_string(&response, "lambda-runtime-deadline-ms")
            .and_then(|v| v.parse().ok());

        // The event payload is unused by the handler; tolerate non-JSON bodies.
        let payload = response.json().await.unwrap_or(Value::Null);

        Ok(Invocation {
            request_id,
            function_arn,
            deadline_ms,
            payload,
        })
    }

    /// POST /runtime/invocation/{requestId}/response
    pub async fn post_response<T: Serialize>(
        &self,
        request_id: &str,
        body: &T,
    ) -> Result<(), RuntimeError> {
        self.http
            .post(format!("{}/invocation/{request_id}/response", self.base))
            .json(body)
            .send()
            .await?;
        Ok(())
    }

    /// POST /runtime/invocation/{requestId}/error
    pub async fn post_error(
        &self,
        request_id: &str,
        error_type: &str,
        message: &str,
    ) -> Result<(), RuntimeError> {
        let body = serde_json::json!({
            "errorType": error_type,
            "errorMessage": message,
        });
        self.http
            .post(format!("{}/invocation/{request_id}/error", self.base))
            .json(&body)
            .send()
            .await?;
        Ok(())
    }
}

fn header_string(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Poll the Runtime API forever, rotating once per invocation.
pub async fn run(rotator: &Rotator) -> Result<(), RuntimeError> {
    let client = RuntimeClient::from_env()?;
    info!("entering Runtime API invocation loop");

    loop {
        let invocation = client.next_invocation().await?;
        debug!(
            request_id = %invocation.request_id,
            function_arn = ?invocation.function_arn,
            "received invocation"
        );

        match rotator.handle(invocation.payload).await {
            Ok(outcome) => {
                client
                    .post_response(&invocation.request_id, &outcome)
                    .await?;
            }
            Err(err) => {
                error!(request_id = %invocation.request_id, error = %err, "rotation failed");
                client
                    .post_error(&invocation.request_id, err.error_type(), &err.to_string())
                    .await?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, State},
        response::IntoResponse,
        routing::{get, post},
        Router,
    };
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    #[derive(Default)]
    struct Recorded {
        responses: Mutex<Vec<(String, Value)>>,
        errors: Mutex<Vec<(String, Value)>>,
    }

    async fn next_invocation() -> impl IntoResponse {
        (
            [
                ("Lambda-Runtime-Aws-Request-Id", "req-1"),
                (
                    "Lambda-Runtime-Invoked-Function-Arn",
                    "arn:aws:lambda:us-east-1:000000000000:function:rotate",
                ),
                ("Lambda-Runtime-Deadline-Ms", "1700000000000"),
            ],
            "{}",
        )
    }

    async fn record_response(
        State(recorded): State<Arc<Recorded>>,
        Path(request_id): Path<String>,
        body: String,
    ) -> &'static str {
        let value: Value = serde_json::from_str(&body).unwrap();
        recorded.responses.lock().unwrap().push((request_id, value));
        "OK"
    }

    async fn record_error(
        State(recorded): State<Arc<Recorded>>,
        Path(request_id): Path<String>,
        body: String,
    ) -> &'static str {
        let value: Value = serde_json::from_str(&body).unwrap();
        recorded.errors.lock().unwrap().push((request_id, value));
        "OK"
    }

    async fn start_runtime_api(recorded: Arc<Recorded>) -> String {
        let app = Router::new()
            .route("/2018-06-01/runtime/invocation/next", get(next_invocation))
            .route(
                "/2018-06-01/runtime/invocation/:request_id/response",
                post(record_response),
            )
            .route(
                "/2018-06-01/runtime/invocation/:request_id/error",
                post(record_error),
            )
            .with_state(recorded);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr.to_string()
    }

    #[tokio::test]
    async fn polls_and_reports_through_the_runtime_api() {
        let recorded = Arc::new(Recorded::default());
        let endpoint = start_runtime_api(recorded.clone()).await;
        let client = RuntimeClient::new(&endpoint);

        let invocation = client.next_invocation().await.unwrap();
        assert_eq!(invocation.request_id, "req-1");
        assert_eq!(invocation.deadline_ms, Some(1_700_000_000_000));
        assert_eq!(invocation.payload, serde_json::json!({}));

        client
            .post_response(&invocation.request_id, &serde_json::json!({"status": "rotated"}))
            .await
            .unwrap();

        let responses = recorded.responses.lock().unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].0, "req-1");
        assert_eq!(responses[0].1["status"], "rotated");
    }

    #[tokio::test]
    async fn reports_errors_with_type_and_message() {
        let recorded = Arc::new(Recorded::default());
        let endpoint = start_runtime_api(recorded.clone()).await;
        let client = RuntimeClient::new(&endpoint);

        client
            .post_error("req-9", "ConfigError", "SECRET_ARN environment variable is not set")
            .await
            .unwrap();

        let errors = recorded.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "req-9");
        assert_eq!(errors[0].1["errorType"], "ConfigError");
    }
}
