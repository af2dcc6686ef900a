//! HTTP client for the prediction endpoint.
//!
//! One POST per submission, no retries. Non-2xx statuses and undecodable
//! bodies are reported as distinct errors.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use url::Url;

use crate::types::{FormPayload, HealthStatus, PredictError, PredictResult, PredictionResponse};

/// Default endpoint, used when nothing is configured.
pub const DEFAULT_ENDPOINT: &str = "https://your-api-url.onrender.com/predict";

/// Sends a payload and returns the decoded prediction.
#[async_trait]
pub trait PredictionClient: Send + Sync {
    async fn predict(&self, payload: &FormPayload) -> PredictResult<PredictionResponse>;
}

/// reqwest-backed [`PredictionClient`].
#[derive(Clone)]
pub struct HttpPredictionClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpPredictionClient {
    /// Create a client with no request timeout.
    pub fn new(endpoint: &str) -> PredictResult<Self> {
        Self::build(endpoint, None)
    }

    /// Create a client whose requests fail after `timeout_ms`.
    pub fn with_timeout(endpoint: &str, timeout_ms: u64) -> PredictResult<Self> {
        Self::build(endpoint, Some(Duration::from_millis(timeout_ms)))
    }

    fn build(endpoint: &str, timeout: Option<Duration>) -> PredictResult<Self> {
        let endpoint = parse_endpoint(endpoint)?;

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("predict-form/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().unwrap_or_default();

        Ok(Self { client, endpoint })
    }

    /// The prediction URL.
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// The health probe URL, a sibling of the prediction path.
    pub fn health_url(&self) -> PredictResult<Url> {
        self.endpoint
            .join("health")
            .map_err(|e| PredictError::InvalidEndpoint(format!("{}: {e}", self.endpoint)))
    }

    /// Probe the backend's `GET /health`.
    pub async fn health(&self) -> PredictResult<HealthStatus> {
        let url = self.health_url()?;
        tracing::debug!(url = %url, "probing backend health");
        let resp = self.client.get(url).send().await?;
        decode(resp).await
    }
}

#[async_trait]
impl PredictionClient for HttpPredictionClient {
    async fn predict(&self, payload: &FormPayload) -> PredictResult<PredictionResponse> {
        let body = serde_json::to_vec(payload)?;
        tracing::debug!(
            endpoint = %self.endpoint,
            fields = payload.len(),
            bytes = body.len(),
            "posting prediction request"
        );

        let resp = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        decode(resp).await
    }
}

/// Check the status, then parse the body as JSON.
async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> PredictResult<T> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        return Err(PredictError::NonSuccessStatus {
            status: status.as_u16(),
            body,
        });
    }

    tracing::debug!(status = status.as_u16(), bytes = body.len(), "response received");
    serde_json::from_str(&body).map_err(|e| PredictError::MalformedResponseBody(e.to_string()))
}

/// Parse and check an endpoint URL. Only absolute http(s) URLs are accepted.
pub fn parse_endpoint(raw: &str) -> PredictResult<Url> {
    let url = Url::parse(raw).map_err(|e| PredictError::InvalidEndpoint(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(PredictError::InvalidEndpoint(format!(
            "{raw}: unsupported scheme {other:?}"
        ))),
    }
}
