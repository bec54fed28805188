use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::application::InferenceClient;
use crate::domain::DomainError;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("chat-relay/", env!("CARGO_PKG_VERSION"));

/// Connection settings for the Bedrock runtime.
#[derive(Debug, Clone)]
pub struct BedrockConfig {
    pub region: String,
    /// Overrides the regional endpoint, e.g. for a VPC endpoint or a local stub.
    pub endpoint: Option<String>,
    /// Bedrock API key, sent as a bearer token.
    pub bearer_token: Option<String>,
    pub timeout: Duration,
}

impl BedrockConfig {
    /// Read settings from the environment:
    ///
    /// | Variable                   | Default                                      |
    /// |----------------------------|----------------------------------------------|
    /// | `BEDROCK_REGION`           | `AWS_REGION`, then `us-east-1`               |
    /// | `BEDROCK_ENDPOINT`         | `https://bedrock-runtime.{region}.amazonaws.com` |
    /// | `AWS_BEARER_TOKEN_BEDROCK` | unset (no `Authorization` header)            |
    pub fn from_env() -> Self {
        let region = std::env::var("BEDROCK_REGION")
            .or_else(|_| std::env::var("AWS_REGION"))
            .unwrap_or_else(|_| DEFAULT_REGION.to_string());
        Self {
            region,
            endpoint: std::env::var("BEDROCK_ENDPOINT").ok(),
            bearer_token: std::env::var("AWS_BEARER_TOKEN_BEDROCK").ok(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://bedrock-runtime.{}.amazonaws.com", self.region),
        }
    }
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
            bearer_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Error payload returned by the Bedrock runtime on non-2xx responses.
#[derive(Deserialize)]
struct ApiError {
    #[serde(alias = "Message")]
    message: String,
}

/// HTTP client for the Bedrock runtime `InvokeModel` operation.
///
/// One instance owns a pooled [`reqwest::Client`] and is meant to be built
/// once per process and shared behind an `Arc`.
pub struct BedrockClient {
    client: reqwest::Client,
    endpoint: Url,
    bearer_token: Option<String>,
}

impl BedrockClient {
    pub fn new(config: &BedrockConfig) -> Result<Self, DomainError> {
        let endpoint_str = config.endpoint_url();
        let endpoint = Url::parse(&endpoint_str).map_err(|e| {
            DomainError::configuration(format!(
                "BedrockClient: invalid endpoint '{endpoint_str}': {e}"
            ))
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(DomainError::configuration(format!(
                "BedrockClient: endpoint '{endpoint_str}' cannot carry a path"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("BedrockClient: failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            endpoint,
            bearer_token: config.bearer_token.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// `{endpoint}/model/{model_id}/invoke`, with the model id percent-encoded
    /// so ARNs containing `/` stay a single segment.
    pub fn invoke_url(&self, model_id: &str) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["model", model_id, "invoke"]);
        }
        url
    }
}

#[async_trait]
impl InferenceClient for BedrockClient {
    async fn invoke(&self, model_id: &str, body: &Value) -> Result<Value, DomainError> {
        let url = self.invoke_url(model_id);
        debug!("BedrockClient: POST {url}");

        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(body);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::inference(format!("BedrockClient: request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&text)
                .map(|e| e.message)
                .unwrap_or(text);
            warn!("BedrockClient: {model_id} returned {status}: {message}");
            return Err(DomainError::inference(format!(
                "BedrockClient: {model_id} returned {status}: {message}"
            )));
        }

        response.json::<Value>().await.map_err(|e| {
            DomainError::invalid_response(format!("BedrockClient: failed to parse response: {e}"))
        })
    }

    fn name(&self) -> &str {
        "bedrock"
    }
}
