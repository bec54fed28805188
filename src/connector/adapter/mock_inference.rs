use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::application::InferenceClient;
use crate::domain::{DomainError, ResponsePath};

pub const MOCK_COMPLETION: &str =
    "Assistant: Hello hello! This is a canned reply. Nothing was sent to a model.";

/// In-process [`InferenceClient`] that answers every call with a fixed
/// completion placed at the configured response path.
pub struct MockInferenceClient {
    response_path: ResponsePath,
    completion: String,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl MockInferenceClient {
    pub fn new(response_path: ResponsePath) -> Self {
        Self {
            response_path,
            completion: MOCK_COMPLETION.to_string(),
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_completion(mut self, completion: impl Into<String>) -> Self {
        self.completion = completion.into();
        self
    }

    /// Make every call fail with an inference error carrying `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceClient for MockInferenceClient {
    async fn invoke(&self, model_id: &str, _body: &Value) -> Result<Value, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        debug!("MockInferenceClient: answering call for {model_id}");

        if let Some(message) = &self.failure {
            return Err(DomainError::inference(message.clone()));
        }
        Ok(self.response_path.wrap(&self.completion))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn answers_at_response_path() {
        let path = ResponsePath::parse("outputs.0.text").unwrap();
        let client = MockInferenceClient::new(path).with_completion("ok");

        let response = client.invoke("m", &json!({})).await.unwrap();
        assert_eq!(response, json!({"outputs": [{"text": "ok"}]}));
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn failing_mock_returns_inference_error() {
        let path = ResponsePath::parse("completion").unwrap();
        let client = MockInferenceClient::new(path).failing("throttled");

        let err = client.invoke("m", &json!({})).await.unwrap_err();
        assert!(matches!(err, DomainError::Inference(ref m) if m == "throttled"));
        assert_eq!(client.calls(), 1);
    }
}
