use async_trait::async_trait;
use serde_json::Value;

use crate::domain::DomainError;

/// Sends a fully built request body to a hosted model and returns the parsed
/// JSON response.
///
/// Implementors own transport, authentication and endpoint details. The
/// request body layout and the location of the completion inside the
/// response belong to the [`crate::domain::ModelProfile`], not the client.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn invoke(&self, model_id: &str, body: &Value) -> Result<Value, DomainError>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}
