//! API Gateway proxy integration: the event a function runtime hands to the
//! handler, and the response object it expects back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::controller::{ChatController, ChatOutcome, MESSAGE_PARAM};
use super::Container;

/// Response object understood by API Gateway's Lambda proxy integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    #[serde(rename = "isBase64Encoded", default)]
    pub is_base64_encoded: bool,
}

impl From<ChatOutcome> for ProxyResponse {
    fn from(outcome: ChatOutcome) -> Self {
        let headers = BTreeMap::from([
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        ]);
        Self {
            status_code: outcome.status.as_u16(),
            headers,
            body: outcome.body.to_string(),
            is_base64_encoded: false,
        }
    }
}

/// Pull the message out of `queryStringParameters.q`, if present.
pub fn message_from_event(event: &Value) -> Option<&str> {
    event
        .get("queryStringParameters")
        .and_then(|params| params.get(MESSAGE_PARAM))
        .and_then(Value::as_str)
}

/// Run one invocation for a proxy event.
pub async fn handle_event(container: &Container, event: &Value) -> ProxyResponse {
    ChatController::new(container)
        .reply(message_from_event(event))
        .await
        .into()
}
