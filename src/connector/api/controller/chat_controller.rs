use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{json, Value};
use tracing::{info_span, warn, Instrument};
use uuid::Uuid;

use crate::domain::{DomainError, Query};

use super::super::Container;

/// Name of the inbound parameter carrying the user's message.
pub const MESSAGE_PARAM: &str = "q";

/// Status and JSON body produced by one invocation, independent of the
/// transport that delivers it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOutcome {
    pub status: StatusCode,
    pub body: Value,
}

impl ChatOutcome {
    pub fn reply(reply: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: json!({ "reply": reply }),
        }
    }

    /// Every failure collapses to a 500 carrying the error message.
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: json!({ "error": message.to_string() }),
        }
    }
}

pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Handle one inbound message. Never fails: errors become a 500 outcome.
    pub async fn reply(&self, message: Option<&str>) -> ChatOutcome {
        let span = info_span!(
            "invocation",
            request_id = %Uuid::new_v4(),
            profile = %self.container.profile().name,
            model_id = %self.container.profile().model_id
        );

        async {
            match self.generate(message).await {
                Ok(reply) => ChatOutcome::reply(&reply),
                Err(e) => {
                    warn!("Invocation failed: {e}");
                    ChatOutcome::error(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// One-shot CLI variant: return the response body as pretty JSON.
    pub async fn ask(&self, message: String) -> Result<String> {
        let outcome = self.reply(Some(&message)).await;
        Ok(serde_json::to_string_pretty(&outcome.body)?)
    }

    async fn generate(&self, message: Option<&str>) -> Result<String, DomainError> {
        let query = Query::from_param(message, MESSAGE_PARAM)?;
        let use_case = self.container.generate_reply_use_case();
        let reply = use_case.execute(&query).await?;
        Ok(reply.into_string())
    }
}
