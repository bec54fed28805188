use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::application::InferenceClient;
use crate::domain::{CleanedReply, DomainError, ModelProfile, Query};

/// Turns one user query into one cleaned reply through a single inference call.
pub struct GenerateReplyUseCase {
    client: Arc<dyn InferenceClient>,
    profile: Arc<ModelProfile>,
}

impl GenerateReplyUseCase {
    pub fn new(client: Arc<dyn InferenceClient>, profile: Arc<ModelProfile>) -> Self {
        Self { client, profile }
    }

    pub fn profile(&self) -> &ModelProfile {
        &self.profile
    }

    pub async fn execute(&self, query: &Query) -> Result<CleanedReply, DomainError> {
        let start_time = Instant::now();
        let profile = &self.profile;

        let prompt = profile.render_prompt(query);
        let body = profile.request_body(&prompt);
        debug!(
            "Invoking {} via {} (schema={}, prompt_chars={})",
            profile.model_id,
            self.client.name(),
            profile.schema,
            prompt.chars().count()
        );

        let response = self.client.invoke(&profile.model_id, &body).await?;
        let completion = profile.extract_completion(&response)?;
        let reply = profile.clean(&completion);

        debug!(
            "Completion of {} chars cleaned to {} chars",
            completion.as_str().chars().count(),
            reply.as_str().chars().count()
        );
        info!(
            "Generated reply with profile {} in {:?}",
            profile.name,
            start_time.elapsed()
        );

        Ok(reply)
    }
}
