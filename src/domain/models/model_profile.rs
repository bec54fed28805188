use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::{CleanedReply, Query, RawCompletion, ResponsePath};
use crate::domain::{normalize, DomainError};

/// Placeholder in a prompt template that receives the user's message.
pub const MESSAGE_PLACEHOLDER: &str = "{message}";

pub const DEFAULT_PROFILE: &str = "claude-instant";

/// Sampling parameters sent with every inference call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    #[serde(default)]
    pub stop_sequences: Vec<String>,
}

/// Request body layout expected by a model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestSchema {
    AnthropicText,
    TitanText,
    Llama,
    Mistral,
}

impl RequestSchema {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestSchema::AnthropicText => "anthropic_text",
            RequestSchema::TitanText => "titan_text",
            RequestSchema::Llama => "llama",
            RequestSchema::Mistral => "mistral",
        }
    }
}

impl std::fmt::Display for RequestSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a raw completion becomes the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyCleanup {
    /// Strip surrounding whitespace only.
    Trim,
    /// Run the full reply normalizer.
    #[default]
    Normalize,
}

impl ReplyCleanup {
    pub fn apply(&self, completion: &RawCompletion) -> CleanedReply {
        match self {
            ReplyCleanup::Trim => CleanedReply::new(completion.as_str().trim()),
            ReplyCleanup::Normalize => CleanedReply::new(normalize(completion.as_str())),
        }
    }
}

/// Everything that distinguishes one model deployment from another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProfile {
    pub name: String,
    pub model_id: String,
    pub prompt_template: String,
    pub generation: GenerationParams,
    pub schema: RequestSchema,
    pub response_path: ResponsePath,
    #[serde(default)]
    pub cleanup: ReplyCleanup,
}

impl ModelProfile {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::invalid_input("profile name must not be empty"));
        }
        if self.model_id.trim().is_empty() {
            return Err(DomainError::invalid_input(format!(
                "profile '{}' has an empty model id",
                self.name
            )));
        }
        if !self.prompt_template.contains(MESSAGE_PLACEHOLDER) {
            return Err(DomainError::invalid_input(format!(
                "prompt template of profile '{}' has no {MESSAGE_PLACEHOLDER} placeholder",
                self.name
            )));
        }
        Ok(())
    }

    pub fn render_prompt(&self, query: &Query) -> String {
        self.prompt_template.replace(MESSAGE_PLACEHOLDER, query.as_str())
    }

    /// Lay out the prompt and generation parameters for this profile's model family.
    pub fn request_body(&self, prompt: &str) -> Value {
        let params = &self.generation;
        let stops = (!params.stop_sequences.is_empty()).then(|| json!(params.stop_sequences));

        match self.schema {
            RequestSchema::AnthropicText => {
                let mut body = Map::new();
                body.insert("prompt".into(), json!(prompt));
                body.insert("max_tokens_to_sample".into(), json!(params.max_tokens));
                body.insert("temperature".into(), json!(params.temperature));
                body.insert("top_p".into(), json!(params.top_p));
                if let Some(stops) = stops {
                    body.insert("stop_sequences".into(), stops);
                }
                Value::Object(body)
            }
            RequestSchema::TitanText => {
                let mut config = Map::new();
                config.insert("maxTokenCount".into(), json!(params.max_tokens));
                config.insert("temperature".into(), json!(params.temperature));
                config.insert("topP".into(), json!(params.top_p));
                if let Some(stops) = stops {
                    config.insert("stopSequences".into(), stops);
                }
                json!({
                    "inputText": prompt,
                    "textGenerationConfig": Value::Object(config),
                })
            }
            RequestSchema::Llama => json!({
                "prompt": prompt,
                "max_gen_len": params.max_tokens,
                "temperature": params.temperature,
                "top_p": params.top_p,
            }),
            RequestSchema::Mistral => {
                let mut body = Map::new();
                body.insert("prompt".into(), json!(prompt));
                body.insert("max_tokens".into(), json!(params.max_tokens));
                body.insert("temperature".into(), json!(params.temperature));
                body.insert("top_p".into(), json!(params.top_p));
                if let Some(stops) = stops {
                    body.insert("stop".into(), stops);
                }
                Value::Object(body)
            }
        }
    }

    pub fn extract_completion(&self, body: &Value) -> Result<RawCompletion, DomainError> {
        self.response_path.extract(body)
    }

    pub fn clean(&self, completion: &RawCompletion) -> CleanedReply {
        self.cleanup.apply(completion)
    }

    /// The four deployments this handler ships with.
    pub fn builtin() -> Vec<ModelProfile> {
        vec![
            Self::claude_instant(),
            Self::titan_express(),
            Self::llama2_chat(),
            Self::mistral_instruct(),
        ]
    }

    pub fn claude_instant() -> Self {
        Self {
            name: DEFAULT_PROFILE.to_string(),
            model_id: "anthropic.claude-instant-v1".to_string(),
            prompt_template: "Human: You are a helpful assistant. Please provide a friendly and helpful response to the user.\n\nUser: {message}\n\nAssistant:".to_string(),
            generation: GenerationParams {
                max_tokens: 1000,
                temperature: 0.7,
                top_p: 0.9,
                stop_sequences: vec!["\n\nHuman:".to_string()],
            },
            schema: RequestSchema::AnthropicText,
            response_path: builtin_path("completion"),
            cleanup: ReplyCleanup::Trim,
        }
    }

    pub fn titan_express() -> Self {
        Self {
            name: "titan-express".to_string(),
            model_id: "amazon.titan-text-express-v1".to_string(),
            prompt_template: "You are a friendly chat bot. Answer the user in one short sentence.\n\nUser: {message}\nBot:".to_string(),
            generation: GenerationParams {
                max_tokens: 200,
                temperature: 0.5,
                top_p: 0.9,
                stop_sequences: vec!["User:".to_string()],
            },
            schema: RequestSchema::TitanText,
            response_path: builtin_path("results.0.outputText"),
            cleanup: ReplyCleanup::Normalize,
        }
    }

    pub fn llama2_chat() -> Self {
        Self {
            name: "llama2-chat".to_string(),
            model_id: "meta.llama2-13b-chat-v1".to_string(),
            prompt_template: "[INST] <<SYS>>\nYou are a helpful assistant. Reply in one short sentence.\n<</SYS>>\n\n{message} [/INST]".to_string(),
            generation: GenerationParams {
                max_tokens: 256,
                temperature: 0.6,
                top_p: 0.9,
                stop_sequences: Vec::new(),
            },
            schema: RequestSchema::Llama,
            response_path: builtin_path("generation"),
            cleanup: ReplyCleanup::Normalize,
        }
    }

    pub fn mistral_instruct() -> Self {
        Self {
            name: "mistral-instruct".to_string(),
            model_id: "mistral.mistral-7b-instruct-v0:2".to_string(),
            prompt_template: "<s>[INST] You are a helpful assistant. Answer briefly.\nUser: {message} [/INST]".to_string(),
            generation: GenerationParams {
                max_tokens: 200,
                temperature: 0.5,
                top_p: 0.9,
                stop_sequences: vec!["User:".to_string()],
            },
            schema: RequestSchema::Mistral,
            response_path: builtin_path("outputs.0.text"),
            cleanup: ReplyCleanup::Normalize,
        }
    }
}

fn builtin_path(path: &'static str) -> ResponsePath {
    ResponsePath::from_segments(path.split('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_profiles_are_valid_and_unique() {
        let profiles = ModelProfile::builtin();
        assert_eq!(profiles.len(), 4);
        for profile in &profiles {
            profile.validate().unwrap();
        }
        let mut names: Vec<_> = profiles.iter().map(|p| p.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn claude_prompt_wraps_message() {
        let prompt = ModelProfile::claude_instant().render_prompt(&Query::new("What is Rust?"));
        assert!(prompt.starts_with("Human: You are a helpful assistant."));
        assert!(prompt.ends_with("User: What is Rust?\n\nAssistant:"));
    }

    #[test]
    fn anthropic_body_matches_text_completions_api() {
        let profile = ModelProfile::claude_instant();
        let body = profile.request_body("p");
        assert_eq!(body["prompt"], "p");
        assert_eq!(body["max_tokens_to_sample"], 1000);
        assert_eq!(body["stop_sequences"], json!(["\n\nHuman:"]));
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["top_p"], 0.9);
    }

    #[test]
    fn sampling_params_serialize_without_float_noise() {
        let body = ModelProfile::titan_express().request_body("p");
        let text = serde_json::to_string(&body).unwrap();
        assert!(text.contains("\"temperature\":0.5"));
        assert!(text.contains("\"topP\":0.9"));
    }

    #[test]
    fn titan_body_nests_generation_config() {
        let body = ModelProfile::titan_express().request_body("p");
        assert_eq!(body["inputText"], "p");
        assert_eq!(body["textGenerationConfig"]["maxTokenCount"], 200);
        assert_eq!(body["textGenerationConfig"]["stopSequences"], json!(["User:"]));
    }

    #[test]
    fn llama_body_has_no_stop_field() {
        let mut profile = ModelProfile::llama2_chat();
        profile.generation.stop_sequences = vec!["User:".into()];
        let body = profile.request_body("p");
        assert_eq!(body["max_gen_len"], 256);
        assert!(body.get("stop").is_none());
        assert!(body.get("stop_sequences").is_none());
    }

    #[test]
    fn empty_stop_list_is_omitted() {
        let mut profile = ModelProfile::mistral_instruct();
        profile.generation.stop_sequences.clear();
        let body = profile.request_body("p");
        assert_eq!(body["max_tokens"], 200);
        assert!(body.get("stop").is_none());
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        let mut profile = ModelProfile::titan_express();
        profile.prompt_template = "no slot".into();
        let err = profile.validate().unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn trim_cleanup_keeps_full_completion() {
        let completion = RawCompletion::new("  Sure. Here are two sentences.  ");
        assert_eq!(
            ReplyCleanup::Trim.apply(&completion).as_str(),
            "Sure. Here are two sentences."
        );
        assert_eq!(ReplyCleanup::Normalize.apply(&completion).as_str(), "Sure.");
    }

    #[test]
    fn profile_deserializes_with_default_cleanup() {
        let raw = r#"{
            "name": "custom",
            "model_id": "vendor.model-v1",
            "prompt_template": "Q: {message}\nA:",
            "generation": {"max_tokens": 64, "temperature": 0.1, "top_p": 1.0},
            "schema": "mistral",
            "response_path": "outputs.0.text"
        }"#;
        let profile: ModelProfile = serde_json::from_str(raw).unwrap();
        assert_eq!(profile.cleanup, ReplyCleanup::Normalize);
        assert_eq!(profile.schema, RequestSchema::Mistral);
        assert!(profile.generation.stop_sequences.is_empty());
    }
}
