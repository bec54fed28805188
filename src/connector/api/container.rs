use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::application::{GenerateReplyUseCase, InferenceClient};
use crate::connector::{BedrockClient, BedrockConfig, MockInferenceClient, ProfileCatalog};
use crate::domain::{ModelProfile, DEFAULT_PROFILE};

pub struct ContainerConfig {
    /// Name of the profile every invocation uses.
    pub profile: String,
    /// Optional JSON file with extra or overriding profiles.
    pub profiles_file: Option<PathBuf>,
    pub bedrock: BedrockConfig,
    /// Answer from an in-process mock instead of calling Bedrock.
    pub mock_inference: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            profile: DEFAULT_PROFILE.to_string(),
            profiles_file: None,
            bedrock: BedrockConfig::default(),
            mock_inference: false,
        }
    }
}

/// Process-wide resources, built once at startup and shared by every
/// invocation. Dropping the container releases the HTTP connection pool.
pub struct Container {
    catalog: ProfileCatalog,
    profile: Arc<ModelProfile>,
    client: Arc<dyn InferenceClient>,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let catalog = ProfileCatalog::load(config.profiles_file.as_deref())?;
        let profile = Arc::new(catalog.get(&config.profile)?.clone());

        let client: Arc<dyn InferenceClient> = if config.mock_inference {
            debug!("Using mock inference client");
            Arc::new(MockInferenceClient::new(profile.response_path.clone()))
        } else {
            let client = BedrockClient::new(&config.bedrock)?;
            debug!("Using Bedrock runtime at {}", client.endpoint());
            Arc::new(client)
        };

        info!(
            "Serving profile {} ({}) via {}",
            profile.name,
            profile.model_id,
            client.name()
        );

        Ok(Self {
            catalog,
            profile,
            client,
        })
    }

    /// Assemble a container around an existing client, e.g. a mock in tests.
    pub fn with_client(profile: ModelProfile, client: Arc<dyn InferenceClient>) -> Self {
        Self {
            catalog: ProfileCatalog::builtin(),
            profile: Arc::new(profile),
            client,
        }
    }

    pub fn generate_reply_use_case(&self) -> GenerateReplyUseCase {
        GenerateReplyUseCase::new(Arc::clone(&self.client), Arc::clone(&self.profile))
    }

    pub fn profile(&self) -> &ModelProfile {
        &self.profile
    }

    pub fn catalog(&self) -> &ProfileCatalog {
        &self.catalog
    }

    pub fn client_name(&self) -> &str {
        self.client.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_selects_claude_profile() {
        let container = Container::new(ContainerConfig {
            mock_inference: true,
            ..ContainerConfig::default()
        })
        .expect("container");
        assert_eq!(container.profile().name, "claude-instant");
        assert_eq!(container.client_name(), "mock");
    }

    #[test]
    fn unknown_profile_fails_at_startup() {
        let result = Container::new(ContainerConfig {
            profile: "nope".into(),
            mock_inference: true,
            ..ContainerConfig::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn bedrock_client_is_built_without_network() {
        let container = Container::new(ContainerConfig::default()).expect("container");
        assert_eq!(container.client_name(), "bedrock");
    }
}
