use std::path::Path;

use tracing::{debug, info};

use crate::domain::{DomainError, ModelProfile};

/// The set of model profiles a process can serve: the built-ins, optionally
/// extended or overridden by a JSON file.
#[derive(Debug, Clone)]
pub struct ProfileCatalog {
    profiles: Vec<ModelProfile>,
}

impl ProfileCatalog {
    pub fn builtin() -> Self {
        Self {
            profiles: ModelProfile::builtin(),
        }
    }

    /// Built-ins plus the profiles in `path` (a JSON array). A file profile
    /// whose name matches a built-in replaces it.
    pub fn load(path: Option<&Path>) -> Result<Self, DomainError> {
        let mut catalog = Self::builtin();
        if let Some(path) = path {
            let raw = std::fs::read_to_string(path).map_err(|e| {
                DomainError::configuration(format!(
                    "cannot read profiles file {}: {e}",
                    path.display()
                ))
            })?;
            let extra = Self::parse(&raw).map_err(|e| {
                DomainError::configuration(format!("{}: {e}", path.display()))
            })?;
            info!(
                "Loaded {} profile(s) from {}",
                extra.len(),
                path.display()
            );
            for profile in extra {
                catalog.insert(profile);
            }
        }
        Ok(catalog)
    }

    fn parse(raw: &str) -> Result<Vec<ModelProfile>, DomainError> {
        let profiles: Vec<ModelProfile> = serde_json::from_str(raw)
            .map_err(|e| DomainError::configuration(format!("invalid profiles JSON: {e}")))?;
        for profile in &profiles {
            profile.validate()?;
        }
        Ok(profiles)
    }

    pub fn insert(&mut self, profile: ModelProfile) {
        match self.profiles.iter_mut().find(|p| p.name == profile.name) {
            Some(existing) => {
                debug!("Overriding profile {}", profile.name);
                *existing = profile;
            }
            None => self.profiles.push(profile),
        }
    }

    pub fn get(&self, name: &str) -> Result<&ModelProfile, DomainError> {
        self.profiles.iter().find(|p| p.name == name).ok_or_else(|| {
            DomainError::configuration(format!(
                "unknown profile '{name}' (available: {})",
                self.names().join(", ")
            ))
        })
    }

    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn profiles(&self) -> &[ModelProfile] {
        &self.profiles
    }
}

impl Default for ProfileCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_profile_lists_available_names() {
        let catalog = ProfileCatalog::builtin();
        let err = catalog.get("gpt").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("unknown profile 'gpt'"));
        assert!(msg.contains("claude-instant"));
        assert!(msg.contains("mistral-instruct"));
    }

    #[test]
    fn insert_replaces_same_name() {
        let mut catalog = ProfileCatalog::builtin();
        let mut custom = ModelProfile::claude_instant();
        custom.model_id = "anthropic.claude-v2".into();
        catalog.insert(custom);

        assert_eq!(catalog.profiles().len(), 4);
        assert_eq!(
            catalog.get("claude-instant").unwrap().model_id,
            "anthropic.claude-v2"
        );
    }

    #[test]
    fn parse_rejects_profile_without_placeholder() {
        let raw = r#"[{
            "name": "bad",
            "model_id": "x",
            "prompt_template": "static",
            "generation": {"max_tokens": 1, "temperature": 0.0, "top_p": 1.0},
            "schema": "llama",
            "response_path": "generation"
        }]"#;
        assert!(ProfileCatalog::parse(raw).is_err());
    }
}
