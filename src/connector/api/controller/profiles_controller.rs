use anyhow::Result;

use crate::domain::ModelProfile;

use super::super::Container;

pub struct ProfilesController<'a> {
    container: &'a Container,
}

impl<'a> ProfilesController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn list(&self) -> Result<String> {
        let active = &self.container.profile().name;
        Ok(self.format_profiles(self.container.catalog().profiles(), active))
    }

    fn format_profiles(&self, profiles: &[ModelProfile], active: &str) -> String {
        let mut output = String::from("Model profiles:\n\n");
        for profile in profiles {
            let marker = if profile.name == active { "*" } else { " " };
            output.push_str(&format!(
                "{} {} ({})\n    schema: {}, response: {}, cleanup: {:?}\n    max_tokens: {}, temperature: {}, top_p: {}\n",
                marker,
                profile.name,
                profile.model_id,
                profile.schema,
                profile.response_path,
                profile.cleanup,
                profile.generation.max_tokens,
                profile.generation.temperature,
                profile.generation.top_p,
            ));
        }
        output
    }
}
