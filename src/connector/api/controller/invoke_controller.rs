use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::Value;

use super::super::proxy_event::handle_event;
use super::super::Container;

pub struct InvokeController<'a> {
    container: &'a Container,
}

impl<'a> InvokeController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Run one proxy event read from `event_path`, or from stdin when absent,
    /// and return the proxy response as JSON.
    pub async fn invoke(&self, event_path: Option<PathBuf>) -> Result<String> {
        let raw = match event_path {
            Some(path) => std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read event file {}", path.display()))?,
            None => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("failed to read event from stdin")?;
                buf
            }
        };

        self.invoke_raw(&raw).await
    }

    pub async fn invoke_raw(&self, raw: &str) -> Result<String> {
        let event: Value = serde_json::from_str(raw).context("event is not valid JSON")?;
        let response = handle_event(self.container, &event).await;
        Ok(serde_json::to_string_pretty(&response)?)
    }
}
