use anyhow::Result;

use crate::domain::normalize;
use crate::Commands;

use super::container::Container;
use super::controller::{ChatController, InvokeController, ProfilesController};

pub struct Router<'a> {
    chat_controller: ChatController<'a>,
    invoke_controller: InvokeController<'a>,
    profiles_controller: ProfilesController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            chat_controller: ChatController::new(container),
            invoke_controller: InvokeController::new(container),
            profiles_controller: ProfilesController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Ask { message } => self.chat_controller.ask(message).await,
            Commands::Invoke { event } => self.invoke_controller.invoke(event).await,
            Commands::Normalize { text } => Ok(normalize(&text)),
            Commands::Profiles => self.profiles_controller.list().await,
            Commands::Serve { .. } => unreachable!("serve is handled separately in main"),
        }
    }
}
