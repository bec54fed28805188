pub mod chat_controller;
pub mod invoke_controller;
pub mod profiles_controller;

pub use chat_controller::{ChatController, ChatOutcome, MESSAGE_PARAM};
pub use invoke_controller::InvokeController;
pub use profiles_controller::ProfilesController;
