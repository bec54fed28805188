pub mod container;
pub mod controller;
pub mod http;
pub mod proxy_event;
pub mod router;

pub use container::{Container, ContainerConfig};
pub use controller::{ChatController, ChatOutcome};
pub use proxy_event::{handle_event, ProxyResponse};
pub use router::Router;
