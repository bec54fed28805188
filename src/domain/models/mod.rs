mod message;
mod model_profile;
mod response_path;

pub use message::*;
pub use model_profile::*;
pub use response_path::*;
