mod bedrock_client;
mod mock_inference;
mod profile_catalog;

pub use bedrock_client::*;
pub use mock_inference::*;
pub use profile_catalog::*;
