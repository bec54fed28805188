//! Domain services containing the core text transforms.

mod error;
mod reply_normalizer;

pub use error::*;
pub use reply_normalizer::*;
