//! # Domain Layer
//!
//! Core models and the reply normalizer.
//! This layer is independent of external frameworks and infrastructure.

pub mod models;
pub mod services;

pub use models::*;
pub use services::*;
