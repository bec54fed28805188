//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Inference (Bedrock runtime over HTTP, plus an in-process mock)
//! - Profile catalog (built-ins and JSON overrides)
//! - Entry points (HTTP server, API Gateway proxy events, CLI routing)

pub mod adapter;
pub mod api;

pub use adapter::*;
