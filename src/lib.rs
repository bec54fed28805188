pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{GenerateReplyUseCase, InferenceClient};

pub use cli::Commands;

pub use connector::{BedrockClient, BedrockConfig, MockInferenceClient, ProfileCatalog};

pub use domain::{
    normalize, CleanedReply, DomainError, GenerationParams, ModelProfile, Query, RawCompletion,
    ReplyCleanup, RequestSchema, ResponsePath,
};
