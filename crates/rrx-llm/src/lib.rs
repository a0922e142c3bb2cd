//! Chat-completion abstraction layer for rrx.
//!
//! This crate provides a single interface for sending a prompt to a hosted
//! language model and getting the reply text back:
//! - `CompletionBackend` is the seam the extractors are written against
//! - `OpenAiBackend` talks to any OpenAI-compatible `/chat/completions` API

mod backend;
mod error;
mod message;

pub use backend::CompletionBackend;
pub use backend::openai::{OpenAiBackend, OpenAiSettings};
pub use error::LlmError;
pub use message::{ChatMessage, CompletionRequest, Role};

/// Result type for completion operations.
pub type Result<T> = std::result::Result<T, LlmError>;
