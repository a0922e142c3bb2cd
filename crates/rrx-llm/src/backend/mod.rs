//! Completion backend implementations.

pub mod openai;

use std::future::Future;

use crate::{CompletionRequest, Result};

/// Trait for chat-completion backends.
///
/// Extractors are generic over this trait so the hosted service can be
/// swapped for a local server or a canned backend in tests.
pub trait CompletionBackend: Send + Sync {
    /// Send the request and return the text of the first choice.
    fn complete(&self, request: &CompletionRequest) -> impl Future<Output = Result<String>> + Send;

    /// Short name used in logs.
    fn name(&self) -> &str;
}
