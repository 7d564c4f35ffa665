//! Language model capability contract.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::AdapterError;
use crate::types::ChatMessage;

/// Streamed chunks from [`LlmAdapter::stream`].
pub type MessageStream = BoxStream<'static, Result<ChatMessage, AdapterError>>;

/// A chat-completion language model.
#[async_trait]
pub trait LlmAdapter: Send + Sync {
    /// Generate a single response for the conversation.
    async fn generate(&self, messages: &[ChatMessage]) -> Result<ChatMessage, AdapterError>;

    /// Stream the response as it is produced.
    ///
    /// The returned stream is lazy, finite, and non-restartable. Dropping it
    /// mid-iteration releases the underlying connection.
    async fn stream(&self, messages: &[ChatMessage]) -> Result<MessageStream, AdapterError>;
}

impl std::fmt::Debug for dyn LlmAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn LlmAdapter")
    }
}
