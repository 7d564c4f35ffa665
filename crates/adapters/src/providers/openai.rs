//! OpenAI chat completions and embeddings.
//!
//! The chat client also serves Groq, Mistral and OpenRouter, which implement
//! the same wire protocol under a different base URL.

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::config::AdapterConfig;
use crate::embeddings::EmbeddingsAdapter;
use crate::error::AdapterError;
use crate::llm::{LlmAdapter, MessageStream};
use crate::providers::{ensure_success, missing_api_key, sse_data_lines};
use crate::types::ChatMessage;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Chat client for the OpenAI `/chat/completions` protocol.
pub struct OpenAiLlm {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl OpenAiLlm {
    pub fn from_config(
        config: AdapterConfig,
        default_base_url: &str,
        default_model: &str,
    ) -> Result<Self, AdapterError> {
        let api_key = config.api_key.ok_or_else(|| missing_api_key("openai"))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config
                .base_url
                .unwrap_or_else(|| default_base_url.to_string()),
            api_key,
            model: config.model.unwrap_or_else(|| default_model.to_string()),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn request_body<'a>(&'a self, messages: &'a [ChatMessage], stream: bool) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream,
        }
    }

    async fn post_chat(
        &self,
        messages: &[ChatMessage],
        stream: bool,
    ) -> Result<reqwest::Response, AdapterError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.request_body(messages, stream))
            .send()
            .await?;
        ensure_success(response).await
    }
}

#[async_trait]
impl LlmAdapter for OpenAiLlm {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<ChatMessage, AdapterError> {
        let response = self.post_chat(messages, false).await?;
        let completion: ChatResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| AdapterError::Generation("completion returned no choices".into()))
    }

    async fn stream(&self, messages: &[ChatMessage]) -> Result<MessageStream, AdapterError> {
        let response = self.post_chat(messages, true).await?;
        let stream = sse_data_lines(response).filter_map(|payload| async {
            let payload = match payload {
                Ok(payload) => payload,
                Err(err) => return Some(Err(err)),
            };
            // Malformed chunks are skipped rather than aborting the stream.
            let chunk: StreamChunk = serde_json::from_str(&payload).ok()?;
            let content = chunk.choices.into_iter().next()?.delta.content?;
            if content.is_empty() {
                return None;
            }
            Some(Ok(ChatMessage::assistant(content)))
        });
        Ok(Box::pin(stream))
    }
}

/// Client for the OpenAI `/embeddings` endpoint.
pub struct OpenAiEmbeddings {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiEmbeddings {
    pub fn from_config(config: AdapterConfig) -> Result<Self, AdapterError> {
        let api_key = config.api_key.ok_or_else(|| missing_api_key("openai"))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config
                .base_url
                .unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
            api_key,
            model: config
                .model
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
        })
    }

    async fn embed(&self, input: &[String]) -> Result<Vec<Vec<f32>>, AdapterError> {
        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input,
            })
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body: EmbeddingResponse = response.json().await?;
        if body.data.len() != input.len() {
            return Err(AdapterError::Embedding(format!(
                "expected {} vectors, provider returned {}",
                input.len(),
                body.data.len()
            )));
        }
        Ok(body.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingsAdapter for OpenAiEmbeddings {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AdapterError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.embed(texts).await
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, AdapterError> {
        let input = [text.to_string()];
        let mut vectors = self.embed(&input).await?;
        vectors
            .pop()
            .ok_or_else(|| AdapterError::Embedding("provider returned no vector".into()))
    }
}

// ---- wire types ----

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: Delta,
}

#[derive(Deserialize)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    #[test]
    fn chat_request_serializes_to_the_wire_format() {
        let messages = vec![ChatMessage::system("be terse"), ChatMessage::user("hi")];
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: &messages,
            temperature: Some(0.3),
            max_tokens: None,
            stream: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert_eq!(json["temperature"], 0.3);
        // Unset knobs are omitted, not sent as null.
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn stream_chunk_parses_delta_content() {
        let chunk: StreamChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{"content":"hel"}}]}"#).unwrap();
        assert_eq!(chunk.choices[0].delta.content.as_deref(), Some("hel"));

        // Terminal chunks carry a role-only or empty delta.
        let chunk: StreamChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{}}]}"#).unwrap();
        assert!(chunk.choices[0].delta.content.is_none());
    }

    #[test]
    fn completion_message_deserializes() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"hello"}}]}"#,
        )
        .unwrap();
        let message = &response.choices[0].message;
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.content, "hello");
    }

    #[test]
    fn missing_api_key_fails_construction() {
        let err = OpenAiLlm::from_config(AdapterConfig::new(), OPENAI_BASE_URL, "gpt-4o-mini")
            .err()
            .unwrap();
        assert!(matches!(err, AdapterError::InvalidInput(_)));
    }
}
