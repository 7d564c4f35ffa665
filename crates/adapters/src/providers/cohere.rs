//! Cohere chat via the v2 API.

use async_trait::async_trait;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::config::AdapterConfig;
use crate::error::AdapterError;
use crate::llm::{LlmAdapter, MessageStream};
use crate::providers::{ensure_success, missing_api_key, sse_data_lines};
use crate::types::ChatMessage;

const COHERE_BASE_URL: &str = "https://api.cohere.com/v2";
const DEFAULT_MODEL: &str = "command-r";

pub struct CohereLlm {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl CohereLlm {
    pub fn from_config(config: AdapterConfig) -> Result<Self, AdapterError> {
        let api_key = config.api_key.ok_or_else(|| missing_api_key("cohere"))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config
                .base_url
                .unwrap_or_else(|| COHERE_BASE_URL.to_string()),
            api_key,
            model: config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    async fn post_chat(
        &self,
        messages: &[ChatMessage],
        stream: bool,
    ) -> Result<reqwest::Response, AdapterError> {
        let response = self
            .client
            .post(format!("{}/chat", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&ChatRequest {
                model: &self.model,
                messages,
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                stream,
            })
            .send()
            .await?;
        ensure_success(response).await
    }
}

#[async_trait]
impl LlmAdapter for CohereLlm {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<ChatMessage, AdapterError> {
        let response = self.post_chat(messages, false).await?;
        let body: ChatResponse = response.json().await?;
        let text = body
            .message
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");
        if text.is_empty() {
            return Err(AdapterError::Generation(
                "chat response contained no text content".into(),
            ));
        }
        Ok(ChatMessage::assistant(text))
    }

    async fn stream(&self, messages: &[ChatMessage]) -> Result<MessageStream, AdapterError> {
        let response = self.post_chat(messages, true).await?;
        let stream = sse_data_lines(response).filter_map(|payload| async {
            let payload = match payload {
                Ok(payload) => payload,
                Err(err) => return Some(Err(err)),
            };
            let event: StreamEvent = serde_json::from_str(&payload).ok()?;
            if event.kind != "content-delta" {
                return None;
            }
            let text = event.delta?.message?.content?.text?;
            if text.is_empty() {
                return None;
            }
            Some(Ok(ChatMessage::assistant(text)))
        });
        Ok(Box::pin(stream))
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
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct StreamEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    delta: Option<StreamDelta>,
}

#[derive(Deserialize)]
struct StreamDelta {
    #[serde(default)]
    message: Option<StreamMessage>,
}

#[derive(Deserialize)]
struct StreamMessage {
    #[serde(default)]
    content: Option<ContentBlock>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_blocks_concatenate() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"message":{"content":[{"type":"text","text":"foo "},{"type":"text","text":"bar"}]}}"#,
        )
        .unwrap();
        let text: String = body
            .message
            .content
            .into_iter()
            .filter_map(|b| b.text)
            .collect();
        assert_eq!(text, "foo bar");
    }

    #[test]
    fn stream_event_parses_content_delta() {
        let event: StreamEvent = serde_json::from_str(
            r#"{"type":"content-delta","delta":{"message":{"content":{"text":"chunk"}}}}"#,
        )
        .unwrap();
        assert_eq!(event.kind, "content-delta");
        let text = event.delta.unwrap().message.unwrap().content.unwrap().text;
        assert_eq!(text.as_deref(), Some("chunk"));
    }

    #[test]
    fn non_content_events_have_no_text() {
        let event: StreamEvent =
            serde_json::from_str(r#"{"type":"message-end","delta":{}}"#).unwrap();
        assert_eq!(event.kind, "message-end");
    }
}
