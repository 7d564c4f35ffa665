//! Hugging Face Inference API feature-extraction embeddings.

use async_trait::async_trait;
use serde::Serialize;

use crate::config::AdapterConfig;
use crate::embeddings::EmbeddingsAdapter;
use crate::error::AdapterError;
use crate::providers::{ensure_success, missing_api_key};

const INFERENCE_BASE_URL: &str = "https://api-inference.huggingface.co";
const DEFAULT_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

pub struct HuggingFaceEmbeddings {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl HuggingFaceEmbeddings {
    pub fn from_config(config: AdapterConfig) -> Result<Self, AdapterError> {
        let api_key = config
            .api_key
            .ok_or_else(|| missing_api_key("huggingface"))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config
                .base_url
                .unwrap_or_else(|| INFERENCE_BASE_URL.to_string()),
            api_key,
            model: config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AdapterError> {
        let response = self
            .client
            .post(format!(
                "{}/pipeline/feature-extraction/{}",
                self.base_url, self.model
            ))
            .bearer_auth(&self.api_key)
            .json(&FeatureExtractionRequest { inputs })
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let vectors: Vec<Vec<f32>> = response.json().await?;
        if vectors.len() != inputs.len() {
            return Err(AdapterError::Embedding(format!(
                "expected {} vectors, provider returned {}",
                inputs.len(),
                vectors.len()
            )));
        }
        Ok(vectors)
    }
}

#[async_trait]
impl EmbeddingsAdapter for HuggingFaceEmbeddings {
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

#[derive(Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a [String],
}
