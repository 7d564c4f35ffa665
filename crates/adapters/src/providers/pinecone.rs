//! Pinecone vector index over its data-plane REST API.
//!
//! The index host (`base_url`) identifies which index to talk to; documents
//! are embedded through the user's resolved embeddings adapter before upsert
//! and query.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::AdapterConfig;
use crate::embeddings::EmbeddingsAdapter;
use crate::error::AdapterError;
use crate::providers::{ensure_success, missing_api_key};
use crate::types::Document;

pub struct PineconeVectorStore {
    client: reqwest::Client,
    host: String,
    api_key: String,
    embeddings: Arc<dyn EmbeddingsAdapter>,
}

impl PineconeVectorStore {
    pub fn from_config(
        config: AdapterConfig,
        embeddings: Arc<dyn EmbeddingsAdapter>,
    ) -> Result<Self, AdapterError> {
        let api_key = config.api_key.ok_or_else(|| missing_api_key("pinecone"))?;
        let host = config.base_url.ok_or_else(|| {
            AdapterError::InvalidInput("pinecone requires a base_url (the index host)".into())
        })?;
        Ok(Self {
            client: reqwest::Client::new(),
            host,
            api_key,
            embeddings,
        })
    }

    async fn post<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, AdapterError> {
        let response = self
            .client
            .post(format!("{}{}", self.host, path))
            .header("Api-Key", &self.api_key)
            .json(body)
            .send()
            .await?;
        ensure_success(response).await
    }
}

#[async_trait]
impl crate::vector_store::VectorStoreAdapter for PineconeVectorStore {
    async fn add_documents(&self, documents: &[Document]) -> Result<Vec<String>, AdapterError> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        let texts: Vec<String> = documents.iter().map(|d| d.page_content.clone()).collect();
        let values = self.embeddings.embed_documents(&texts).await?;

        let mut ids = Vec::with_capacity(documents.len());
        let vectors: Vec<Vector> = documents
            .iter()
            .zip(values)
            .map(|(doc, values)| {
                let id = uuid::Uuid::new_v4().to_string();
                ids.push(id.clone());
                let mut metadata = doc.metadata.clone();
                metadata.insert("page_content".into(), doc.page_content.clone().into());
                Vector {
                    id,
                    values,
                    metadata,
                }
            })
            .collect();

        self.post("/vectors/upsert", &UpsertRequest { vectors })
            .await?;
        Ok(ids)
    }

    async fn similarity_search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<Document>, AdapterError> {
        if k == 0 {
            return Err(AdapterError::InvalidInput("k must be >= 1".into()));
        }
        let vector = self.embeddings.embed_query(query).await?;
        let response = self
            .post(
                "/query",
                &QueryRequest {
                    vector,
                    top_k: k,
                    include_metadata: true,
                },
            )
            .await?;
        let body: QueryResponse = response.json().await?;

        Ok(body
            .matches
            .into_iter()
            .map(|m| {
                let mut metadata = m.metadata;
                let page_content = match metadata.remove("page_content") {
                    Some(Value::String(text)) => text,
                    _ => String::new(),
                };
                metadata.insert("score".into(), m.score.into());
                Document {
                    page_content,
                    metadata,
                }
            })
            .collect())
    }

    async fn delete(&self, ids: &[String]) -> Result<bool, AdapterError> {
        if ids.is_empty() {
            return Ok(true);
        }
        self.post("/vectors/delete", &DeleteRequest { ids }).await?;
        Ok(true)
    }
}

// ---- wire types ----

#[derive(Serialize)]
struct UpsertRequest {
    vectors: Vec<Vector>,
}

#[derive(Serialize)]
struct Vector {
    id: String,
    values: Vec<f32>,
    metadata: seekr_core::types::JsonMap,
}

#[derive(Serialize)]
struct QueryRequest {
    vector: Vec<f32>,
    #[serde(rename = "topK")]
    top_k: usize,
    #[serde(rename = "includeMetadata")]
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<Match>,
}

#[derive(Deserialize)]
struct Match {
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: seekr_core::types::JsonMap,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    ids: &'a [String],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_request_uses_pinecone_field_names() {
        let json = serde_json::to_value(QueryRequest {
            vector: vec![0.1, 0.2],
            top_k: 4,
            include_metadata: true,
        })
        .unwrap();
        assert_eq!(json["topK"], 4);
        assert_eq!(json["includeMetadata"], true);
    }

    #[test]
    fn match_metadata_defaults_when_absent() {
        let body: QueryResponse =
            serde_json::from_str(r#"{"matches":[{"id":"a","score":0.9}]}"#).unwrap();
        assert_eq!(body.matches.len(), 1);
        assert!(body.matches[0].metadata.is_empty());
    }
}
