//! Tavily search API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AdapterConfig;
use crate::error::AdapterError;
use crate::providers::{ensure_success, missing_api_key};
use crate::types::SearchResult;
use crate::web_search::WebSearchAdapter;

const TAVILY_BASE_URL: &str = "https://api.tavily.com";

pub struct TavilySearch {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TavilySearch {
    pub fn from_config(config: AdapterConfig) -> Result<Self, AdapterError> {
        let api_key = config.api_key.ok_or_else(|| missing_api_key("tavily"))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config
                .base_url
                .unwrap_or_else(|| TAVILY_BASE_URL.to_string()),
            api_key,
        })
    }
}

#[async_trait]
impl WebSearchAdapter for TavilySearch {
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, AdapterError> {
        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&SearchRequest {
                api_key: &self.api_key,
                query,
                max_results: num_results,
            })
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body: SearchResponse = response.json().await?;

        Ok(body
            .results
            .into_iter()
            .map(|r| SearchResult {
                title: r.title,
                url: r.url,
                snippet: r.content,
            })
            .collect())
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_map_content_to_snippet() {
        let body: SearchResponse = serde_json::from_str(
            r#"{"results":[{"title":"T","url":"https://x.test","content":"summary"}]}"#,
        )
        .unwrap();
        let hit = &body.results[0];
        assert_eq!(hit.content, "summary");
        assert_eq!(hit.url, "https://x.test");
    }

    #[test]
    fn empty_result_set_is_valid() {
        let body: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(body.results.is_empty());
    }
}
