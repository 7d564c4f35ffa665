//! Firecrawl scraping API.
//!
//! Scrapes one URL per request; batches run sequentially and are best-effort.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AdapterConfig;
use crate::error::AdapterError;
use crate::providers::{ensure_success, missing_api_key};
use crate::types::Document;
use crate::web_scraper::WebScraperAdapter;

const FIRECRAWL_BASE_URL: &str = "https://api.firecrawl.dev/v1";

pub struct FirecrawlScraper {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FirecrawlScraper {
    pub fn from_config(config: AdapterConfig) -> Result<Self, AdapterError> {
        let api_key = config.api_key.ok_or_else(|| missing_api_key("firecrawl"))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: config
                .base_url
                .unwrap_or_else(|| FIRECRAWL_BASE_URL.to_string()),
            api_key,
        })
    }

    async fn scrape_one(&self, url: &str) -> Result<Document, AdapterError> {
        let response = self
            .client
            .post(format!("{}/scrape", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&ScrapeRequest {
                url,
                formats: &["markdown"],
            })
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body: ScrapeResponse = response.json().await?;

        let mut document = Document::new(body.data.markdown).with_metadata("source", url);
        if let Some(title) = body.data.metadata.title {
            document = document.with_metadata("title", title);
        }
        Ok(document)
    }
}

#[async_trait]
impl WebScraperAdapter for FirecrawlScraper {
    async fn load(&self, urls: &[String]) -> Result<Vec<Document>, AdapterError> {
        let mut documents = Vec::with_capacity(urls.len());
        for url in urls {
            match self.scrape_one(url).await {
                Ok(document) => documents.push(document),
                Err(err) => {
                    tracing::warn!(url = %url, error = %err, "scrape failed, skipping url");
                }
            }
        }
        Ok(documents)
    }
}

#[derive(Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: &'a [&'a str],
}

#[derive(Deserialize)]
struct ScrapeResponse {
    data: ScrapeData,
}

#[derive(Deserialize)]
struct ScrapeData {
    #[serde(default)]
    markdown: String,
    #[serde(default)]
    metadata: ScrapeMetadata,
}

#[derive(Deserialize, Default)]
struct ScrapeMetadata {
    #[serde(default)]
    title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrape_response_parses_markdown_and_title() {
        let body: ScrapeResponse = serde_json::from_str(
            r##"{"success":true,"data":{"markdown":"# Hello","metadata":{"title":"Hello Page"}}}"##,
        )
        .unwrap();
        assert_eq!(body.data.markdown, "# Hello");
        assert_eq!(body.data.metadata.title.as_deref(), Some("Hello Page"));
    }

    #[test]
    fn missing_metadata_defaults() {
        let body: ScrapeResponse =
            serde_json::from_str(r#"{"data":{"markdown":"x"}}"#).unwrap();
        assert!(body.data.metadata.title.is_none());
    }
}
