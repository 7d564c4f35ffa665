//! DuckDuckGo search via the keyless Instant Answer API.
//!
//! The fallback search path when no search credential is configured. Related
//! topics arrive either flat or grouped by category; both shapes are
//! flattened into one relevance-ordered list.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::AdapterConfig;
use crate::error::AdapterError;
use crate::providers::ensure_success;
use crate::types::SearchResult;
use crate::web_search::WebSearchAdapter;

const DUCKDUCKGO_BASE_URL: &str = "https://api.duckduckgo.com";

pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    base_url: String,
}

impl DuckDuckGoSearch {
    pub fn from_config(config: AdapterConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config
                .base_url
                .unwrap_or_else(|| DUCKDUCKGO_BASE_URL.to_string()),
        }
    }
}

#[async_trait]
impl WebSearchAdapter for DuckDuckGoSearch {
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, AdapterError> {
        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .query(&[("q", query), ("format", "json"), ("no_html", "1")])
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body: InstantAnswer = response.json().await?;
        Ok(flatten_topics(body, num_results))
    }
}

fn flatten_topics(body: InstantAnswer, limit: usize) -> Vec<SearchResult> {
    let mut results = Vec::new();

    // The abstract, when present, is the best single answer.
    if !body.abstract_url.is_empty() && !body.abstract_text.is_empty() {
        results.push(SearchResult {
            title: body.heading.clone(),
            url: body.abstract_url.clone(),
            snippet: body.abstract_text.clone(),
        });
    }

    let mut stack: Vec<RelatedTopic> = body.related_topics;
    stack.reverse();
    while let Some(topic) = stack.pop() {
        if results.len() >= limit {
            break;
        }
        match topic {
            RelatedTopic::Link { first_url, text } => {
                if !first_url.is_empty() && !text.is_empty() {
                    results.push(SearchResult {
                        // The IA API has no separate title field; the text
                        // leads with the topic name.
                        title: text.chars().take(80).collect(),
                        url: first_url,
                        snippet: text,
                    });
                }
            }
            RelatedTopic::Group { topics, .. } => {
                for nested in topics.into_iter().rev() {
                    stack.push(nested);
                }
            }
        }
    }

    results.truncate(limit);
    results
}

// ---- wire types ----

#[derive(Deserialize)]
struct InstantAnswer {
    #[serde(rename = "Heading", default)]
    heading: String,
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

/// Untagged: a group is recognized by its `Topics` field, a link by
/// `FirstURL`. The fields are mandatory on purpose so the variants stay
/// distinguishable.
#[derive(Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Group {
        #[serde(rename = "Topics")]
        topics: Vec<RelatedTopic>,
    },
    Link {
        #[serde(rename = "FirstURL")]
        first_url: String,
        #[serde(rename = "Text", default)]
        text: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> InstantAnswer {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn flattens_nested_topic_groups_in_order() {
        let body = parse(
            r#"{
                "Heading": "Rust",
                "AbstractText": "A systems language.",
                "AbstractURL": "https://rust-lang.org",
                "RelatedTopics": [
                    {"FirstURL": "https://a.test", "Text": "first"},
                    {"Name": "See also", "Topics": [
                        {"FirstURL": "https://b.test", "Text": "second"}
                    ]}
                ]
            }"#,
        );
        let results = flatten_topics(body, 10);
        let urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            ["https://rust-lang.org", "https://a.test", "https://b.test"]
        );
    }

    #[test]
    fn respects_the_result_limit() {
        let body = parse(
            r#"{"RelatedTopics": [
                {"FirstURL": "https://a.test", "Text": "a"},
                {"FirstURL": "https://b.test", "Text": "b"},
                {"FirstURL": "https://c.test", "Text": "c"}
            ]}"#,
        );
        assert_eq!(flatten_topics(body, 2).len(), 2);
    }

    #[test]
    fn skips_entries_without_text() {
        let body = parse(r#"{"RelatedTopics": [{"FirstURL": "https://a.test", "Text": ""}]}"#);
        assert!(flatten_topics(body, 5).is_empty());
    }
}
