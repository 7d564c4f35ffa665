//! The conversational consumer of resolved adapters.
//!
//! [`QueryAgent`] answers a user question by searching the web, scraping the
//! top hits, optionally pulling matches from the user's vector store, and
//! prompting the user's LLM with the collected context. Every adapter comes
//! from the resolver per call; the agent holds no provider state.

use std::sync::Arc;

use seekr_adapters::embeddings::EmbeddingsAdapter;
use seekr_adapters::error::AdapterError;
use seekr_adapters::llm::LlmAdapter;
use seekr_adapters::types::{ChatMessage, Document, SearchResult};
use seekr_adapters::web_scraper::WebScraperAdapter;
use seekr_adapters::web_search::WebSearchAdapter;
use seekr_core::types::{categories, DbId};
use seekr_resolver::{ResolveError, ServiceResolver};
use serde::Serialize;

const SEARCH_RESULTS: usize = 5;
const SCRAPE_LIMIT: usize = 3;
const RETRIEVAL_LIMIT: usize = 4;

/// Truncation cap per scraped document fed into the prompt.
const DOCUMENT_CHAR_LIMIT: usize = 4000;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

/// The agent's reply plus the URLs that grounded it.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub content: String,
    pub sources: Vec<String>,
}

pub struct QueryAgent {
    resolver: Arc<ServiceResolver>,
}

impl QueryAgent {
    pub fn new(resolver: Arc<ServiceResolver>) -> Self {
        Self { resolver }
    }

    /// Answer a query for the user. An explicit `api_key` is forwarded to the
    /// LLM resolution (the test/dev path); search and scraping still run.
    pub async fn answer(
        &self,
        user_id: DbId,
        query: &str,
        api_key: Option<&str>,
    ) -> Result<Answer, AgentError> {
        let search = self.resolver.resolve_web_search(user_id).await?;
        let scraper = self.resolver.resolve_web_scraper(user_id).await?;
        let llm = self.resolver.resolve_llm(user_id, api_key).await?;

        let retrieved = self.retrieve_context(user_id, query).await;

        run_pipeline(search, scraper, llm, retrieved, query).await
    }

    /// Pull matches from the user's vector store when both embedding and
    /// vector-store credentials exist. Best-effort: failures are logged and
    /// the answer proceeds without retrieval.
    async fn retrieve_context(&self, user_id: DbId, query: &str) -> Vec<Document> {
        let configured = match self
            .resolver
            .has_credential(user_id, categories::VECTOR_STORE)
            .await
        {
            Ok(configured) => configured,
            Err(err) => {
                tracing::warn!(user_id, error = %err, "retrieval availability check failed");
                return Vec::new();
            }
        };
        if !configured {
            return Vec::new();
        }

        let result = async {
            let embeddings = self.resolver.resolve_embeddings(user_id, None).await?;
            let store = self
                .resolver
                .resolve_vector_store(user_id, embeddings)
                .await?;
            store
                .similarity_search(query, RETRIEVAL_LIMIT)
                .await
                .map_err(AgentError::from)
        }
        .await;

        match result {
            Ok(documents) => documents,
            Err(err) => {
                tracing::warn!(user_id, error = %err, "retrieval failed, answering without it");
                Vec::new()
            }
        }
    }
}

/// The search -> scrape -> generate pipeline over already-resolved adapters.
async fn run_pipeline(
    search: Arc<dyn WebSearchAdapter>,
    scraper: Arc<dyn WebScraperAdapter>,
    llm: Arc<dyn LlmAdapter>,
    retrieved: Vec<Document>,
    query: &str,
) -> Result<Answer, AgentError> {
    let results = search.search(query, SEARCH_RESULTS).await?;

    let urls: Vec<String> = results
        .iter()
        .take(SCRAPE_LIMIT)
        .map(|r| r.url.clone())
        .collect();
    let scraped = if urls.is_empty() {
        Vec::new()
    } else {
        scraper.load(&urls).await?
    };

    let messages = build_prompt(query, &results, &scraped, &retrieved);
    let reply = llm.generate(&messages).await?;

    let sources = results.into_iter().map(|r| r.url).collect();
    Ok(Answer {
        content: reply.content,
        sources,
    })
}

/// Assemble the grounded prompt: a system message carrying the collected
/// context, then the user's question.
fn build_prompt(
    query: &str,
    results: &[SearchResult],
    scraped: &[Document],
    retrieved: &[Document],
) -> Vec<ChatMessage> {
    let mut context = String::from(
        "You are a research assistant. Answer using the sources below and \
         cite the URLs you relied on. If the sources do not cover the \
         question, say so.\n",
    );

    if !results.is_empty() {
        context.push_str("\nSearch results:\n");
        for result in results {
            context.push_str(&format!(
                "- {} ({}): {}\n",
                result.title, result.url, result.snippet
            ));
        }
    }

    if !scraped.is_empty() {
        context.push_str("\nPage contents:\n");
        for document in scraped {
            let source = document.source().unwrap_or("unknown");
            let body = truncate_chars(&document.page_content, DOCUMENT_CHAR_LIMIT);
            context.push_str(&format!("--- {source} ---\n{body}\n"));
        }
    }

    if !retrieved.is_empty() {
        context.push_str("\nFrom your knowledge base:\n");
        for document in retrieved {
            context.push_str(&format!("- {}\n", document.page_content));
        }
    }

    vec![ChatMessage::system(context), ChatMessage::user(query)]
}

fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        text.chars().take(limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use seekr_adapters::llm::MessageStream;
    use seekr_adapters::types::Role;

    struct StubSearch;

    #[async_trait]
    impl WebSearchAdapter for StubSearch {
        async fn search(
            &self,
            _query: &str,
            _num_results: usize,
        ) -> Result<Vec<SearchResult>, AdapterError> {
            Ok(vec![SearchResult {
                title: "Rust book".to_string(),
                url: "https://doc.rust-lang.org/book".to_string(),
                snippet: "The Rust Programming Language".to_string(),
            }])
        }
    }

    struct StubScraper;

    #[async_trait]
    impl WebScraperAdapter for StubScraper {
        async fn load(&self, urls: &[String]) -> Result<Vec<Document>, AdapterError> {
            Ok(urls
                .iter()
                .map(|url| {
                    Document::new("Ownership is Rust's most unique feature.")
                        .with_metadata("source", url.as_str())
                })
                .collect())
        }
    }

    /// Echoes the last system message so tests can inspect the prompt.
    struct EchoLlm;

    #[async_trait]
    impl LlmAdapter for EchoLlm {
        async fn generate(&self, messages: &[ChatMessage]) -> Result<ChatMessage, AdapterError> {
            let system = messages
                .iter()
                .find(|m| m.role == Role::System)
                .map(|m| m.content.clone())
                .unwrap_or_default();
            Ok(ChatMessage::assistant(system))
        }

        async fn stream(&self, _messages: &[ChatMessage]) -> Result<MessageStream, AdapterError> {
            Ok(Box::pin(futures::stream::empty()))
        }
    }

    #[tokio::test]
    async fn pipeline_grounds_the_prompt_and_reports_sources() {
        let answer = run_pipeline(
            Arc::new(StubSearch),
            Arc::new(StubScraper),
            Arc::new(EchoLlm),
            Vec::new(),
            "what is ownership?",
        )
        .await
        .unwrap();

        assert_eq!(answer.sources, vec!["https://doc.rust-lang.org/book"]);
        // The system prompt carried both the search hit and the scraped page.
        assert!(answer.content.contains("Rust book"));
        assert!(answer.content.contains("most unique feature"));
    }

    #[test]
    fn prompt_includes_retrieved_documents() {
        let retrieved = vec![Document::new("Previously saved note about lifetimes.")];
        let messages = build_prompt("lifetimes?", &[], &[], &retrieved);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("knowledge base"));
        assert!(messages[0].content.contains("saved note about lifetimes"));
        assert_eq!(messages[1].content, "lifetimes?");
    }

    #[test]
    fn prompt_truncates_long_documents() {
        let long = "x".repeat(DOCUMENT_CHAR_LIMIT * 2);
        let scraped = vec![Document::new(long).with_metadata("source", "https://a.test")];
        let messages = build_prompt("q", &[], &scraped, &[]);
        assert!(messages[0].content.len() < DOCUMENT_CHAR_LIMIT + 500);
    }
}
