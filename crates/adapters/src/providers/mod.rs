//! Concrete provider implementations.
//!
//! Each provider is a thin reqwest client over the vendor's HTTP API,
//! exposing one or more capability traits. [`register_builtins`] wires every
//! built-in provider into a registry under its catalog name.

use std::sync::Arc;

use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};

use crate::error::AdapterError;
use crate::registry::AdapterRegistry;

pub mod cohere;
pub mod duckduckgo;
pub mod firecrawl;
pub mod http_scraper;
pub mod huggingface;
pub mod openai;
pub mod pinecone;
pub mod supabase;
pub mod tavily;

/// Register every built-in provider under its well-known name.
///
/// Groq, Mistral and OpenRouter expose OpenAI-compatible chat endpoints, so
/// they share the OpenAI client with a different base URL and default model.
pub fn register_builtins(registry: &mut AdapterRegistry) {
    let openai_compatible: [(&str, &str, &str); 4] = [
        ("openai", openai::OPENAI_BASE_URL, "gpt-4o-mini"),
        ("groq", "https://api.groq.com/openai/v1", "llama-3.3-70b-versatile"),
        ("mistral", "https://api.mistral.ai/v1", "mistral-small-latest"),
        ("openrouter", "https://openrouter.ai/api/v1", "openai/gpt-4o-mini"),
    ];
    for (name, base_url, default_model) in openai_compatible {
        registry.register_llm(name, move |config| {
            Ok(Arc::new(openai::OpenAiLlm::from_config(config, base_url, default_model)?) as _)
        });
    }
    registry.register_llm("cohere", |config| {
        Ok(Arc::new(cohere::CohereLlm::from_config(config)?) as _)
    });

    registry.register_embeddings("openai", |config| {
        Ok(Arc::new(openai::OpenAiEmbeddings::from_config(config)?) as _)
    });
    registry.register_embeddings("huggingface", |config| {
        Ok(Arc::new(huggingface::HuggingFaceEmbeddings::from_config(config)?) as _)
    });

    registry.register_vector_store("pinecone", |config, embeddings| {
        Ok(Arc::new(pinecone::PineconeVectorStore::from_config(config, embeddings)?) as _)
    });

    registry.register_web_search("tavily", |config| {
        Ok(Arc::new(tavily::TavilySearch::from_config(config)?) as _)
    });
    registry.register_web_search("duckduckgo", |config| {
        Ok(Arc::new(duckduckgo::DuckDuckGoSearch::from_config(config)) as _)
    });

    registry.register_web_scraper("firecrawl", |config| {
        Ok(Arc::new(firecrawl::FirecrawlScraper::from_config(config)?) as _)
    });
    registry.register_web_scraper("http", |config| {
        Ok(Arc::new(http_scraper::HttpScraper::from_config(config)) as _)
    });

    registry.register_storage("supabase", |config| {
        Ok(Arc::new(supabase::SupabaseStorage::from_config(config)?) as _)
    });
}

// ---- shared HTTP helpers ----

/// Ensure the response has a success status code. Returns the response
/// unchanged on success, or [`AdapterError::Api`] with the status and body
/// text on failure.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, AdapterError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(AdapterError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Missing-API-key constructor error, phrased consistently across providers.
pub(crate) fn missing_api_key(provider: &str) -> AdapterError {
    AdapterError::InvalidInput(format!("{provider} requires an api_key"))
}

/// Turn an SSE response body into a stream of `data:` payloads.
///
/// Byte chunks do not align with event boundaries, so complete lines are
/// carved out of a carry-over buffer as they arrive. Comment lines, empty
/// keep-alives and the `[DONE]` sentinel are dropped.
pub(crate) fn sse_data_lines(
    response: reqwest::Response,
) -> BoxStream<'static, Result<String, AdapterError>> {
    let stream = response
        .bytes_stream()
        .map_err(AdapterError::from)
        .scan(String::new(), |buffer, chunk| {
            let payloads = match chunk {
                Ok(bytes) => {
                    buffer.push_str(&String::from_utf8_lossy(&bytes));
                    drain_data_lines(buffer).into_iter().map(Ok).collect()
                }
                Err(err) => vec![Err(err)],
            };
            futures::future::ready(Some(futures::stream::iter(payloads)))
        })
        .flatten();
    Box::pin(stream)
}

/// Remove every complete line from `buffer` and return the `data:` payloads
/// among them. A trailing partial line stays in the buffer for the next chunk.
fn drain_data_lines(buffer: &mut String) -> Vec<String> {
    let mut payloads = Vec::new();
    while let Some(pos) = buffer.find('\n') {
        let line: String = buffer.drain(..=pos).collect();
        let line = line.trim();
        if let Some(payload) = line.strip_prefix("data:") {
            let payload = payload.trim();
            if !payload.is_empty() && payload != "[DONE]" {
                payloads.push(payload.to_string());
            }
        }
    }
    payloads
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdapterConfig;

    #[test]
    fn builtins_cover_every_catalog_name() {
        let mut registry = AdapterRegistry::new();
        register_builtins(&mut registry);

        let keyed = AdapterConfig::new().with_api_key("test-key");
        for name in ["openai", "groq", "mistral", "openrouter", "cohere"] {
            assert!(registry.llm(name, keyed.clone()).is_ok(), "llm {name}");
        }
        for name in ["openai", "huggingface"] {
            assert!(registry.embeddings(name, keyed.clone()).is_ok(), "embeddings {name}");
        }
        assert!(registry.web_search("tavily", keyed.clone()).is_ok());
        assert!(registry.web_search("duckduckgo", AdapterConfig::new()).is_ok());
        assert!(registry.web_scraper("firecrawl", keyed.clone()).is_ok());
        assert!(registry.web_scraper("http", AdapterConfig::new()).is_ok());

        // Pinecone and Supabase also require a host.
        let hosted = keyed.clone().with_base_url("https://example.invalid");
        let embeddings = registry.embeddings("openai", keyed).unwrap();
        assert!(registry.vector_store("pinecone", hosted.clone(), embeddings).is_ok());
        assert!(registry.storage("supabase", hosted).is_ok());
    }

    #[test]
    fn builtin_construction_surfaces_missing_requirements() {
        let mut registry = AdapterRegistry::new();
        register_builtins(&mut registry);

        // No api_key: the factory itself refuses.
        let err = registry.llm("openai", AdapterConfig::new()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::RegistryError::Construction(AdapterError::InvalidInput(_))
        ));
    }

    #[test]
    fn drain_extracts_complete_data_lines() {
        let mut buffer = String::from("data: {\"a\":1}\n\ndata: {\"b\":2}\ndata: part");
        let payloads = drain_data_lines(&mut buffer);
        assert_eq!(payloads, vec!["{\"a\":1}", "{\"b\":2}"]);
        // The partial line waits for the next chunk.
        assert_eq!(buffer, "data: part");
    }

    #[test]
    fn drain_skips_done_sentinel_and_comments() {
        let mut buffer = String::from(": keep-alive\ndata: [DONE]\ndata: x\n");
        let payloads = drain_data_lines(&mut buffer);
        assert_eq!(payloads, vec!["x"]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn drain_handles_crlf_terminated_lines() {
        let mut buffer = String::from("data: {\"c\":3}\r\n");
        let payloads = drain_data_lines(&mut buffer);
        assert_eq!(payloads, vec!["{\"c\":3}"]);
    }
}
