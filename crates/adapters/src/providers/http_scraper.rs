//! Plain HTTP scraper, the keyless fallback.
//!
//! Fetches pages directly and reduces the HTML to readable text. No
//! JavaScript rendering; pages that need it come back mostly empty, which is
//! acceptable for a fallback.

use async_trait::async_trait;

use crate::config::AdapterConfig;
use crate::error::AdapterError;
use crate::providers::ensure_success;
use crate::types::Document;
use crate::web_scraper::WebScraperAdapter;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; seekr/0.1)";

pub struct HttpScraper {
    client: reqwest::Client,
}

impl HttpScraper {
    pub fn from_config(_config: AdapterConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn fetch_one(&self, url: &str) -> Result<Document, AdapterError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let html = response.text().await?;
        Ok(Document::new(html_to_text(&html)).with_metadata("source", url))
    }
}

#[async_trait]
impl WebScraperAdapter for HttpScraper {
    async fn load(&self, urls: &[String]) -> Result<Vec<Document>, AdapterError> {
        let mut documents = Vec::with_capacity(urls.len());
        for url in urls {
            match self.fetch_one(url).await {
                Ok(document) => documents.push(document),
                Err(err) => {
                    tracing::warn!(url = %url, error = %err, "fetch failed, skipping url");
                }
            }
        }
        Ok(documents)
    }
}

/// Reduce an HTML page to plain text.
///
/// Script and style elements are removed with their contents, remaining tags
/// are stripped, common entities are decoded, and whitespace is collapsed.
fn html_to_text(html: &str) -> String {
    let without_blocks = remove_element(&remove_element(html, "script"), "style");

    let mut text = String::with_capacity(without_blocks.len());
    let mut in_tag = false;
    for ch in without_blocks.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => {
                if in_tag {
                    in_tag = false;
                    // Tags are word boundaries.
                    text.push(' ');
                }
            }
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }

    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove every `<tag ...>...</tag>` element, contents included.
/// Case-insensitive; an unclosed element is dropped to the end of input.
fn remove_element(html: &str, tag: &str) -> String {
    let lower = html.to_lowercase();
    let open = format!("<{tag}");
    let close = format!("</{tag}>");

    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;
    while let Some(start) = lower[cursor..].find(&open) {
        let start = cursor + start;
        out.push_str(&html[cursor..start]);
        match lower[start..].find(&close) {
            Some(end) => cursor = start + end + close.len(),
            None => return out,
        }
    }
    out.push_str(&html[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_collapses_whitespace() {
        let html = "<html><body><h1>Title</h1>\n  <p>Some   <b>bold</b> text.</p></body></html>";
        assert_eq!(html_to_text(html), "Title Some bold text.");
    }

    #[test]
    fn drops_script_and_style_contents() {
        let html = r#"<head><style>p { color: red; }</style></head>
            <body><script type="text/javascript">var x = "<p>sneaky</p>";</script>visible</body>"#;
        assert_eq!(html_to_text(html), "visible");
    }

    #[test]
    fn decodes_common_entities() {
        assert_eq!(html_to_text("a &amp; b &lt;c&gt;"), "a & b <c>");
    }

    #[test]
    fn unclosed_script_is_dropped_to_end() {
        let html = "before<script>var x = 1;";
        assert_eq!(html_to_text(html), "before");
    }

    #[test]
    fn remove_element_is_case_insensitive() {
        assert_eq!(remove_element("a<SCRIPT>x</SCRIPT>b", "script"), "ab");
    }
}
