//! Web search tool over the DuckDuckGo HTML endpoint (no API key).

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use firewatch_ai::ToolDefinition;

use crate::registry::ToolHandler;

const SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
const MAX_RESULTS: usize = 5;

#[derive(Debug, thiserror::Error)]
enum SearchError {
    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Searches the web for news, evacuation orders, and anything else outside
/// the fire dataset.
pub struct WebSearchTool {
    http: reqwest::Client,
    endpoint: String,
    result_re: Regex,
    snippet_re: Regex,
    tag_re: Regex,
}

impl WebSearchTool {
    pub fn new() -> Self {
        Self::with_endpoint(SEARCH_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("failed to build HTTP client"),
            endpoint: endpoint.into(),
            result_re: Regex::new(r#"(?s)<a[^>]*class="result__a"[^>]*>(.*?)</a>"#)
                .expect("invalid result regex"),
            snippet_re: Regex::new(r#"(?s)class="result__snippet"[^>]*>(.*?)</a>"#)
                .expect("invalid snippet regex"),
            tag_re: Regex::new(r"<[^>]+>").expect("invalid tag regex"),
        }
    }

    async fn search(&self, query: &str) -> Result<String, SearchError> {
        debug!(query, "web search request");

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("q", query)])
            .header("user-agent", "firewatch/0.1")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status));
        }

        let html = response.text().await?;
        let results = self.extract_results(&html);
        if results.is_empty() {
            return Ok("No results found.".to_string());
        }
        Ok(results.join("\n"))
    }

    /// Pull titles and snippets out of the results page, stripped to plain
    /// text.
    fn extract_results(&self, html: &str) -> Vec<String> {
        let titles: Vec<String> = self
            .result_re
            .captures_iter(html)
            .take(MAX_RESULTS)
            .map(|c| self.clean_fragment(&c[1]))
            .collect();
        let snippets: Vec<String> = self
            .snippet_re
            .captures_iter(html)
            .take(MAX_RESULTS)
            .map(|c| self.clean_fragment(&c[1]))
            .collect();

        titles
            .into_iter()
            .enumerate()
            .map(|(i, title)| match snippets.get(i) {
                Some(snippet) if !snippet.is_empty() => format!("{title}: {snippet}"),
                _ => title,
            })
            .collect()
    }

    fn clean_fragment(&self, fragment: &str) -> String {
        let text = self.tag_re.replace_all(fragment, "");
        decode_entities(text.trim())
    }
}

impl Default for WebSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
}

#[async_trait]
impl ToolHandler for WebSearchTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "search_web".to_string(),
            description: "Searches the web for news, evacuation orders, or general info not in the database. \
                          Use this if the user asks about news reports or things outside the dataset."
                .to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn call(&self, arguments: &serde_json::Value) -> String {
        let Some(query) = arguments["query"].as_str().filter(|q| !q.is_empty()) else {
            return "Error searching the web: missing required argument 'query'".to_string();
        };

        match self.search(query).await {
            Ok(results) => results,
            Err(e) => format!("Error searching the web: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r#"
<div class="result">
  <a rel="nofollow" class="result__a" href="https://example.com/a">Wildfire <b>news</b> today</a>
  <a class="result__snippet" href="https://example.com/a">Evacuation orders &amp; road closures near the park.</a>
</div>
<div class="result">
  <a rel="nofollow" class="result__a" href="https://example.com/b">Air quality update</a>
  <a class="result__snippet" href="https://example.com/b">Smoke drifting east.</a>
</div>
"#;

    #[test]
    fn extracts_titles_and_snippets_as_plain_text() {
        let tool = WebSearchTool::new();
        let results = tool.extract_results(RESULTS_PAGE);
        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0],
            "Wildfire news today: Evacuation orders & road closures near the park."
        );
        assert_eq!(results[1], "Air quality update: Smoke drifting east.");
    }

    #[test]
    fn no_results_yields_empty_vec() {
        let tool = WebSearchTool::new();
        assert!(tool.extract_results("<html><body>nothing here</body></html>").is_empty());
    }

    #[tokio::test]
    async fn missing_query_argument_becomes_result_text() {
        let tool = WebSearchTool::new();
        let output = tool.call(&serde_json::json!({})).await;
        assert!(output.contains("missing required argument"), "got: {output}");
    }
}
