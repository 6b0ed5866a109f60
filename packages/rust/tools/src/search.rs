//! Tavily search adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use postcraft_shared::{PostcraftError, Result, SearchHit, SearchSettings};

use crate::{SEARCH_TOOL, USER_AGENT, WebSearch};

/// Search adapter backed by the Tavily HTTP API.
pub struct TavilySearch {
    client: Client,
    endpoint: String,
    api_key: String,
    search_depth: String,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: u32,
    search_depth: &'a str,
    include_answer: bool,
    include_raw_content: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

impl TavilySearch {
    /// Build the adapter from resolved settings.
    pub fn new(settings: &SearchSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PostcraftError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/search", settings.base_url.trim_end_matches('/')),
            api_key: settings.api_key.clone(),
            search_depth: settings.search_depth.clone(),
        })
    }
}

#[async_trait]
impl WebSearch for TavilySearch {
    #[instrument(skip(self), fields(tool = SEARCH_TOOL))]
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>> {
        info!("executing search");

        let request = SearchRequest {
            query,
            max_results,
            search_depth: &self.search_depth,
            include_answer: false,
            include_raw_content: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PostcraftError::tool(SEARCH_TOOL, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PostcraftError::tool(
                SEARCH_TOOL,
                format!("HTTP {status}: {}", truncate(&body, 200)),
            ));
        }

        let parsed: SearchResponse = response.json().await.map_err(|e| {
            PostcraftError::tool(SEARCH_TOOL, format!("failed to parse response: {e}"))
        })?;

        let mut hits = parsed.results;
        hits.truncate(max_results as usize);

        info!(results = hits.len(), "search complete");
        debug!(urls = ?hits.iter().map(|h| h.url.as_str()).collect::<Vec<_>>());

        Ok(hits)
    }
}

/// Render search hits as the observation text handed back to the agent.
pub fn format_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "No results found.".to_string();
    }

    hits.iter()
        .map(|h| {
            format!(
                "Title: {}\nURL: {}\nScore: {:.2}\nContent: {}",
                h.title, h.url, h.score, h.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n---\n")
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(base_url: String) -> SearchSettings {
        SearchSettings {
            api_key: "tvly-test".into(),
            base_url,
            max_results: 5,
            search_depth: "advanced".into(),
        }
    }

    #[tokio::test]
    async fn search_parses_results() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .and(header("authorization", "Bearer tvly-test"))
            .and(body_partial_json(serde_json::json!({
                "query": "rust async",
                "max_results": 2,
                "search_depth": "advanced"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "query": "rust async",
                "results": [
                    {"title": "Tokio", "url": "https://tokio.rs", "content": "Runtime", "score": 0.91},
                    {"title": "Async book", "url": "https://rust-lang.github.io/async-book", "content": "Guide", "score": 0.85, "raw_content": null}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let search = TavilySearch::new(&settings(server.uri())).unwrap();
        let hits = search.search("rust async", 2).await.unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Tokio");
        assert_eq!(hits[1].url, "https://rust-lang.github.io/async-book");
        assert!((hits[0].score - 0.91).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn search_http_error_is_fatal() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let search = TavilySearch::new(&settings(server.uri())).unwrap();
        let err = search.search("anything", 5).await.unwrap_err();

        match err {
            PostcraftError::Tool { tool, message } => {
                assert_eq!(tool, SEARCH_TOOL);
                assert!(message.contains("500"));
                assert!(message.contains("upstream down"));
            }
            other => panic!("expected Tool error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn search_malformed_body_is_fatal() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let search = TavilySearch::new(&settings(server.uri())).unwrap();
        let err = search.search("anything", 5).await.unwrap_err();
        assert!(err.to_string().contains("failed to parse response"));
    }

    #[test]
    fn format_hits_joins_results() {
        let hits = vec![
            SearchHit {
                title: "A".into(),
                url: "https://a.example".into(),
                content: "alpha".into(),
                score: 0.5,
            },
            SearchHit {
                title: "B".into(),
                url: "https://b.example".into(),
                content: "beta".into(),
                score: 0.25,
            },
        ];
        let text = format_hits(&hits);
        assert!(text.starts_with("Title: A\nURL: https://a.example"));
        assert!(text.contains("\n---\nTitle: B"));
        assert_eq!(format_hits(&[]), "No results found.");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("hi", 10), "hi");
    }
}
