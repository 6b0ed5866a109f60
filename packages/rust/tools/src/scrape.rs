//! Firecrawl scrape adapter.
//!
//! Every failure path (bad URL, transport, HTTP status, body) is turned into
//! a note via [`scrape_failure_note`] instead of an error.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use url::Url;

use postcraft_shared::{PostcraftError, Result, ScrapeSettings};

use crate::{PageScraper, SCRAPE_TOOL, USER_AGENT};

/// Scrape adapter backed by the Firecrawl HTTP API.
pub struct FirecrawlScraper {
    client: Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: [&'a str; 1],
    only_main_content: bool,
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<ScrapeData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScrapeData {
    #[serde(default)]
    markdown: Option<String>,
}

impl FirecrawlScraper {
    /// Build the adapter; the settings timeout bounds every request.
    pub fn new(settings: &ScrapeSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout)
            .build()
            .map_err(|e| PostcraftError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/v1/scrape", settings.base_url.trim_end_matches('/')),
            api_key: settings.api_key.clone(),
        })
    }

    async fn try_scrape(&self, url: &str) -> std::result::Result<String, String> {
        let parsed = Url::parse(url).map_err(|e| format!("invalid URL: {e}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(format!("unsupported URL scheme '{}'", parsed.scheme()));
        }

        let request = ScrapeRequest {
            url: parsed.as_str(),
            formats: ["markdown"],
            only_main_content: true,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {status}"));
        }

        let body: ScrapeResponse = response
            .json()
            .await
            .map_err(|e| format!("failed to parse response: {e}"))?;

        if !body.success {
            return Err(body
                .error
                .unwrap_or_else(|| "service reported failure".to_string()));
        }

        Ok(body.data.and_then(|d| d.markdown).unwrap_or_default())
    }
}

#[async_trait]
impl PageScraper for FirecrawlScraper {
    #[instrument(skip(self), fields(tool = SCRAPE_TOOL))]
    async fn scrape(&self, url: &str) -> String {
        match self.try_scrape(url).await {
            Ok(content) => {
                info!(chars = content.chars().count(), "scrape complete");
                content
            }
            Err(message) => {
                warn!(error = %message, "scrape failed");
                scrape_failure_note(url, &message)
            }
        }
    }
}

/// The text observation standing in for content when a scrape fails.
pub fn scrape_failure_note(url: &str, message: &str) -> String {
    format!("Error scraping {url}: {message}")
}
