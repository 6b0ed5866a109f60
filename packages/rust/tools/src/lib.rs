//! External research tools: web search and page scraping.
//!
//! The two adapters fail differently:
//! - [`WebSearch`] propagates errors; a failed search aborts the run.
//! - [`PageScraper`] never fails; errors come back as a text note naming
//!   the URL so the research loop can read past them.

mod scrape;
mod search;

use async_trait::async_trait;

use postcraft_shared::{Result, SearchHit};

pub use scrape::{FirecrawlScraper, scrape_failure_note};
pub use search::{TavilySearch, format_hits};

/// Tool name the research agent uses to request a search.
pub const SEARCH_TOOL: &str = "web_search";

/// Tool name the research agent uses to request a scrape.
pub const SCRAPE_TOOL: &str = "scrape_webpage";

/// User-Agent string for tool requests.
const USER_AGENT: &str = concat!("postcraft/", env!("CARGO_PKG_VERSION"));

/// A search service returning ranked results for a query.
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Run `query` and return at most `max_results` hits, best first.
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>>;
}

/// A content-extraction service turning a URL into readable text.
#[async_trait]
pub trait PageScraper: Send + Sync {
    /// Fetch the main content of `url`. Failures are returned as text.
    async fn scrape(&self, url: &str) -> String;
}
