//! Application configuration for postcraft.
//!
//! User config lives at `~/.postcraft/postcraft.toml`.
//! CLI flags override config file values, which override defaults.
//! API keys are never stored in the file; each provider section names the
//! environment variable that holds its key.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PostcraftError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "postcraft.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".postcraft";

// ---------------------------------------------------------------------------
// Config structs (matching postcraft.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Language model settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Search service settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Scrape service settings.
    #[serde(default)]
    pub scrape: ScrapeConfig,

    /// Research loop bounds.
    #[serde(default)]
    pub research: ResearchConfig,

    /// Where and what to save.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[model]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Name of the env var holding the API key.
    #[serde(default = "default_model_key_env")]
    pub api_key_env: String,

    /// OpenAI-compatible API root.
    #[serde(default = "default_model_base_url")]
    pub base_url: String,

    /// Model identifier.
    #[serde(default = "default_model_name")]
    pub name: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_model_key_env(),
            base_url: default_model_base_url(),
            name: default_model_name(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_model_key_env() -> String {
    "OPENROUTER_API_KEY".into()
}
fn default_model_base_url() -> String {
    "https://openrouter.ai/api/v1".into()
}
fn default_model_name() -> String {
    "google/gemini-2.5-flash".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    4000
}

/// `[search]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_search_base_url")]
    pub base_url: String,

    /// Results requested per query.
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// `basic` or `advanced`.
    #[serde(default = "default_search_depth")]
    pub search_depth: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_search_key_env(),
            base_url: default_search_base_url(),
            max_results: default_max_results(),
            search_depth: default_search_depth(),
        }
    }
}

fn default_search_key_env() -> String {
    "TAVILY_API_KEY".into()
}
fn default_search_base_url() -> String {
    "https://api.tavily.com".into()
}
fn default_max_results() -> u32 {
    5
}
fn default_search_depth() -> String {
    "advanced".into()
}

/// `[scrape]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    #[serde(default = "default_scrape_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_scrape_base_url")]
    pub base_url: String,

    /// Per-request timeout.
    #[serde(default = "default_scrape_timeout")]
    pub timeout_secs: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_scrape_key_env(),
            base_url: default_scrape_base_url(),
            timeout_secs: default_scrape_timeout(),
        }
    }
}

fn default_scrape_key_env() -> String {
    "FIRECRAWL_API_KEY".into()
}
fn default_scrape_base_url() -> String {
    "https://api.firecrawl.dev".into()
}
fn default_scrape_timeout() -> u64 {
    30
}

/// `[research]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Maximum agent decisions before the loop stops.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Wall-clock cap for the whole research stage.
    #[serde(default = "default_max_execution_secs")]
    pub max_execution_secs: u64,

    /// Scrapes allowed per run; later scrape requests are answered with a note.
    #[serde(default = "default_max_scrape_pages")]
    pub max_scrape_pages: usize,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            max_execution_secs: default_max_execution_secs(),
            max_scrape_pages: default_max_scrape_pages(),
        }
    }
}

fn default_max_iterations() -> usize {
    10
}
fn default_max_execution_secs() -> u64 {
    300
}
fn default_max_scrape_pages() -> usize {
    3
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the run bundle is written to.
    #[serde(default = "default_output_dir")]
    pub dir: String,

    /// Whether to save the research report alongside the post.
    #[serde(default = "default_true")]
    pub save_research: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            save_research: true,
        }
    }
}

fn default_output_dir() -> String {
    "./outputs".into()
}
fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Resolved settings (immutable, shared read-only by a run)
// ---------------------------------------------------------------------------

/// Fully resolved runtime settings: config values plus API keys read from
/// the environment. Built once at startup and passed to the pipeline.
#[derive(Debug, Clone)]
pub struct Settings {
    pub model: ModelSettings,
    pub search: SearchSettings,
    pub scrape: ScrapeSettings,
    pub research: ResearchLimits,
}

#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub api_key: String,
    pub base_url: String,
    pub name: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub api_key: String,
    pub base_url: String,
    pub max_results: u32,
    pub search_depth: String,
}

#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// Bounds applied to the research loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResearchLimits {
    pub max_iterations: usize,
    pub max_execution: Duration,
    pub max_scrape_pages: usize,
}

impl Default for ResearchLimits {
    fn default() -> Self {
        Self::from(&ResearchConfig::default())
    }
}

impl From<&ResearchConfig> for ResearchLimits {
    fn from(config: &ResearchConfig) -> Self {
        Self {
            max_iterations: config.max_iterations,
            max_execution: Duration::from_secs(config.max_execution_secs),
            max_scrape_pages: config.max_scrape_pages,
        }
    }
}

impl Settings {
    /// Resolve settings from config, reading every API key from its env var.
    ///
    /// Fails on the first missing key.
    pub fn resolve(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            model: ModelSettings {
                api_key: read_api_key(&config.model.api_key_env, "language model")?,
                base_url: config.model.base_url.clone(),
                name: config.model.name.clone(),
                temperature: config.model.temperature,
                max_tokens: config.model.max_tokens,
            },
            search: SearchSettings {
                api_key: read_api_key(&config.search.api_key_env, "search")?,
                base_url: config.search.base_url.clone(),
                max_results: config.search.max_results,
                search_depth: config.search.search_depth.clone(),
            },
            scrape: ScrapeSettings {
                api_key: read_api_key(&config.scrape.api_key_env, "scrape")?,
                base_url: config.scrape.base_url.clone(),
                timeout: Duration::from_secs(config.scrape.timeout_secs),
            },
            research: ResearchLimits::from(&config.research),
        })
    }
}

fn read_api_key(var_name: &str, service: &str) -> Result<String> {
    match std::env::var(var_name) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(PostcraftError::config(format!(
            "{service} API key not found. Set the {var_name} environment variable."
        ))),
    }
}

/// Presence of a single API key, as reported by `validate-config`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCheck {
    /// Human-readable service label.
    pub service: &'static str,
    /// The env var consulted.
    pub env_var: String,
    pub present: bool,
}

/// Report which API keys are set without failing on the missing ones.
pub fn check_keys(config: &AppConfig) -> Vec<KeyCheck> {
    [
        ("Language model API key", &config.model.api_key_env),
        ("Search API key", &config.search.api_key_env),
        ("Scrape API key", &config.scrape.api_key_env),
    ]
    .into_iter()
    .map(|(service, env_var)| KeyCheck {
        service,
        env_var: env_var.clone(),
        present: std::env::var(env_var).is_ok_and(|v| !v.trim().is_empty()),
    })
    .collect()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.postcraft/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PostcraftError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.postcraft/postcraft.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PostcraftError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        PostcraftError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let path = config_file_path()?;
    init_config_at(&path)?;
    Ok(path)
}

/// Write a default config file at `path`, creating parent directories.
pub fn init_config_at(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| PostcraftError::io(dir, e))?;
    }

    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PostcraftError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| PostcraftError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(())
}
