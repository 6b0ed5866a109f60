//! Shared types, error model, and configuration for postcraft.
//!
//! This crate is the foundation depended on by all other postcraft crates.
//! It provides:
//! - [`PostcraftError`]: the unified error type
//! - Domain types ([`StructuredPost`], [`ValidationReport`], [`ExecutionResult`], [`SearchHit`])
//! - Configuration ([`AppConfig`], [`Settings`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, KeyCheck, ModelConfig, ModelSettings, OutputConfig, ResearchConfig,
    ResearchLimits, ScrapeConfig, ScrapeSettings, SearchConfig, SearchSettings, Settings,
    check_keys, config_dir, config_file_path, init_config, init_config_at, load_config,
    load_config_from,
};
pub use error::{PostError, PostcraftError, Result, TopicError};
pub use types::{
    ExecutionMetadata, ExecutionResult, MAX_LIST_ITEMS, MIN_LIST_ITEMS, PostDraft, PostStats,
    SearchHit, StructuredPost, ValidationReport,
};
