//! Research-to-post pipeline for postcraft.
//!
//! This crate ties the search and scrape tools and the chat model together
//! into the two-stage workflow (research, then writing), validates inputs
//! and outputs, and writes the output bundle.

pub mod bundle;
pub mod pipeline;
pub mod prompts;
pub mod research;
pub mod validate;
pub mod writer;

pub use bundle::{BundlePaths, render_summary, save_bundle, topic_slug};
pub use pipeline::{Pipeline, PipelineStage, ProgressReporter, SilentProgress};
pub use research::{
    AgentResearcher, LlmResearchAgent, NextAction, ResearchAgent, ResearchContext, ResearchLoop,
    ResearchOutcome, ResearchOutput, ResearchStep, Researcher, normalize_report,
};
pub use validate::{validate_post, validate_topic};
pub use writer::{ChainWriter, JsonTextStrategy, StructuredOutputStrategy, WriteStrategy, Writer};
