//! End-to-end pipeline: topic → validation → research → writing → post checks.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, instrument, warn};

use postcraft_llm::{ChatModel, OpenRouterClient};
use postcraft_shared::{ExecutionMetadata, ExecutionResult, Result, Settings};
use postcraft_tools::{FirecrawlScraper, TavilySearch};

use crate::research::{AgentResearcher, LlmResearchAgent, NextAction, ResearchLoop, Researcher};
use crate::validate::{validate_post, validate_topic};
use crate::writer::{ChainWriter, Writer};

/// States of a single pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Idle,
    Validating,
    Researching,
    Writing,
    ValidatingOutput,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "Idle",
            Self::Validating => "Validating topic",
            Self::Researching => "Researching",
            Self::Writing => "Writing post",
            Self::ValidatingOutput => "Checking post",
            Self::Done => "Done",
            Self::Failed => "Failed",
        };
        f.write_str(label)
    }
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new stage.
    fn stage(&self, stage: PipelineStage);
    /// Called before each tool invocation of the research stage.
    fn tool_used(&self, step: usize, action: &NextAction);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn stage(&self, _stage: PipelineStage) {}
    fn tool_used(&self, _step: usize, _action: &NextAction) {}
}

/// Research-then-write orchestrator.
///
/// Holds no per-run state, so one instance can serve any number of runs.
pub struct Pipeline {
    researcher: Box<dyn Researcher>,
    writer: Box<dyn Writer>,
    model_name: String,
}

impl Pipeline {
    pub fn new(
        researcher: Box<dyn Researcher>,
        writer: Box<dyn Writer>,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            researcher,
            writer,
            model_name: model_name.into(),
        }
    }

    /// Wire the production adapters from resolved settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let model: Arc<dyn ChatModel> = Arc::new(OpenRouterClient::new(&settings.model)?);
        let search = Arc::new(TavilySearch::new(&settings.search)?);
        let scraper = Arc::new(FirecrawlScraper::new(&settings.scrape)?);

        let research_loop = ResearchLoop::new(
            search,
            scraper,
            settings.research,
            settings.search.max_results,
        );
        let researcher =
            AgentResearcher::new(Box::new(LlmResearchAgent::new(model.clone())), research_loop);
        let writer = ChainWriter::new(model.clone());

        Ok(Self::new(
            Box::new(researcher),
            Box::new(writer),
            model.model_name(),
        ))
    }

    /// Run the pipeline for one topic.
    ///
    /// Returns a complete result or the first fatal error; output warnings
    /// never fail the run.
    #[instrument(skip_all, fields(topic = %topic))]
    pub async fn execute(
        &self,
        topic: &str,
        progress: &dyn ProgressReporter,
    ) -> Result<ExecutionResult> {
        let start = Instant::now();
        progress.stage(PipelineStage::Idle);

        match self.run(topic, progress).await {
            Ok(result) => {
                progress.stage(PipelineStage::Done);
                info!(
                    research_steps = result.metadata.research_steps,
                    post_length = result.metadata.post_length,
                    valid = result.metadata.validation.valid,
                    elapsed_ms = start.elapsed().as_millis(),
                    "pipeline complete"
                );
                Ok(result)
            }
            Err(e) => {
                progress.stage(PipelineStage::Failed);
                error!(error = %e, "pipeline failed");
                Err(e)
            }
        }
    }

    async fn run(&self, topic: &str, progress: &dyn ProgressReporter) -> Result<ExecutionResult> {
        // --- Validating ---
        progress.stage(PipelineStage::Validating);
        validate_topic(topic)?;

        // --- Researching ---
        progress.stage(PipelineStage::Researching);
        info!("stage 1: research");
        let research = self.researcher.research(topic, progress).await?;
        info!(
            steps = research.steps,
            report_chars = research.report.chars().count(),
            "research finished"
        );

        // --- Writing ---
        progress.stage(PipelineStage::Writing);
        info!("stage 2: writing");
        let post = self.writer.write(&research.report, topic).await?;
        let linkedin_post = post.format();

        // --- ValidatingOutput ---
        progress.stage(PipelineStage::ValidatingOutput);
        let validation = validate_post(&linkedin_post);
        if !validation.valid {
            warn!(warnings = ?validation.warnings, "post has validation warnings");
        }

        Ok(ExecutionResult {
            topic: topic.to_string(),
            research_report: research.report,
            metadata: ExecutionMetadata {
                research_steps: research.steps,
                post_length: linkedin_post.chars().count(),
                validation,
                model_used: self.model_name.clone(),
            },
            linkedin_post,
        })
    }
}
