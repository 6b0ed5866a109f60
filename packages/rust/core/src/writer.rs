//! Writer stage: research report in, [`StructuredPost`] out.
//!
//! Generation goes through an ordered chain of [`WriteStrategy`]s. The first
//! asks the provider for schema-constrained output; the second asks for
//! plain JSON text and parses it locally.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use tracing::{info, instrument, warn};

use postcraft_llm::{ChatMessage, ChatModel, ChatRequest, MessageContent, ResponseFormat};
use postcraft_shared::{PostcraftError, Result, StructuredPost};

use crate::prompts;
use crate::research::normalize_report;

const SCHEMA_NAME: &str = "linkedin_post";

/// The writer stage as seen by the pipeline.
#[async_trait]
pub trait Writer: Send + Sync {
    async fn write(&self, research_report: &str, topic: &str) -> Result<StructuredPost>;
}

/// Why a single strategy failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyFailure {
    pub message: String,
    /// Model text that could not be turned into a post.
    pub raw_output: Option<String>,
}

impl StrategyFailure {
    fn new(message: impl Into<String>, raw_output: Option<String>) -> Self {
        Self {
            message: message.into(),
            raw_output,
        }
    }
}

/// One way of getting a post out of the model.
#[async_trait]
pub trait WriteStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn attempt(
        &self,
        model: &dyn ChatModel,
        research_report: &str,
        topic: &str,
    ) -> std::result::Result<StructuredPost, StrategyFailure>;
}

/// Provider-enforced JSON schema via `response_format`.
pub struct StructuredOutputStrategy;

#[async_trait]
impl WriteStrategy for StructuredOutputStrategy {
    fn name(&self) -> &'static str {
        "structured_output"
    }

    async fn attempt(
        &self,
        model: &dyn ChatModel,
        research_report: &str,
        topic: &str,
    ) -> std::result::Result<StructuredPost, StrategyFailure> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(prompts::WRITER_SYSTEM_PROMPT),
            ChatMessage::user(prompts::writer_task(research_report, topic)),
        ])
        .with_response_format(ResponseFormat::json_schema(
            SCHEMA_NAME,
            StructuredPost::json_schema(),
        ));

        let text = reply_text(model, &request).await?;
        serde_json::from_str::<StructuredPost>(&text).map_err(|e| {
            StrategyFailure::new(format!("response did not match the post schema: {e}"), Some(text))
        })
    }
}

/// Schema described in the prompt, reply parsed from raw text.
pub struct JsonTextStrategy;

#[async_trait]
impl WriteStrategy for JsonTextStrategy {
    fn name(&self) -> &'static str {
        "json_text"
    }

    async fn attempt(
        &self,
        model: &dyn ChatModel,
        research_report: &str,
        topic: &str,
    ) -> std::result::Result<StructuredPost, StrategyFailure> {
        let task = format!(
            "{}\n\n{}",
            prompts::writer_task(research_report, topic),
            prompts::json_format_instructions(&StructuredPost::json_schema())
        );
        let request = ChatRequest::new(vec![
            ChatMessage::system(prompts::WRITER_SYSTEM_PROMPT),
            ChatMessage::user(task),
        ]);

        let text = reply_text(model, &request).await?;
        parse_post(&text)
            .map_err(|e| StrategyFailure::new(format!("SchemaParseError: {e}"), Some(text)))
    }
}

async fn reply_text(
    model: &dyn ChatModel,
    request: &ChatRequest,
) -> std::result::Result<String, StrategyFailure> {
    let reply = model
        .chat(request)
        .await
        .map_err(|e| StrategyFailure::new(e.to_string(), None))?;

    match reply.content {
        Some(MessageContent::Text(text)) => Ok(text),
        Some(content) => Ok(normalize_report(&content.into())),
        None => Err(StrategyFailure::new("model returned an empty reply", None)),
    }
}

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*\n(.*?)\n?\s*```\s*$").expect("valid regex")
});

/// Decode a post from model text, tolerating a surrounding code fence or
/// prose around the JSON object.
pub fn parse_post(text: &str) -> std::result::Result<StructuredPost, serde_json::Error> {
    let unfenced = FENCE_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map_or(text, |m| m.as_str())
        .trim();

    match serde_json::from_str(unfenced) {
        Ok(post) => Ok(post),
        Err(first) => match (unfenced.find('{'), unfenced.rfind('}')) {
            (Some(start), Some(end)) if start < end => {
                serde_json::from_str(&unfenced[start..=end]).map_err(|_| first)
            }
            _ => Err(first),
        },
    }
}

/// [`Writer`] that tries each strategy in order and keeps every failure.
pub struct ChainWriter {
    model: Arc<dyn ChatModel>,
    strategies: Vec<Box<dyn WriteStrategy>>,
}

impl ChainWriter {
    /// Structured output first, then the JSON-text fallback.
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self::with_strategies(
            model,
            vec![Box::new(StructuredOutputStrategy), Box::new(JsonTextStrategy)],
        )
    }

    pub fn with_strategies(
        model: Arc<dyn ChatModel>,
        strategies: Vec<Box<dyn WriteStrategy>>,
    ) -> Self {
        Self { model, strategies }
    }
}

#[async_trait]
impl Writer for ChainWriter {
    #[instrument(skip_all, fields(topic = %topic, model = %self.model.model_name()))]
    async fn write(&self, research_report: &str, topic: &str) -> Result<StructuredPost> {
        let mut diagnostics = Vec::with_capacity(self.strategies.len());
        let mut last_raw = None;

        for strategy in &self.strategies {
            match strategy
                .attempt(self.model.as_ref(), research_report, topic)
                .await
            {
                Ok(post) => {
                    info!(strategy = strategy.name(), "post generated");
                    return Ok(post);
                }
                Err(failure) => {
                    warn!(strategy = strategy.name(), error = %failure.message, "writer strategy failed");
                    diagnostics.push(format!("{}: {}", strategy.name(), failure.message));
                    if failure.raw_output.is_some() {
                        last_raw = failure.raw_output;
                    }
                }
            }
        }

        Err(PostcraftError::generation(
            format!("all writer strategies failed ({})", diagnostics.join("; ")),
            last_raw,
        ))
    }
}
