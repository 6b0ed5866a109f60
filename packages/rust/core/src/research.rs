//! Research stage: a tool-using agent driven by a locally owned loop.
//!
//! The agent only decides what to do next ([`ResearchAgent`]); the
//! [`ResearchLoop`] executes the tools and enforces the iteration, wall-clock
//! and scrape caps.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, instrument, warn};

use postcraft_llm::{ChatMessage, ChatModel, ChatRequest, MessageContent, ToolCall, ToolDefinition};
use postcraft_shared::{PostcraftError, ResearchLimits, Result};
use postcraft_tools::{PageScraper, SCRAPE_TOOL, SEARCH_TOOL, WebSearch, format_hits};

use crate::pipeline::ProgressReporter;
use crate::prompts;

// ---------------------------------------------------------------------------
// Agent interface
// ---------------------------------------------------------------------------

/// Final answer of the research agent, in whichever shape the model produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ResearchOutput {
    Text(String),
    /// Step records, each of which may carry a `text` field.
    Steps(Vec<Value>),
}

impl From<MessageContent> for ResearchOutput {
    fn from(content: MessageContent) -> Self {
        match content {
            MessageContent::Text(text) => Self::Text(text),
            MessageContent::Parts(parts) => Self::Steps(parts),
        }
    }
}

/// What the agent wants to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum NextAction {
    Search { query: String },
    Scrape { url: String },
    Finish(ResearchOutput),
}

impl fmt::Display for NextAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search { query } => write!(f, "{SEARCH_TOOL}: {query}"),
            Self::Scrape { url } => write!(f, "{SCRAPE_TOOL}: {url}"),
            Self::Finish(_) => f.write_str("finish"),
        }
    }
}

/// A tool invocation and the observation it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchStep {
    pub tool: &'static str,
    pub input: String,
    pub observation: String,
}

/// Everything the agent may look at when deciding its next action.
#[derive(Debug, Clone)]
pub struct ResearchContext {
    pub topic: String,
    /// The research task prompt built from the topic.
    pub task: String,
    pub steps: Vec<ResearchStep>,
}

impl ResearchContext {
    pub fn new(topic: &str) -> Self {
        Self {
            topic: topic.to_string(),
            task: prompts::research_task(topic),
            steps: Vec::new(),
        }
    }
}

/// Decides the next research action from the context so far.
#[async_trait]
pub trait ResearchAgent: Send + Sync {
    async fn decide_next_action(&self, ctx: &ResearchContext) -> Result<NextAction>;
}

/// Report plus the number of tool invocations spent producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchOutcome {
    pub report: String,
    pub steps: usize,
}

/// The research stage as seen by the pipeline.
#[async_trait]
pub trait Researcher: Send + Sync {
    async fn research(
        &self,
        topic: &str,
        progress: &dyn ProgressReporter,
    ) -> Result<ResearchOutcome>;
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Flatten agent output into a single report string.
///
/// Step records contribute their `text` fields, joined by a blank line in
/// order. When no step carries text, the whole structure is rendered as JSON.
pub fn normalize_report(output: &ResearchOutput) -> String {
    match output {
        ResearchOutput::Text(text) => text.clone(),
        ResearchOutput::Steps(steps) => {
            let texts: Vec<String> = steps
                .iter()
                .filter_map(|step| step.get("text"))
                .map(|text| match text {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();

            if texts.is_empty() {
                Value::Array(steps.clone()).to_string()
            } else {
                texts.join("\n\n")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Loop
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Budget {
    Iterations(usize),
    Time(std::time::Duration),
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iterations(n) => write!(f, "iteration limit of {n}"),
            Self::Time(d) => write!(f, "time limit of {}s", d.as_secs()),
        }
    }
}

/// Observation returned instead of scraping once the page cap is hit.
pub fn scrape_limit_note(max_pages: usize) -> String {
    format!("Scrape limit reached ({max_pages} pages); use the material gathered so far.")
}

/// Executes agent decisions against the search and scrape adapters.
pub struct ResearchLoop {
    search: Arc<dyn WebSearch>,
    scraper: Arc<dyn PageScraper>,
    limits: ResearchLimits,
    max_results: u32,
}

impl ResearchLoop {
    pub fn new(
        search: Arc<dyn WebSearch>,
        scraper: Arc<dyn PageScraper>,
        limits: ResearchLimits,
        max_results: u32,
    ) -> Self {
        Self {
            search,
            scraper,
            limits,
            max_results,
        }
    }

    /// Drive `agent` until it finishes or a cap is reached.
    ///
    /// Search failures abort the run. Scrape failures arrive as text and are
    /// handed to the agent like any other observation.
    #[instrument(skip_all, fields(topic = %topic))]
    pub async fn run(
        &self,
        agent: &dyn ResearchAgent,
        topic: &str,
        progress: &dyn ProgressReporter,
    ) -> Result<ResearchOutcome> {
        let deadline = Instant::now() + self.limits.max_execution;
        let mut ctx = ResearchContext::new(topic);
        let mut scraped_pages = 0;

        for iteration in 1..=self.limits.max_iterations {
            debug!(iteration, "requesting next action");

            let action = match timeout_at(deadline, agent.decide_next_action(&ctx)).await {
                Ok(action) => action?,
                Err(_) => return partial_outcome(ctx, Budget::Time(self.limits.max_execution)),
            };

            if !matches!(action, NextAction::Finish(_)) {
                progress.tool_used(ctx.steps.len() + 1, &action);
            }

            let step = match action {
                NextAction::Finish(output) => {
                    let report = normalize_report(&output);
                    info!(
                        steps = ctx.steps.len(),
                        report_chars = report.chars().count(),
                        "research complete"
                    );
                    return Ok(ResearchOutcome {
                        report,
                        steps: ctx.steps.len(),
                    });
                }
                NextAction::Search { query } => {
                    let hits = match timeout_at(deadline, self.search.search(&query, self.max_results))
                        .await
                    {
                        Ok(hits) => hits?,
                        Err(_) => {
                            return partial_outcome(ctx, Budget::Time(self.limits.max_execution));
                        }
                    };
                    ResearchStep {
                        tool: SEARCH_TOOL,
                        observation: format_hits(&hits),
                        input: query,
                    }
                }
                NextAction::Scrape { url } => {
                    let observation = if scraped_pages >= self.limits.max_scrape_pages {
                        debug!(%url, "scrape cap reached, skipping");
                        scrape_limit_note(self.limits.max_scrape_pages)
                    } else {
                        scraped_pages += 1;
                        match timeout_at(deadline, self.scraper.scrape(&url)).await {
                            Ok(text) => text,
                            Err(_) => {
                                return partial_outcome(
                                    ctx,
                                    Budget::Time(self.limits.max_execution),
                                );
                            }
                        }
                    };
                    ResearchStep {
                        tool: SCRAPE_TOOL,
                        input: url,
                        observation,
                    }
                }
            };

            ctx.steps.push(step);
        }

        partial_outcome(ctx, Budget::Iterations(self.limits.max_iterations))
    }
}

/// Build a report from the raw observations after a cap stopped the loop.
fn partial_outcome(ctx: ResearchContext, budget: Budget) -> Result<ResearchOutcome> {
    if ctx.steps.is_empty() {
        return Err(PostcraftError::Research(format!(
            "{budget} reached before any research was gathered"
        )));
    }

    warn!(%budget, steps = ctx.steps.len(), "research stopped early, using partial findings");

    let mut report = format!(
        "Note: research stopped at the {budget}; the material below is what was gathered so far.\n"
    );
    for step in &ctx.steps {
        report.push_str(&format!(
            "\n[{} {}]\n{}\n",
            step.tool, step.input, step.observation
        ));
    }

    Ok(ResearchOutcome {
        report,
        steps: ctx.steps.len(),
    })
}

/// [`Researcher`] made of an agent and the loop that runs it.
pub struct AgentResearcher {
    agent: Box<dyn ResearchAgent>,
    research_loop: ResearchLoop,
}

impl AgentResearcher {
    pub fn new(agent: Box<dyn ResearchAgent>, research_loop: ResearchLoop) -> Self {
        Self {
            agent,
            research_loop,
        }
    }
}

#[async_trait]
impl Researcher for AgentResearcher {
    async fn research(
        &self,
        topic: &str,
        progress: &dyn ProgressReporter,
    ) -> Result<ResearchOutcome> {
        self.research_loop
            .run(self.agent.as_ref(), topic, progress)
            .await
    }
}

// ---------------------------------------------------------------------------
// LLM-backed agent
// ---------------------------------------------------------------------------

/// Agent that asks a chat model to pick tools via native tool calling.
///
/// The conversation is rebuilt from the context on every turn, so the agent
/// itself holds no state between decisions.
pub struct LlmResearchAgent {
    model: Arc<dyn ChatModel>,
    tools: Vec<ToolDefinition>,
}

impl LlmResearchAgent {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            tools: tool_definitions(),
        }
    }

    fn messages(ctx: &ResearchContext) -> Vec<ChatMessage> {
        let mut messages = vec![
            ChatMessage::system(prompts::RESEARCHER_SYSTEM_PROMPT),
            ChatMessage::user(ctx.task.clone()),
        ];

        for (i, step) in ctx.steps.iter().enumerate() {
            let id = format!("call_{i}");
            let arguments = if step.tool == SEARCH_TOOL {
                serde_json::json!({ "query": step.input })
            } else {
                serde_json::json!({ "url": step.input })
            };
            messages.push(ChatMessage::assistant_tool_calls(vec![ToolCall::function(
                id.clone(),
                step.tool,
                arguments,
            )]));
            messages.push(ChatMessage::tool_result(id, step.observation.clone()));
        }

        messages
    }
}

#[async_trait]
impl ResearchAgent for LlmResearchAgent {
    async fn decide_next_action(&self, ctx: &ResearchContext) -> Result<NextAction> {
        let request = ChatRequest::new(Self::messages(ctx)).with_tools(self.tools.clone());
        let reply = self.model.chat(&request).await?;

        // one action per turn; extra parallel calls are dropped
        if let Some(call) = reply.tool_calls.first() {
            if reply.tool_calls.len() > 1 {
                debug!(dropped = reply.tool_calls.len() - 1, "ignoring extra tool calls");
            }
            return parse_tool_call(call);
        }

        match reply.content {
            Some(content) => Ok(NextAction::Finish(content.into())),
            None => Err(PostcraftError::Research(
                "model returned neither a tool call nor an answer".to_string(),
            )),
        }
    }
}

fn parse_tool_call(call: &ToolCall) -> Result<NextAction> {
    let args: Value = serde_json::from_str(&call.function.arguments).map_err(|e| {
        PostcraftError::parse(format!(
            "invalid arguments for {}: {e}",
            call.function.name
        ))
    })?;

    let string_arg = |key: &str| {
        args.get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                PostcraftError::parse(format!(
                    "{} call is missing the '{key}' argument",
                    call.function.name
                ))
            })
    };

    match call.function.name.as_str() {
        SEARCH_TOOL => Ok(NextAction::Search {
            query: string_arg("query")?,
        }),
        SCRAPE_TOOL => Ok(NextAction::Scrape {
            url: string_arg("url")?,
        }),
        other => Err(PostcraftError::Research(format!(
            "model requested unknown tool '{other}'"
        ))),
    }
}

fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::function(
            SEARCH_TOOL,
            "Search the web for current information. Returns titles, URLs, \
             relevance scores and content snippets.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Search query" }
                },
                "required": ["query"]
            }),
        ),
        ToolDefinition::function(
            SCRAPE_TOOL,
            "Fetch the main content of a web page as markdown.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "url": { "type": "string", "description": "Absolute http(s) URL" }
                },
                "required": ["url"]
            }),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use postcraft_shared::SearchHit;

    use super::*;
    use crate::pipeline::SilentProgress;

    // --- fakes -------------------------------------------------------------

    struct FnAgent<F>(F);

    #[async_trait]
    impl<F> ResearchAgent for FnAgent<F>
    where
        F: Fn(&ResearchContext) -> Result<NextAction> + Send + Sync,
    {
        async fn decide_next_action(&self, ctx: &ResearchContext) -> Result<NextAction> {
            (self.0)(ctx)
        }
    }

    /// Answers the first decision immediately and stalls on later ones.
    struct StallingAgent {
        stall_from_step: usize,
    }

    #[async_trait]
    impl ResearchAgent for StallingAgent {
        async fn decide_next_action(&self, ctx: &ResearchContext) -> Result<NextAction> {
            if ctx.steps.len() >= self.stall_from_step {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            Ok(NextAction::Search {
                query: "edge ai".into(),
            })
        }
    }

    #[derive(Default)]
    struct FakeSearch {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl WebSearch for FakeSearch {
        async fn search(&self, query: &str, _max_results: u32) -> Result<Vec<SearchHit>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(PostcraftError::tool(SEARCH_TOOL, "HTTP 500"));
            }
            Ok(vec![SearchHit {
                title: format!("About {query}"),
                url: "https://example.com/a".into(),
                content: "snippet".into(),
                score: 0.9,
            }])
        }
    }

    #[derive(Default)]
    struct FakeScraper {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PageScraper for FakeScraper {
        async fn scrape(&self, url: &str) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            format!("content of {url}")
        }
    }

    fn limits(max_iterations: usize, max_execution: Duration, max_scrape_pages: usize) -> ResearchLimits {
        ResearchLimits {
            max_iterations,
            max_execution,
            max_scrape_pages,
        }
    }

    fn make_loop(
        search: Arc<FakeSearch>,
        scraper: Arc<FakeScraper>,
        limits: ResearchLimits,
    ) -> ResearchLoop {
        ResearchLoop::new(search, scraper, limits, 5)
    }

    // --- normalization -----------------------------------------------------

    #[test]
    fn normalize_plain_text() {
        let out = ResearchOutput::Text("report".into());
        assert_eq!(normalize_report(&out), "report");
    }

    #[test]
    fn normalize_joins_text_steps_in_order() {
        let out = ResearchOutput::Steps(vec![
            serde_json::json!({ "type": "text", "text": "first" }),
            serde_json::json!({ "type": "reasoning", "summary": "hidden" }),
            serde_json::json!({ "type": "text", "text": "second" }),
        ]);
        assert_eq!(normalize_report(&out), "first\n\nsecond");
    }

    #[test]
    fn normalize_without_text_renders_structure() {
        let out = ResearchOutput::Steps(vec![serde_json::json!({ "type": "image" })]);
        assert_eq!(normalize_report(&out), r#"[{"type":"image"}]"#);
    }

    // --- loop --------------------------------------------------------------

    #[tokio::test]
    async fn loop_runs_tools_until_finish() {
        let search = Arc::new(FakeSearch::default());
        let scraper = Arc::new(FakeScraper::default());
        let research = make_loop(
            search.clone(),
            scraper.clone(),
            limits(10, Duration::from_secs(30), 3),
        );

        let agent = FnAgent(|ctx: &ResearchContext| {
            Ok(match ctx.steps.len() {
                0 => NextAction::Search {
                    query: ctx.topic.clone(),
                },
                1 => NextAction::Scrape {
                    url: "https://example.com/a".into(),
                },
                _ => NextAction::Finish(ResearchOutput::Text(format!(
                    "{} steps seen",
                    ctx.steps.len()
                ))),
            })
        });

        let outcome = research
            .run(&agent, "Edge AI", &SilentProgress)
            .await
            .unwrap();

        assert_eq!(outcome.report, "2 steps seen");
        assert_eq!(outcome.steps, 2);
        assert_eq!(search.calls.load(Ordering::SeqCst), 1);
        assert_eq!(scraper.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn context_carries_task_and_observations() {
        let research = make_loop(
            Arc::new(FakeSearch::default()),
            Arc::new(FakeScraper::default()),
            limits(10, Duration::from_secs(30), 3),
        );

        let agent = FnAgent(|ctx: &ResearchContext| {
            assert!(ctx.task.contains("TOPIC: Edge AI"));
            if let Some(step) = ctx.steps.first() {
                assert_eq!(step.tool, SCRAPE_TOOL);
                assert_eq!(step.observation, "content of https://example.com/x");
                return Ok(NextAction::Finish(ResearchOutput::Text("done".into())));
            }
            Ok(NextAction::Scrape {
                url: "https://example.com/x".into(),
            })
        });

        let outcome = research.run(&agent, "Edge AI", &SilentProgress).await.unwrap();
        assert_eq!(outcome.report, "done");
    }

    #[tokio::test]
    async fn iteration_cap_returns_partial_report() {
        let search = Arc::new(FakeSearch::default());
        let research = make_loop(
            search.clone(),
            Arc::new(FakeScraper::default()),
            limits(3, Duration::from_secs(30), 3),
        );

        let agent = FnAgent(|_: &ResearchContext| {
            Ok(NextAction::Search {
                query: "again".into(),
            })
        });

        let outcome = research.run(&agent, "Edge AI", &SilentProgress).await.unwrap();

        assert_eq!(outcome.steps, 3);
        assert_eq!(search.calls.load(Ordering::SeqCst), 3);
        assert!(outcome.report.starts_with("Note: research stopped at the iteration limit of 3"));
        assert!(outcome.report.contains("Title: About again"));
    }

    #[tokio::test]
    async fn time_cap_returns_partial_report() {
        let research = make_loop(
            Arc::new(FakeSearch::default()),
            Arc::new(FakeScraper::default()),
            limits(10, Duration::from_millis(200), 3),
        );

        let agent = StallingAgent { stall_from_step: 1 };
        let outcome = research.run(&agent, "Edge AI", &SilentProgress).await.unwrap();

        assert_eq!(outcome.steps, 1);
        assert!(outcome.report.contains("time limit"));
    }

    #[tokio::test]
    async fn time_cap_without_observations_fails() {
        let research = make_loop(
            Arc::new(FakeSearch::default()),
            Arc::new(FakeScraper::default()),
            limits(10, Duration::from_millis(100), 3),
        );

        let agent = StallingAgent { stall_from_step: 0 };
        let err = research
            .run(&agent, "Edge AI", &SilentProgress)
            .await
            .unwrap_err();

        assert!(matches!(err, PostcraftError::Research(_)));
        assert!(err.to_string().contains("before any research was gathered"));
    }

    #[tokio::test]
    async fn search_failure_is_fatal() {
        let search = Arc::new(FakeSearch {
            fail: true,
            ..Default::default()
        });
        let research = make_loop(
            search,
            Arc::new(FakeScraper::default()),
            limits(10, Duration::from_secs(30), 3),
        );

        let agent = FnAgent(|_: &ResearchContext| {
            Ok(NextAction::Search {
                query: "anything".into(),
            })
        });

        let err = research
            .run(&agent, "Edge AI", &SilentProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, PostcraftError::Tool { .. }));
    }

    #[tokio::test]
    async fn scrape_cap_replaces_extra_scrapes_with_note() {
        let scraper = Arc::new(FakeScraper::default());
        let research = make_loop(
            Arc::new(FakeSearch::default()),
            scraper.clone(),
            limits(10, Duration::from_secs(30), 2),
        );

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_in_agent = seen.clone();
        let agent = FnAgent(move |ctx: &ResearchContext| {
            if ctx.steps.len() == 3 {
                seen_in_agent
                    .lock()
                    .unwrap()
                    .extend(ctx.steps.iter().map(|s| s.observation.clone()));
                return Ok(NextAction::Finish(ResearchOutput::Text("done".into())));
            }
            Ok(NextAction::Scrape {
                url: format!("https://example.com/{}", ctx.steps.len()),
            })
        });

        let outcome = research.run(&agent, "Edge AI", &SilentProgress).await.unwrap();

        assert_eq!(outcome.steps, 3);
        assert_eq!(scraper.calls.load(Ordering::SeqCst), 2);
        let seen = seen.lock().unwrap();
        assert_eq!(seen[2], scrape_limit_note(2));
    }

    // --- LLM agent ---------------------------------------------------------

    struct ScriptedModel {
        replies: Mutex<Vec<ChatMessage>>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedModel {
        fn new(mut replies: Vec<ChatMessage>) -> Self {
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        fn model_name(&self) -> &str {
            "scripted"
        }

        async fn chat(&self, request: &ChatRequest) -> Result<ChatMessage> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| PostcraftError::Llm("script exhausted".into()))
        }
    }

    #[tokio::test]
    async fn llm_agent_maps_tool_calls_and_final_answer() {
        let model = Arc::new(ScriptedModel::new(vec![
            ChatMessage::assistant_tool_calls(vec![ToolCall::function(
                "abc",
                SEARCH_TOOL,
                serde_json::json!({ "query": "edge ai 2025" }),
            )]),
            ChatMessage::assistant("Key finding: edge inference is growing."),
        ]));
        let agent = LlmResearchAgent::new(model.clone());
        let research = make_loop(
            Arc::new(FakeSearch::default()),
            Arc::new(FakeScraper::default()),
            limits(10, Duration::from_secs(30), 3),
        );

        let outcome = research.run(&agent, "Edge AI", &SilentProgress).await.unwrap();
        assert_eq!(outcome.report, "Key finding: edge inference is growing.");
        assert_eq!(outcome.steps, 1);

        let requests = model.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].tools.len(), 2);
        assert_eq!(requests[0].messages.len(), 2);

        // system, task, replayed tool call, tool result
        let second = &requests[1].messages;
        assert_eq!(second.len(), 4);
        assert_eq!(second[2].tool_calls[0].function.name, SEARCH_TOOL);
        assert_eq!(second[3].tool_call_id.as_deref(), Some("call_0"));
    }

    #[tokio::test]
    async fn llm_agent_rejects_unknown_tool() {
        let model = Arc::new(ScriptedModel::new(vec![ChatMessage::assistant_tool_calls(
            vec![ToolCall::function("x", "delete_files", serde_json::json!({}))],
        )]));
        let agent = LlmResearchAgent::new(model);

        let err = agent
            .decide_next_action(&ResearchContext::new("Edge AI"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unknown tool 'delete_files'"));
    }

    #[test]
    fn tool_call_missing_argument_is_parse_error() {
        let call = ToolCall::function("x", SCRAPE_TOOL, serde_json::json!({ "link": "u" }));
        let err = parse_tool_call(&call).unwrap_err();
        assert!(matches!(err, PostcraftError::Parse { .. }));
    }
}
