//! HTTP client for OpenAI-compatible `/chat/completions` endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use postcraft_shared::{ModelSettings, PostcraftError, Result};

use crate::ChatModel;
use crate::types::{ChatMessage, ChatRequest, ResponseFormat, ToolDefinition};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);
const APP_TITLE: &str = "postcraft";

/// Chat model reached over an OpenAI-compatible API such as OpenRouter.
pub struct OpenRouterClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct CompletionPayload<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "no_tools")]
    tools: &'a [ToolDefinition],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<&'a ResponseFormat>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<ApiError>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

impl OpenRouterClient {
    pub fn new(settings: &ModelSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PostcraftError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/chat/completions",
                settings.base_url.trim_end_matches('/')
            ),
            api_key: settings.api_key.clone(),
            model: settings.name.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }
}

#[async_trait]
impl ChatModel for OpenRouterClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    #[instrument(skip_all, fields(model = %self.model, messages = request.messages.len()))]
    async fn chat(&self, request: &ChatRequest) -> Result<ChatMessage> {
        let payload = CompletionPayload {
            model: &self.model,
            messages: &request.messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools: &request.tools,
            response_format: request.response_format.as_ref(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .header("X-Title", APP_TITLE)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PostcraftError::Llm(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PostcraftError::Llm(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            warn!(%status, "completion request rejected");
            return Err(map_status(status.as_u16(), &body));
        }

        let parsed: CompletionResponse = serde_json::from_str(&body)
            .map_err(|e| PostcraftError::Llm(format!("failed to parse response: {e}")))?;

        if let Some(usage) = &parsed.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "token usage"
            );
        }

        let Some(choice) = parsed.choices.into_iter().next() else {
            let reason = parsed
                .error
                .map(|e| e.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "response contained no choices".to_string());
            return Err(PostcraftError::Llm(reason));
        };

        info!(
            finish_reason = choice.finish_reason.as_deref().unwrap_or("unknown"),
            tool_calls = choice.message.tool_calls.len(),
            "completion received"
        );

        Ok(choice.message)
    }
}

fn no_tools(tools: &&[ToolDefinition]) -> bool {
    tools.is_empty()
}

fn map_status(status: u16, body: &str) -> PostcraftError {
    let detail: String = body.chars().take(300).collect();
    match status {
        401 | 403 => PostcraftError::Llm(format!("authentication failed (HTTP {status}): {detail}")),
        429 => PostcraftError::Llm(format!("rate limit exceeded (HTTP 429): {detail}")),
        _ => PostcraftError::Llm(format!("HTTP {status}: {detail}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MessageContent, Role};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(base_url: String) -> ModelSettings {
        ModelSettings {
            api_key: "or-test".into(),
            base_url,
            name: "test/model".into(),
            temperature: 0.7,
            max_tokens: 4000,
        }
    }

    fn reply(message: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "gen-1",
            "model": "test/model",
            "choices": [{ "index": 0, "message": message, "finish_reason": "stop" }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
        }))
    }

    #[tokio::test]
    async fn chat_returns_text_reply() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer or-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "test/model",
                "max_tokens": 4000,
                "messages": [{ "role": "user", "content": "hello" }]
            })))
            .respond_with(reply(serde_json::json!({ "role": "assistant", "content": "hi there" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenRouterClient::new(&settings(server.uri())).unwrap();
        let msg = client
            .chat(&ChatRequest::new(vec![ChatMessage::user("hello")]))
            .await
            .unwrap();

        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.content, Some(MessageContent::Text("hi there".into())));
        assert_eq!(client.model_name(), "test/model");
    }

    #[tokio::test]
    async fn chat_sends_tools_and_parses_tool_calls() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "tools": [{ "type": "function", "function": { "name": "web_search" } }]
            })))
            .respond_with(reply(serde_json::json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": { "name": "web_search", "arguments": "{\"query\":\"rust\"}" }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tool = ToolDefinition::function(
            "web_search",
            "Search the web",
            serde_json::json!({ "type": "object", "properties": { "query": { "type": "string" } } }),
        );
        let request = ChatRequest::new(vec![ChatMessage::user("research")]).with_tools(vec![tool]);

        let client = OpenRouterClient::new(&settings(server.uri())).unwrap();
        let msg = client.chat(&request).await.unwrap();

        assert!(msg.content.is_none());
        assert_eq!(msg.tool_calls.len(), 1);
        assert_eq!(msg.tool_calls[0].id, "call_1");
        assert_eq!(msg.tool_calls[0].function.arguments, "{\"query\":\"rust\"}");
    }

    #[tokio::test]
    async fn chat_sends_response_format() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "response_format": { "type": "json_schema", "json_schema": { "name": "post" } }
            })))
            .respond_with(reply(serde_json::json!({ "role": "assistant", "content": "{}" })))
            .expect(1)
            .mount(&server)
            .await;

        let request = ChatRequest::new(vec![ChatMessage::user("write")]).with_response_format(
            ResponseFormat::json_schema("post", serde_json::json!({ "type": "object" })),
        );

        let client = OpenRouterClient::new(&settings(server.uri())).unwrap();
        client.chat(&request).await.unwrap();
    }

    #[tokio::test]
    async fn chat_maps_auth_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;

        let client = OpenRouterClient::new(&settings(server.uri())).unwrap();
        let err = client
            .chat(&ChatRequest::new(vec![ChatMessage::user("x")]))
            .await
            .unwrap_err();

        match err {
            PostcraftError::Llm(msg) => {
                assert!(msg.contains("authentication failed"));
                assert!(msg.contains("invalid key"));
            }
            other => panic!("expected Llm error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn chat_surfaces_provider_error_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": { "message": "model overloaded", "code": 502 }
            })))
            .mount(&server)
            .await;

        let client = OpenRouterClient::new(&settings(server.uri())).unwrap();
        let err = client
            .chat(&ChatRequest::new(vec![ChatMessage::user("x")]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "language model error: model overloaded");
    }
}
