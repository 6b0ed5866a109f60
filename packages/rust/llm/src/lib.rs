//! Chat-completions client for OpenAI-compatible endpoints (OpenRouter by default).
//!
//! The [`ChatModel`] trait is the seam the research and writer stages are
//! written against; [`OpenRouterClient`] is the HTTP implementation.

mod client;
mod types;

use async_trait::async_trait;

use postcraft_shared::Result;

pub use client::OpenRouterClient;
pub use types::{
    ChatMessage, ChatRequest, FunctionCall, FunctionDefinition, JsonSchemaFormat, MessageContent,
    ResponseFormat, Role, ToolCall, ToolDefinition,
};

/// A language model that answers a conversation with one assistant message.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier reported in run metadata.
    fn model_name(&self) -> &str;

    /// Send the conversation and return the assistant's reply.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatMessage>;
}
