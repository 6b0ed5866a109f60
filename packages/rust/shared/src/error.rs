//! Error types for postcraft.
//!
//! Library crates use [`PostcraftError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all postcraft operations.
#[derive(Debug, thiserror::Error)]
pub enum PostcraftError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The topic was rejected before any external call was made.
    #[error("invalid topic: {0}")]
    Input(#[from] TopicError),

    /// A fatal tool failure (the search service).
    #[error("{tool} failed: {message}")]
    Tool { tool: String, message: String },

    /// The research stage could not produce a report.
    #[error("research error: {0}")]
    Research(String),

    /// Transport or protocol error talking to the language model.
    #[error("language model error: {0}")]
    Llm(String),

    /// The writer stage exhausted every strategy.
    #[error("generation error: {message}")]
    Generation {
        message: String,
        /// Last raw model output, kept for diagnostics.
        raw_output: Option<String>,
    },

    /// Network/HTTP error outside the tool and model adapters.
    #[error("network error: {0}")]
    Network(String),

    /// Response or document parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (schema mismatch, invalid format, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PostcraftError>;

impl PostcraftError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a tool error for the named tool.
    pub fn tool(tool: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Tool {
            tool: tool.into(),
            message: msg.into(),
        }
    }

    /// Create a generation error, optionally carrying the raw model output.
    pub fn generation(msg: impl Into<String>, raw_output: Option<String>) -> Self {
        Self::Generation {
            message: msg.into(),
            raw_output,
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Raw model output attached to a generation failure, if any.
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            Self::Generation { raw_output, .. } => raw_output.as_deref(),
            _ => None,
        }
    }
}

/// Reasons a topic is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopicError {
    #[error("topic cannot be empty")]
    EmptyInput,

    #[error("topic too short ({len} chars, minimum 3)")]
    TooShort { len: usize },

    #[error("topic too long ({len} chars, maximum 200)")]
    TooLong { len: usize },
}

/// A structured post violated its field-count invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostError {
    #[error("expected 3-5 key points, got {0}")]
    KeyPointCount(usize),

    #[error("expected 3-5 hashtags, got {0}")]
    HashtagCount(usize),
}
