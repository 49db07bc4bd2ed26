//! AI engine for FireWatch.
//!
//! Provides the Gemini API client with:
//! - Tool calling (function use)
//! - A conversational agent with an automatic tool-call loop
//! - An in-memory conversation store keyed by thread id

pub mod agent;
pub mod gemini;
pub mod store;
pub mod tools;

use async_trait::async_trait;

pub use agent::{ChatAgent, ToolDispatcher};
pub use gemini::{GeminiClient, GeminiConfig};
pub use store::{ConversationStore, HistoryEntry};

#[async_trait]
pub trait AiClient: Send + Sync {
    async fn send_message(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<AiResponse, AiError>;
}

/// A conversation message, tagged by role.
///
/// Ai messages carry the tool calls the model requested (empty for a final
/// answer); tool messages carry the id of the call they answer.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System {
        content: String,
    },
    Human {
        content: String,
    },
    Ai {
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    Tool {
        content: String,
        call_id: String,
    },
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    pub fn human(content: impl Into<String>) -> Self {
        Message::Human {
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Message::Ai {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn tool(content: impl Into<String>, call_id: impl Into<String>) -> Self {
        Message::Tool {
            content: content.into(),
            call_id: call_id.into(),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct AiResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
}
