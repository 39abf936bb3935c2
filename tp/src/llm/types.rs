//! LLM request/response types
//!
//! Provider-agnostic shapes for a single structured-output completion.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A completion request - everything needed for one LLM call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System instruction (rendered from a Handlebars template)
    pub system_prompt: String,

    /// User messages (one per oracle operation)
    pub messages: Vec<Message>,

    /// Schema the response must conform to; requests JSON output when set
    pub response_schema: Option<serde_json::Value>,

    /// Max tokens for response (capped by config)
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Single-turn request expecting JSON shaped by `schema`
    pub fn structured(
        system_prompt: impl Into<String>,
        prompt: impl Into<String>,
        schema: serde_json::Value,
        max_tokens: u32,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            messages: vec![Message::user(prompt)],
            response_schema: Some(schema),
            max_tokens,
        }
    }
}

/// A user turn sent to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub content: String,
}

impl Message {
    /// Create a user message with text content
    pub fn user(text: impl Into<String>) -> Self {
        debug!("Message::user: called");
        Self { content: text.into() }
    }
}

/// Response from a completion request
#[derive(Debug, Clone, Default)]
pub struct CompletionResponse {
    /// Text content, if any
    pub content: Option<String>,

    /// Why the model stopped generating
    pub stop_reason: StopReason,

    /// Token usage for this request
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// Response carrying only text
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Text content trimmed, empty when the model returned nothing
    pub fn trimmed_text(&self) -> &str {
        self.content.as_deref().map(str::trim).unwrap_or("")
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StopReason {
    /// Natural end of response
    #[default]
    EndTurn,
    /// Hit max tokens limit
    MaxTokens,
    /// Blocked by the provider's safety filters
    Safety,
    /// Anything else the provider reports
    Other(String),
}

/// Token usage statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_request() {
        let req = CompletionRequest::structured("sys", "hello", serde_json::json!({"type": "ARRAY"}), 512);
        assert_eq!(req.messages, vec![Message::user("hello")]);
        assert_eq!(req.response_schema.unwrap()["type"], "ARRAY");
        assert_eq!(req.max_tokens, 512);
    }

    #[test]
    fn test_trimmed_text() {
        assert_eq!(CompletionResponse::text("  [] \n").trimmed_text(), "[]");
        assert_eq!(CompletionResponse::default().trimmed_text(), "");
    }

    #[test]
    fn test_usage_total() {
        let usage = TokenUsage {
            input_tokens: 120,
            output_tokens: 30,
        };
        assert_eq!(usage.total(), 150);
    }
}
