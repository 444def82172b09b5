//! Provider trait — the abstraction over the text-generation capability.
//!
//! A Provider knows how to send a transcript to an LLM and get a completion
//! back, optionally invoking declared tools. The pipeline treats it as an
//! opaque capability: prompt in, text (or tool call) out.

use crate::error::ProviderError;
use crate::message::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Configuration for a provider request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "gpt-4.1", "anthropic/claude-sonnet-4")
    pub model: String,

    /// The transcript so far
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Tools the model may call (empty for plain generation stages)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,

    /// Stop sequences
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

fn default_temperature() -> f32 {
    0.0
}

impl ProviderRequest {
    /// A plain generation request with no tools: one rendered prompt in,
    /// one text completion out.
    pub fn generation(model: impl Into<String>, prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            messages: vec![Message::user(prompt)],
            temperature,
            max_tokens: None,
            tools: Vec::new(),
            stop: Vec::new(),
        }
    }
}

/// A tool definition sent to the LLM so it knows what it can call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema of the tool's parameters
    pub parameters: serde_json::Value,
}

/// Token usage reported by the provider.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A completed provider response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The assistant message (text content and/or tool calls)
    pub message: Message,

    /// Token usage, if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,

    /// The model that produced the response
    pub model: String,
}

/// The core Provider trait.
///
/// Implementations live in `appforge-providers`. Calls block until the
/// completion arrives; there is no streaming surface — every consumer in
/// this system needs the whole completion before it can proceed.
#[async_trait]
pub trait Provider: Send + Sync {
    /// The provider's name (for logs and error messages).
    fn name(&self) -> &str;

    /// Generate a completion for the given request.
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_request_wraps_prompt_as_user_message() {
        let req = ProviderRequest::generation("test-model", "describe the app", 0.2);
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.messages[0].content, "describe the app");
        assert!(req.tools.is_empty());
        assert_eq!(req.temperature, 0.2);
    }
}
