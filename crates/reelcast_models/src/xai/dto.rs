//! Chat completions wire types (OpenAI compatible).

use serde::{Deserialize, Serialize};

/// Chat completion request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatCompletionRequest {
    /// Model identifier
    pub model: String,
    /// Conversation messages
    pub messages: Vec<Message>,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Temperature for sampling (0.0 - 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Message content
    pub content: String,
}

impl Message {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion response
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ChatCompletionResponse {
    /// Model used for completion
    #[serde(default)]
    pub model: Option<String>,
    /// Generated completions
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// A completion choice
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Choice {
    /// The generated message
    pub message: ChoiceMessage,
}

/// Message in a choice
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ChoiceMessage {
    /// Generated content; null when the model produced none
    #[serde(default)]
    pub content: Option<String>,
}

/// Error body returned by the API
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum ApiErrorBody {
    Nested { error: ApiErrorDetail },
    Flat { error: String },
    Message { message: String },
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorDetail {
    message: String,
}

impl ApiErrorBody {
    /// Best human-readable message in an error body, or the raw text.
    pub(crate) fn message_of(body: &str) -> String {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(ApiErrorBody::Nested { error }) => error.message,
            Ok(ApiErrorBody::Flat { error }) => error,
            Ok(ApiErrorBody::Message { message }) => message,
            Err(_) => body.chars().take(500).collect(),
        }
    }
}
