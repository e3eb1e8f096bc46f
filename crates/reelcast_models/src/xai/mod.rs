//! xAI chat completions.

mod client;
mod dto;

pub use client::XaiClient;
pub use dto::{ChatCompletionRequest, ChatCompletionResponse, Choice, ChoiceMessage, Message};
