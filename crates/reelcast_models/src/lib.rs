//! xAI clients for the Reelcast content pipeline.
//!
//! [`XaiClient`] implements [`reelcast_interface::TextGenerator`] over the
//! chat completions endpoint with ordered model fallback.
//! [`ImagineClient`] implements [`reelcast_interface::MediaGenerator`] over
//! the Imagine video and image endpoints.
//!
//! Both clients put an explicit timeout on every request and retry transient
//! failures (408, 429, 5xx) with exponential backoff when the configured retry
//! budget is non-zero.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod imagine;
mod retry;
mod xai;

pub use imagine::ImagineClient;
pub use retry::with_retries;
pub use xai::{ChatCompletionRequest, ChatCompletionResponse, Choice, ChoiceMessage, Message, XaiClient};
