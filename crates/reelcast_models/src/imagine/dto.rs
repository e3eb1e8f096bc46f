//! xAI Imagine wire types.

use serde::{Deserialize, Serialize};

/// Body of a video generation request
#[derive(Debug, Clone, Serialize)]
pub(crate) struct VideoGenerationBody<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub duration: u32,
    pub aspect_ratio: &'a str,
    pub resolution: &'a str,
}

/// Answer to a video generation request
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct VideoSubmitted {
    #[serde(default)]
    pub request_id: Option<String>,
}

/// Answer to a video status poll
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct VideoPoll {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub video: Option<VideoResult>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl VideoPoll {
    /// Error text attached to a failed job, if any.
    pub fn error_message(&self) -> Option<String> {
        match self.error.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(o) => o
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct VideoResult {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub respect_moderation: Option<bool>,
}

/// Body of an image generation request
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ImageGenerationBody<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub aspect_ratio: &'a str,
}

/// Answer to an image generation request: `data[0].url` or a top-level `url`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ImageGenerated {
    #[serde(default)]
    pub data: Vec<ImageData>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ImageData {
    #[serde(default)]
    pub url: Option<String>,
}

impl ImageGenerated {
    pub(crate) fn into_url(self) -> Option<String> {
        self.data
            .into_iter()
            .next()
            .and_then(|d| d.url)
            .or(self.url)
            .filter(|url| !url.is_empty())
    }
}
