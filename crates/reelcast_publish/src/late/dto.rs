//! Late request and response bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PresignBody<'a> {
    pub filename: &'a str,
    pub content_type: &'a str,
}

/// Answer of `POST /posts`; the id sits under `post` or at the top level.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PostCreated {
    #[serde(default)]
    pub post: Option<PostBody>,
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub error: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PostBody {
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<String>,
}

impl PostCreated {
    pub fn post_id(self) -> Option<String> {
        self.post.and_then(|p| p.id).or(self.id)
    }
}

/// Error text out of a Late error body.
pub(crate) fn error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => match value.get("error").or_else(|| value.get("message")) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => body.chars().take(500).collect(),
        },
        Err(_) => body.chars().take(500).collect(),
    }
}
