//! Request and response types exchanged through the service traits.

use derive_getters::Getters;
use reelcast_core::{MediaKind, Platform};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A prompt for a text generator.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct TextRequest {
    /// Instructions fixing the output format
    system: String,
    /// The actual request
    user: String,
}

/// A text generator's answer.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct TextResponse {
    content: String,
    model: String,
}

impl TextResponse {
    /// Create a response.
    pub fn new(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
        }
    }
}

/// Parameters of a video generation job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct VideoRequest {
    /// Full prompt (scene, narration, music)
    prompt: String,
    /// Clip length in seconds
    #[builder(default = "10")]
    duration: u32,
    /// Aspect ratio, e.g. `9:16`
    #[builder(default = "\"9:16\".to_string()")]
    aspect_ratio: String,
    /// Resolution, e.g. `720p`
    #[builder(default = "\"720p\".to_string()")]
    resolution: String,
}

/// Parameters of an image generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct ImageRequest {
    /// Visual prompt
    prompt: String,
    /// Aspect ratio, e.g. `9:16`
    #[builder(default = "\"9:16\".to_string()")]
    aspect_ratio: String,
}

/// State of a submitted video job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoStatus {
    /// Still rendering
    Pending,
    /// Finished; the video can be downloaded from `url`
    Done {
        /// Download URL
        url: String,
    },
    /// The job expired before finishing
    Expired,
    /// The API gave up on the job
    Failed {
        /// Status and error text reported by the API
        reason: String,
    },
}

/// What an encoder reports about a video file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoProbe {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Whether the file has an audio stream
    pub has_audio: bool,
    /// Duration in seconds, if known
    pub duration_secs: Option<f64>,
}

/// Output frame and length constraints of an encoding job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSpec {
    /// Output width
    pub width: u32,
    /// Output height
    pub height: u32,
}

/// A single encoder invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodeJob {
    /// Normalize a generated video to the output frame and mix in music
    Finalize {
        /// Source video
        input: PathBuf,
        /// Destination
        output: PathBuf,
        /// Output frame
        frame: FrameSpec,
        /// Rescale and pad to `frame`
        rescale: bool,
        /// Keep the source audio track (narration)
        keep_audio: bool,
        /// Music track mixed under the narration
        music: Option<PathBuf>,
    },
    /// Re-encode a library video to the output frame
    Reencode {
        /// Source video
        input: PathBuf,
        /// Destination
        output: PathBuf,
        /// Output frame
        frame: FrameSpec,
        /// Maximum length in seconds
        max_secs: u32,
    },
    /// Build a slideshow from still images
    Slideshow {
        /// Images in display order
        images: Vec<PathBuf>,
        /// Destination
        output: PathBuf,
        /// Output frame
        frame: FrameSpec,
        /// Seconds per image
        secs_per_image: u32,
    },
    /// Loop one still image into a clip
    LoopImage {
        /// Source image
        image: PathBuf,
        /// Destination
        output: PathBuf,
        /// Output frame
        frame: FrameSpec,
        /// Clip length in seconds
        secs: u32,
    },
}

impl EncodeJob {
    /// File the job writes.
    pub fn output(&self) -> &std::path::Path {
        match self {
            EncodeJob::Finalize { output, .. }
            | EncodeJob::Reencode { output, .. }
            | EncodeJob::Slideshow { output, .. }
            | EncodeJob::LoopImage { output, .. } => output,
        }
    }
}

/// Presigned upload slot returned by a publishing API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUpload {
    /// Where to PUT the bytes
    pub upload_url: String,
    /// Public URL of the uploaded file
    pub public_url: String,
}

/// One destination of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostTarget {
    /// Platform
    pub platform: Platform,
    /// Publishing profile id
    pub account_id: String,
}

/// Media attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMedia {
    /// `video` or `image`
    #[serde(rename = "type")]
    pub media_type: String,
    /// Public URL
    pub url: String,
}

impl PostMedia {
    /// Media item for an uploaded file of `kind`.
    pub fn new(kind: MediaKind, url: impl Into<String>) -> Self {
        Self {
            media_type: if kind.is_video() { "video" } else { "image" }.to_string(),
            url: url.into(),
        }
    }
}

/// Body of a create-post call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    /// Caption and hashtags
    pub content: String,
    /// Destinations
    pub platforms: Vec<PostTarget>,
    /// Attached media
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub media_items: Vec<PostMedia>,
    /// Publish without scheduling
    pub publish_now: bool,
    /// Timezone of the post
    pub timezone: String,
}

/// Result of a successful create-post call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReceipt {
    /// Post id assigned by the API, when returned
    pub post_id: Option<String>,
}
