//! Trait definitions for the external services the pipeline drives.

use crate::{
    EncodeJob, ImageRequest, PostReceipt, PostRequest, PresignedUpload, TextRequest,
    TextResponse, VideoProbe, VideoRequest, VideoStatus,
};
use async_trait::async_trait;
use bytes::Bytes;
use reelcast_error::ReelcastResult;
use std::path::Path;

/// A chat-style text generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for a system + user prompt pair.
    async fn generate(&self, req: &TextRequest) -> ReelcastResult<TextResponse>;

    /// Provider name (e.g., "xai").
    fn provider_name(&self) -> &'static str;

    /// Preferred model identifier.
    fn model_name(&self) -> &str;
}

/// A media generation backend with asynchronous video jobs.
#[async_trait]
pub trait MediaGenerator: Send + Sync {
    /// Submit a video job and return its request id.
    async fn submit_video(&self, req: &VideoRequest) -> ReelcastResult<String>;

    /// Check a video job once.
    async fn poll_video(&self, request_id: &str) -> ReelcastResult<VideoStatus>;

    /// Generate an image and return its download URL.
    async fn generate_image(&self, req: &ImageRequest) -> ReelcastResult<String>;

    /// Download a generated asset.
    async fn download(&self, url: &str) -> ReelcastResult<Bytes>;
}

/// External audio/video encoder.
#[async_trait]
pub trait MediaEncoder: Send + Sync {
    /// Read frame size, audio presence and duration of a video.
    async fn probe(&self, path: &Path) -> ReelcastResult<VideoProbe>;

    /// Run one encoding job to completion.
    async fn encode(&self, job: &EncodeJob) -> ReelcastResult<()>;

    /// Whether the encoder binaries are installed.
    async fn is_available(&self) -> bool;
}

/// A social publishing API.
#[async_trait]
pub trait PublishingApi: Send + Sync {
    /// Reserve an upload slot for a media file.
    async fn presign(&self, filename: &str, content_type: &str)
    -> ReelcastResult<PresignedUpload>;

    /// Upload media bytes to a presigned URL.
    async fn upload(&self, upload_url: &str, content_type: &str, body: Bytes)
    -> ReelcastResult<()>;

    /// Create a post that publishes immediately.
    async fn create_post(&self, post: &PostRequest) -> ReelcastResult<PostReceipt>;
}
