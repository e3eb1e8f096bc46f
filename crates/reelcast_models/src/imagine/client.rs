use crate::imagine::dto::{
    ImageGenerated, ImageGenerationBody, VideoGenerationBody, VideoPoll, VideoSubmitted,
};
use crate::retry::with_retries;
use async_trait::async_trait;
use bytes::Bytes;
use reelcast_config::{HttpConfig, ImagineConfig};
use reelcast_error::{HttpError, MediaError, MediaErrorKind, ReelcastResult};
use reelcast_interface::{ImageRequest, MediaGenerator, VideoRequest, VideoStatus};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Client for the xAI Imagine video and image endpoints.
#[derive(Debug, Clone)]
pub struct ImagineClient {
    config: ImagineConfig,
    http: HttpConfig,
    api_key: String,
    client: reqwest::Client,
}

impl ImagineClient {
    /// Create a client.
    #[instrument(skip(api_key, config, http), fields(base_url = %config.base_url))]
    pub fn new(
        api_key: impl Into<String>,
        config: ImagineConfig,
        http: HttpConfig,
    ) -> ReelcastResult<Self> {
        debug!("Creating Imagine client");
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| HttpError::new("xAI Imagine", e.to_string()))?;
        Ok(Self {
            config,
            http,
            api_key: api_key.into(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, MediaError> {
        let status = response.status();
        if !status.is_success() {
            let message: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(500)
                .collect();
            return Err(MediaError::new(MediaErrorKind::Api {
                status_code: status.as_u16(),
                message,
            }));
        }
        response.json::<T>().await.map_err(|e| {
            MediaError::new(MediaErrorKind::Request(format!(
                "Failed to parse media API response: {}",
                e
            )))
        })
    }
}

fn request_error(e: reqwest::Error) -> MediaError {
    if e.is_timeout() {
        MediaError::new(MediaErrorKind::Timeout(e.to_string()))
    } else {
        MediaError::new(MediaErrorKind::Request(e.to_string()))
    }
}

#[async_trait]
impl MediaGenerator for ImagineClient {
    #[instrument(skip(self, req), fields(duration = *req.duration()))]
    async fn submit_video(&self, req: &VideoRequest) -> ReelcastResult<String> {
        let url = self.url("videos/generations");
        let url = url.as_str();
        let body = VideoGenerationBody {
            model: &self.config.video_model,
            prompt: req.prompt(),
            duration: *req.duration(),
            aspect_ratio: req.aspect_ratio(),
            resolution: req.resolution(),
        };
        let body = &body;
        let timeout = Duration::from_secs(self.config.submit_timeout_secs);

        let submitted: VideoSubmitted = with_retries(&self.http, "submit_video", move || async move {
            let response = self
                .client
                .post(url)
                .bearer_auth(&self.api_key)
                .timeout(timeout)
                .json(body)
                .send()
                .await
                .map_err(request_error)?;
            Self::read_json(response).await
        })
        .await?;

        let request_id = submitted
            .request_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                MediaError::new(MediaErrorKind::MissingRequestId(
                    "videos/generations".to_string(),
                ))
            })?;
        debug!(request_id = %request_id, "Video job submitted");
        Ok(request_id)
    }

    #[instrument(skip(self))]
    async fn poll_video(&self, request_id: &str) -> ReelcastResult<VideoStatus> {
        let url = self.url(&format!("videos/{}", request_id));
        let url = url.as_str();
        let timeout = Duration::from_secs(self.config.poll_timeout_secs);

        let poll: VideoPoll = with_retries(&self.http, "poll_video", move || async move {
            let response = self
                .client
                .get(url)
                .bearer_auth(&self.api_key)
                .timeout(timeout)
                .send()
                .await
                .map_err(request_error)?;
            Self::read_json(response).await
        })
        .await?;

        let status = poll.status.to_lowercase();
        match status.as_str() {
            "done" => {
                let video = poll.video.ok_or_else(|| {
                    MediaError::new(MediaErrorKind::MissingUrl(request_id.to_string()))
                })?;
                if video.respect_moderation == Some(false) {
                    return Err(
                        MediaError::new(MediaErrorKind::Moderated(request_id.to_string())).into(),
                    );
                }
                let url = video.url.filter(|url| !url.is_empty()).ok_or_else(|| {
                    MediaError::new(MediaErrorKind::MissingUrl(request_id.to_string()))
                })?;
                Ok(VideoStatus::Done { url })
            }
            "expired" => Ok(VideoStatus::Expired),
            "failed" | "error" | "cancelled" | "canceled" => {
                let reason = match poll.error_message() {
                    Some(message) => format!("{}: {}", status, message),
                    None => status.clone(),
                };
                warn!(request_id, reason = %reason, "Video job failed");
                Ok(VideoStatus::Failed { reason })
            }
            "pending" | "queued" | "processing" | "in_progress" => {
                debug!(status = %status, "Video still rendering");
                Ok(VideoStatus::Pending)
            }
            other => {
                warn!(status = other, "Unrecognised video status, polling again");
                Ok(VideoStatus::Pending)
            }
        }
    }

    #[instrument(skip(self, req))]
    async fn generate_image(&self, req: &ImageRequest) -> ReelcastResult<String> {
        let url = self.url("images/generations");
        let url = url.as_str();
        let body = ImageGenerationBody {
            model: &self.config.image_model,
            prompt: req.prompt(),
            aspect_ratio: req.aspect_ratio(),
        };
        let body = &body;
        let timeout = Duration::from_secs(self.config.image_timeout_secs);

        let generated: ImageGenerated =
            with_retries(&self.http, "generate_image", move || async move {
                let response = self
                    .client
                    .post(url)
                    .bearer_auth(&self.api_key)
                    .timeout(timeout)
                    .json(body)
                    .send()
                    .await
                    .map_err(request_error)?;
                Self::read_json(response).await
            })
            .await?;

        Ok(generated.into_url().ok_or_else(|| {
            MediaError::new(MediaErrorKind::MissingUrl("images/generations".to_string()))
        })?)
    }

    #[instrument(skip(self, url))]
    async fn download(&self, url: &str) -> ReelcastResult<Bytes> {
        let timeout = Duration::from_secs(self.config.download_timeout_secs);

        let bytes = with_retries(&self.http, "download", move || async move {
            let response = self
                .client
                .get(url)
                .timeout(timeout)
                .send()
                .await
                .map_err(request_error)?;
            let status = response.status();
            if !status.is_success() {
                return Err(MediaError::new(MediaErrorKind::Api {
                    status_code: status.as_u16(),
                    message: format!("Download failed for {}", url),
                }));
            }
            response.bytes().await.map_err(request_error)
        })
        .await?;

        if bytes.is_empty() {
            return Err(MediaError::new(MediaErrorKind::EmptyPayload(url.to_string())).into());
        }
        debug!(bytes = bytes.len(), "Downloaded media");
        Ok(bytes)
    }
}
