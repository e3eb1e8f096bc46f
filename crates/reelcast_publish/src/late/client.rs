use crate::late::dto::{PostCreated, PresignBody, error_message};
use async_trait::async_trait;
use bytes::Bytes;
use reelcast_config::{HttpConfig, PublishConfig};
use reelcast_error::{HttpError, PublishError, PublishErrorKind, ReelcastResult};
use reelcast_interface::{PostReceipt, PostRequest, PresignedUpload, PublishingApi};
use reelcast_models::with_retries;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

/// Client for the Late publishing API.
#[derive(Debug, Clone)]
pub struct LateClient {
    config: PublishConfig,
    http: HttpConfig,
    api_key: String,
    client: reqwest::Client,
}

impl LateClient {
    /// Create a client.
    #[instrument(skip(api_key, config, http), fields(base_url = %config.base_url))]
    pub fn new(
        api_key: impl Into<String>,
        config: PublishConfig,
        http: HttpConfig,
    ) -> ReelcastResult<Self> {
        debug!("Creating Late client");
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| HttpError::new("Late", e.to_string()))?;
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

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.request_timeout_secs)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, PublishError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(PublishError::new(PublishErrorKind::Rejected {
            status_code: status.as_u16(),
            message: error_message(&body),
        }))
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, PublishError> {
        let response = Self::check(response).await?;
        response.json::<T>().await.map_err(|e| {
            PublishError::new(PublishErrorKind::InvalidResponse(e.to_string()))
        })
    }
}

fn transport_error(e: reqwest::Error) -> PublishError {
    PublishError::new(PublishErrorKind::Transport(e.to_string()))
}

#[async_trait]
impl PublishingApi for LateClient {
    #[instrument(skip(self))]
    async fn presign(&self, filename: &str, content_type: &str) -> ReelcastResult<PresignedUpload> {
        let url = self.url("media/presign");
        let url = url.as_str();
        let body = PresignBody {
            filename,
            content_type,
        };
        let body = &body;
        let timeout = self.request_timeout();

        let upload: PresignedUpload = with_retries(&self.http, "presign", move || async move {
            let response = self
                .client
                .post(url)
                .bearer_auth(&self.api_key)
                .timeout(timeout)
                .json(body)
                .send()
                .await
                .map_err(transport_error)?;
            Self::read_json(response).await
        })
        .await?;

        if upload.upload_url.is_empty() || upload.public_url.is_empty() {
            return Err(PublishError::new(PublishErrorKind::InvalidResponse(
                "presign response lacks uploadUrl or publicUrl".to_string(),
            ))
            .into());
        }
        Ok(upload)
    }

    #[instrument(skip(self, upload_url, body), fields(size = body.len()))]
    async fn upload(&self, upload_url: &str, content_type: &str, body: Bytes) -> ReelcastResult<()> {
        let timeout = Duration::from_secs(self.config.upload_timeout_secs);
        let body = &body;

        with_retries(&self.http, "upload", move || async move {
            let response = self
                .client
                .put(upload_url)
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .timeout(timeout)
                .body(body.clone())
                .send()
                .await
                .map_err(transport_error)?;
            Self::check(response).await.map(|_| ())
        })
        .await?;
        debug!("Media uploaded");
        Ok(())
    }

    #[instrument(skip(self, post), fields(targets = post.platforms.len()))]
    async fn create_post(&self, post: &PostRequest) -> ReelcastResult<PostReceipt> {
        let url = self.url("posts");
        let url = url.as_str();
        let timeout = self.request_timeout();

        // Not retried: the post may exist even when the call fails.
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .timeout(timeout)
            .json(post)
            .send()
            .await
            .map_err(transport_error)?;
        let created: PostCreated = Self::read_json(response).await?;

        if let (None, Some(error)) = (&created.post, &created.error) {
            return Err(PublishError::new(PublishErrorKind::InvalidResponse(error.to_string())).into());
        }
        let post_id = created.post_id();
        debug!(?post_id, "Post created");
        Ok(PostReceipt { post_id })
    }
}
