use crate::retry::with_retries;
use crate::xai::dto::{ApiErrorBody, ChatCompletionRequest, ChatCompletionResponse, Message};
use async_trait::async_trait;
use reelcast_config::{HttpConfig, XaiConfig};
use reelcast_error::{GenerationError, GenerationErrorKind, HttpError, ReelcastResult};
use reelcast_interface::{TextGenerator, TextRequest, TextResponse};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Client for the xAI chat completions API.
///
/// Models are tried in configured order. A model is skipped only when the
/// API answers 403 or 404 for it; any other failure ends the call.
#[derive(Debug, Clone)]
pub struct XaiClient {
    config: XaiConfig,
    http: HttpConfig,
    api_key: String,
    client: reqwest::Client,
}

impl XaiClient {
    /// Create a client.
    #[instrument(skip(api_key, config, http), fields(base_url = %config.base_url))]
    pub fn new(
        api_key: impl Into<String>,
        config: XaiConfig,
        http: HttpConfig,
    ) -> ReelcastResult<Self> {
        debug!("Creating xAI client");
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| HttpError::new("xAI", e.to_string()))?;
        Ok(Self {
            config,
            http,
            api_key: api_key.into(),
            client,
        })
    }

    /// The client configuration
    pub fn config(&self) -> &XaiConfig {
        &self.config
    }

    #[instrument(skip(self, req))]
    async fn complete_with(
        &self,
        model: &str,
        req: &TextRequest,
    ) -> Result<TextResponse, GenerationError> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let body = ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![Message::system(req.system()), Message::user(req.user())],
            max_tokens: Some(self.config.max_tokens),
            temperature: Some(self.config.temperature),
        };

        let url = url.as_str();
        let body = &body;
        let response = with_retries(&self.http, "chat_completion", move || async move {
            let response = self
                .client
                .post(url)
                .bearer_auth(&self.api_key)
                .json(body)
                .send()
                .await
                .map_err(request_error)?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                return Err(GenerationError::new(GenerationErrorKind::Api {
                    status_code: status.as_u16(),
                    message: ApiErrorBody::message_of(&text),
                }));
            }

            response
                .json::<ChatCompletionResponse>()
                .await
                .map_err(|e| {
                    GenerationError::new(GenerationErrorKind::InvalidJson(format!(
                        "Failed to parse chat completion: {}",
                        e
                    )))
                })
        })
        .await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GenerationError::new(GenerationErrorKind::EmptyResponse))?;

        debug!(chars = content.len(), "Chat completion successful");
        Ok(TextResponse::new(
            content,
            response.model.unwrap_or_else(|| model.to_string()),
        ))
    }
}

fn request_error(e: reqwest::Error) -> GenerationError {
    if e.is_timeout() {
        GenerationError::new(GenerationErrorKind::Timeout(e.to_string()))
    } else {
        GenerationError::new(GenerationErrorKind::Request(e.to_string()))
    }
}

#[async_trait]
impl TextGenerator for XaiClient {
    #[instrument(skip(self, req))]
    async fn generate(&self, req: &TextRequest) -> ReelcastResult<TextResponse> {
        let mut rejections = Vec::new();

        for model in &self.config.models {
            match self.complete_with(model, req).await {
                Ok(response) => return Ok(response),
                Err(e) => match &e.kind {
                    GenerationErrorKind::Api {
                        status_code: 403 | 404,
                        message,
                    } => {
                        warn!(model = %model, error = %message, "Model rejected, trying next");
                        rejections.push(format!("{}: {}", model, message));
                    }
                    _ => return Err(e.into()),
                },
            }
        }

        Err(GenerationError::new(GenerationErrorKind::ModelsRejected(rejections.join("; "))).into())
    }

    fn provider_name(&self) -> &'static str {
        "xai"
    }

    fn model_name(&self) -> &str {
        self.config
            .models
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }
}
