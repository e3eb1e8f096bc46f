//! Mapping of Reelcast errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reelcast_error::{
    PublishErrorCategory, ReelcastError, ReelcastErrorKind, ServerError, ServerErrorKind,
    StorageErrorKind,
};
use serde_json::json;

/// Error returned by every handler.
///
/// Serializes as `{"error": "...", "code": "..."}`; the message carries the
/// inner kind only, without source locations.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// HTTP status of the response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    #[track_caller]
    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        ServerError::new(ServerErrorKind::BadRequest(message.into())).into()
    }

    #[track_caller]
    pub(crate) fn job_not_found(job_id: impl Into<String>) -> Self {
        ServerError::new(ServerErrorKind::JobNotFound(job_id.into())).into()
    }
}

impl From<ReelcastError> for ApiError {
    fn from(err: ReelcastError) -> Self {
        let (status, code, message) = match err.kind() {
            ReelcastErrorKind::Storage(e) => {
                let (status, code) = match &e.kind {
                    StorageErrorKind::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                    StorageErrorKind::MediaMissing(_) => (StatusCode::NOT_FOUND, "media_missing"),
                    StorageErrorKind::InvalidId(_) => (StatusCode::BAD_REQUEST, "invalid_id"),
                    StorageErrorKind::InvalidTransition(_) => {
                        (StatusCode::CONFLICT, "invalid_transition")
                    }
                    _ => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
                };
                (status, code, e.kind.to_string())
            }
            ReelcastErrorKind::Publish(e) => {
                let (status, code) = match e.category() {
                    PublishErrorCategory::Precondition => (StatusCode::CONFLICT, "publish_rejected"),
                    PublishErrorCategory::Configuration => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "publish_not_configured")
                    }
                    PublishErrorCategory::Transport => (StatusCode::BAD_GATEWAY, "publish_failed"),
                };
                (status, code, e.kind.to_string())
            }
            ReelcastErrorKind::Config(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "config_error",
                e.message.clone(),
            ),
            ReelcastErrorKind::Generation(e) => {
                (StatusCode::BAD_GATEWAY, "generation_failed", e.kind.to_string())
            }
            ReelcastErrorKind::Media(e) => {
                (StatusCode::BAD_GATEWAY, "media_failed", e.kind.to_string())
            }
            ReelcastErrorKind::Server(e) => return e.clone().into(),
            ReelcastErrorKind::Http(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                e.message.clone(),
            ),
            ReelcastErrorKind::Json(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                e.message.clone(),
            ),
        };
        Self {
            status,
            code,
            message,
        }
    }
}

impl From<ServerError> for ApiError {
    fn from(err: ServerError) -> Self {
        let (status, code) = match &err.kind {
            ServerErrorKind::JobNotFound(_) => (StatusCode::NOT_FOUND, "job_not_found"),
            ServerErrorKind::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ServerErrorKind::Bind(_) | ServerErrorKind::Serve(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };
        Self {
            status,
            code,
            message: err.kind.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(code = self.code, error = %self.message, "Request failed");
        } else {
            tracing::debug!(code = self.code, error = %self.message, "Request rejected");
        }
        let body = json!({
            "error": self.message,
            "code": self.code,
        });
        (self.status, Json(body)).into_response()
    }
}
