//! Review API routes.

use crate::{ApiError, ApiState};
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use reelcast_core::{AssetType, Draft, DraftStatus, DraftSummary};
use reelcast_error::{ReelcastError, StorageError, StorageErrorKind};
use reelcast_pipeline::{BatchRequest, LogProgress, Progress, ProgressReporter};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

type ApiResult<T> = Result<T, ApiError>;

/// Build the review API router.
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/drafts", get(list_drafts))
        .route("/api/drafts/:id", get(get_draft))
        .route("/api/drafts/:id/media", get(get_media))
        .route("/api/drafts/:id/approve", post(approve_draft))
        .route("/api/drafts/:id/publish", post(publish_draft))
        .route("/api/drafts/:id/post", post(publish_draft))
        .route("/api/drafts/:id/retry", post(retry_draft))
        .route("/api/generate", post(start_generation))
        .route("/api/generate/status", get(generation_status))
        .route("/api/jobs/:id", get(get_job))
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    status: Option<String>,
}

/// `all` lists everything; no parameter means drafts awaiting review.
fn status_filter(raw: Option<&str>) -> ApiResult<Option<DraftStatus>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Some(DraftStatus::Generated)),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| ApiError::bad_request(format!("unknown status '{}'", s))),
    }
}

async fn list_drafts(
    State(state): State<ApiState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<DraftSummary>>> {
    let status = status_filter(query.status.as_deref())?;
    let records = state.store().list(status).await?;
    Ok(Json(records.iter().map(DraftSummary::from).collect()))
}

#[derive(Debug, Serialize)]
struct DraftDetail {
    #[serde(flatten)]
    summary: DraftSummary,
    content: Option<Draft>,
}

async fn get_draft(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DraftDetail>> {
    let record = state.store().get(&id).await?;
    Ok(Json(DraftDetail {
        summary: DraftSummary::from(&record),
        content: record.draft().clone(),
    }))
}

async fn get_media(State(state): State<ApiState>, Path(id): Path<String>) -> ApiResult<Response> {
    let media = state.store().media(&id).await?;
    let data = tokio::fs::read(&media.path).await.map_err(|e| {
        ReelcastError::from(StorageError::new(StorageErrorKind::FileRead(format!(
            "{}: {}",
            media.path.display(),
            e
        ))))
    })?;
    Ok((
        [(header::CONTENT_TYPE, media.kind.mime_type())],
        data,
    )
        .into_response())
}

async fn approve_draft(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DraftSummary>> {
    state.store().set_status(&id, DraftStatus::Approved).await?;
    let record = state.store().get(&id).await?;
    info!(draft_id = %id, "Approved draft");
    Ok(Json(DraftSummary::from(&record)))
}

async fn publish_draft(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let receipt = state.publisher().publish(&id).await?;
    Ok(Json(json!({"success": true, "receipt": receipt})))
}

#[derive(Debug, Default, Deserialize)]
struct RetryBody {
    feedback: Option<String>,
}

/// Empty bodies mean "all defaults".
fn parse_body<T: Default + for<'de> Deserialize<'de>>(body: &Bytes) -> ApiResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::bad_request(format!("invalid body: {}", e)))
}

async fn retry_draft(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<DraftSummary>> {
    let body: RetryBody = parse_body(&body)?;
    let feedback = body
        .feedback
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty());
    let record = state.orchestrator().regenerate(&id, feedback).await?;
    Ok(Json(DraftSummary::from(&record)))
}

#[derive(Debug, Default, Deserialize)]
struct GenerateBody {
    #[serde(default)]
    accounts: Vec<String>,
    count: Option<usize>,
    #[serde(default)]
    no_video: bool,
    asset_type: Option<AssetType>,
}

async fn start_generation(
    State(state): State<ApiState>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let body: GenerateBody = parse_body(&body)?;
    if body.count == Some(0) {
        return Err(ApiError::bad_request("count must be at least 1"));
    }
    let request = BatchRequest {
        accounts: body.accounts,
        count: body.count,
        no_video: body.no_video,
        asset_type: body.asset_type,
        date: None,
    };
    state.orchestrator().check(&request)?;

    let job_id = state.jobs().create(request.clone());
    spawn_batch(state, job_id.clone(), request);
    Ok((
        StatusCode::ACCEPTED,
        Json(json!({"success": true, "job_id": job_id})),
    ))
}

fn spawn_batch(state: ApiState, job_id: String, request: BatchRequest) {
    tokio::spawn(async move {
        let jobs = state.jobs().clone();
        jobs.start(&job_id);
        let reporter = {
            let jobs = jobs.clone();
            let job_id = job_id.clone();
            move |progress: Progress| {
                LogProgress.report(progress.clone());
                jobs.progress(&job_id, progress);
            }
        };
        match state.orchestrator().run(&request, &reporter).await {
            Ok(report) => {
                info!(job_id = %job_id, created = report.created().len(), "Job finished");
                jobs.finish(&job_id, report);
            }
            Err(e) => {
                error!(job_id = %job_id, error = %e, "Job failed");
                jobs.fail(&job_id, ApiError::from(e).message().to_string());
            }
        }
    });
}

#[derive(Debug, Deserialize)]
struct StatusQuery {
    job_id: Option<String>,
}

async fn generation_status(
    State(state): State<ApiState>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<impl IntoResponse> {
    let job_id = query
        .job_id
        .ok_or_else(|| ApiError::bad_request("job_id is required"))?;
    job_response(&state, &job_id)
}

async fn get_job(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    job_response(&state, &id)
}

fn job_response(state: &ApiState, job_id: &str) -> ApiResult<impl IntoResponse + use<>> {
    let job = state
        .jobs()
        .get(job_id)
        .ok_or_else(|| ApiError::job_not_found(job_id))?;
    Ok(Json(job))
}
