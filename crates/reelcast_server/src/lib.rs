//! HTTP review service for Reelcast drafts.
//!
//! Lists drafts, serves their media, approves and publishes them, and runs
//! generation batches as background jobs that clients poll by id.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod jobs;
mod routes;
mod state;

pub use error::ApiError;
pub use jobs::{Job, JobStatus, JobTable};
pub use routes::create_router;
pub use state::ApiState;

use reelcast_error::{ReelcastResult, ServerError, ServerErrorKind};
use tracing::info;

/// Bind `addr` and serve the review API until the process exits.
pub async fn serve(state: ApiState, addr: &str) -> ReelcastResult<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::new(ServerErrorKind::Bind(format!("{}: {}", addr, e))))?;
    let local = listener
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| addr.to_string());
    info!(addr = %local, "Review service listening");
    axum::serve(listener, create_router(state))
        .await
        .map_err(|e| ServerError::new(ServerErrorKind::Serve(e.to_string())))?;
    Ok(())
}
