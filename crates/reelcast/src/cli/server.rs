//! `serve` command handler.

use reelcast::{BatchRequest, LogProgress, Reelcast, ReelcastResult, serve};
use tracing::{info, warn};

/// Optionally run a default batch, then serve the review API.
pub async fn run_server(app: &Reelcast, generate: bool, bind: Option<String>) -> ReelcastResult<()> {
    let state = app.api_state()?;

    if generate {
        info!("Generating a batch before serving");
        let report = state
            .orchestrator()
            .run(&BatchRequest::default(), &LogProgress)
            .await?;
        if !report.failures().is_empty() {
            warn!(failed = report.failures().len(), "Some drafts failed");
        }
    }

    let bind = bind.unwrap_or_else(|| app.config().server.bind.clone());
    println!("Review service on http://{}  (Ctrl+C to stop)", bind);
    serve(state, &bind).await
}
