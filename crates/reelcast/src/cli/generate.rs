//! `generate` command handler.

use reelcast::{AssetType, BatchReport, BatchRequest, DraftOutcome, LogProgress, Reelcast, ReelcastResult};
use tracing::info;

/// Generate a batch and print one line per draft.
pub async fn run_generate(
    app: &Reelcast,
    accounts: Vec<String>,
    count: Option<usize>,
    no_video: bool,
    asset_type: Option<AssetType>,
) -> ReelcastResult<BatchReport> {
    let store = app.open_store()?;
    let orchestrator = app.orchestrator(store)?;
    let request = BatchRequest {
        accounts,
        count,
        no_video,
        asset_type,
        date: None,
    };
    let report = orchestrator.run(&request, &LogProgress).await?;
    print_report(&report);
    info!(
        created = report.created().len(),
        failed = report.failures().len(),
        "Batch finished"
    );
    Ok(report)
}

fn print_report(report: &BatchReport) {
    println!("Batch {}:", report.date);
    for outcome in &report.outcomes {
        match outcome {
            DraftOutcome::Created {
                id,
                platform,
                asset_type,
                has_media,
                ..
            } => {
                let media = if *has_media { "" } else { " (no media)" };
                println!("  + {} [{} {}]{}", id, platform, asset_type, media);
            }
            DraftOutcome::Failed(f) => {
                println!("  - {} #{} failed at {}: {}", f.account, f.index + 1, f.stage, f.reason);
            }
        }
    }
    println!(
        "{} created, {} failed",
        report.created().len(),
        report.failures().len()
    );
}
