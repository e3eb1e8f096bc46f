//! Draft review command handlers.

use super::OutputFormat;
use reelcast::{ConfigError, DraftStatus, DraftSummary, JsonError, Reelcast, ReelcastResult};

fn parse_status(raw: &str) -> ReelcastResult<Option<DraftStatus>> {
    if raw.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    raw.parse().map(Some).map_err(|_| {
        ConfigError::new(format!(
            "unknown status '{}' (generated, approved, published, failed or all)",
            raw
        ))
        .into()
    })
}

/// List drafts with `status` ("all" for every draft).
pub async fn list_drafts(app: &Reelcast, status: &str, format: OutputFormat) -> ReelcastResult<()> {
    let store = app.open_store()?;
    let records = store.list(parse_status(status)?).await?;
    let summaries: Vec<DraftSummary> = records.iter().map(DraftSummary::from).collect();

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summaries)
                .map_err(|e| JsonError::new("draft list", e))?;
            println!("{}", json);
        }
        OutputFormat::Human => {
            println!("Drafts ({}):", status);
            println!("{:-<80}", "");
            for s in &summaries {
                let platform = s.platform.map(|p| p.to_string()).unwrap_or_default();
                println!("{:<28} {:<10} {:<10} {}", s.id, platform, s.status.as_ref(), s.hook);
                if let Some(reason) = &s.failure_reason {
                    println!("{:<28} {}", "", reason);
                }
            }
            println!("{:-<80}", "");
            println!("Total: {} drafts", summaries.len());
        }
    }
    Ok(())
}

/// Move a draft from generated to approved.
pub async fn approve_draft(app: &Reelcast, id: &str) -> ReelcastResult<()> {
    let store = app.open_store()?;
    store.set_status(id, DraftStatus::Approved).await?;
    println!("Approved {}", id);
    Ok(())
}

/// Publish an approved draft.
pub async fn publish_draft(app: &Reelcast, id: &str) -> ReelcastResult<()> {
    let publisher = app.publisher(app.open_store()?)?;
    let receipt = publisher.publish(id).await?;
    let platforms: Vec<String> = receipt.platforms.iter().map(|p| p.to_string()).collect();
    println!(
        "Published {} to {} (post {})",
        receipt.draft_id,
        platforms.join(", "),
        receipt.post_id.as_deref().unwrap_or("unknown")
    );
    Ok(())
}
