//! Reelcast CLI binary.
//!
//! This binary provides command-line access to Reelcast's functionality:
//! - Verify credentials, configuration and tools
//! - Generate draft batches
//! - Review, approve and publish drafts
//! - Run the review service

use clap::Parser;
use reelcast::{LoggingConfig, Reelcast, init_logging};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{
        Cli, Commands, approve_draft, list_drafts, publish_draft, run_generate, run_server,
        run_verify,
    };

    // Missing .env is fine; credentials may come from the environment
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(&LoggingConfig::new(cli.verbose).with_json(cli.log_json))?;

    let app = Reelcast::from_env()?;

    match cli.command {
        Commands::Verify => {
            if !run_verify(&app).await.is_ok() {
                std::process::exit(1);
            }
        }

        Commands::Generate {
            accounts,
            count,
            no_video,
            asset_type,
        } => {
            let report = run_generate(&app, accounts, count, no_video, asset_type).await?;
            if report.created().is_empty() && !report.outcomes.is_empty() {
                std::process::exit(1);
            }
        }

        Commands::Serve { generate, bind } => {
            run_server(&app, generate, bind).await?;
        }

        Commands::List { status, format } => {
            list_drafts(&app, &status, format).await?;
        }

        Commands::Approve { id } => {
            approve_draft(&app, &id).await?;
        }

        Commands::Publish { id } => {
            publish_draft(&app, &id).await?;
        }
    }

    Ok(())
}
