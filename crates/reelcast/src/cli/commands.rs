//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use reelcast::AssetType;

/// Reelcast - generate, review and publish persona-driven short-form drafts
#[derive(Parser, Debug)]
#[command(name = "reelcast")]
#[command(about = "Generate, review and publish persona-driven short-form drafts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check credentials, configuration files and ffmpeg without changing anything
    Verify,

    /// Generate a batch of drafts
    Generate {
        /// Accounts to generate for (default: pipeline.default_accounts)
        #[arg(long, num_args = 1..)]
        accounts: Vec<String>,

        /// Drafts per account (default: pipeline.default_count)
        #[arg(long)]
        count: Option<usize>,

        /// Skip media for video drafts
        #[arg(long)]
        no_video: bool,

        /// Asset type for every draft instead of each persona's default
        #[arg(long, value_parser = parse_asset_type)]
        asset_type: Option<AssetType>,
    },

    /// Run the review service
    Serve {
        /// Generate a batch with the default accounts before serving
        #[arg(long)]
        generate: bool,

        /// Listen address (default: server.bind)
        #[arg(long)]
        bind: Option<String>,
    },

    /// List drafts
    List {
        /// Status filter, or "all"
        #[arg(long, default_value = "generated")]
        status: String,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Approve a generated draft
    Approve {
        /// Draft id, e.g. 2024-01-01-genz-1
        id: String,
    },

    /// Publish an approved draft
    Publish {
        /// Draft id, e.g. 2024-01-01-genz-1
        id: String,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

fn parse_asset_type(raw: &str) -> Result<AssetType, String> {
    raw.parse()
        .map_err(|_| format!("unknown asset type '{}' (video or image)", raw))
}
