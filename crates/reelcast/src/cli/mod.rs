//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the reelcast binary.

mod commands;
mod drafts;
mod generate;
mod server;
mod setup;

pub use commands::{Cli, Commands, OutputFormat};
pub use drafts::{approve_draft, list_drafts, publish_draft};
pub use generate::run_generate;
pub use server::run_server;
pub use setup::run_verify;
