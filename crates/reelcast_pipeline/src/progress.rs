//! Batch progress reporting.

use serde::Serialize;
use tracing::info;

/// Stage a batch is in when it reports progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProgressStep {
    /// Generating captions and prompts
    Copy,
    /// Generating or encoding media
    Media,
    /// Writing the draft directory
    Store,
    /// The batch finished
    Done,
}

/// A single progress update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    /// Current stage
    pub step: ProgressStep,
    /// Human-readable detail
    pub message: String,
    /// Completed share of the batch in `0.0..=1.0`
    pub fraction: f32,
}

/// Receives progress updates from a running batch.
pub trait ProgressReporter: Send + Sync {
    /// Handle one update.
    fn report(&self, progress: Progress);
}

impl<F> ProgressReporter for F
where
    F: Fn(Progress) + Send + Sync,
{
    fn report(&self, progress: Progress) {
        self(progress)
    }
}

/// Reporter that writes updates to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, progress: Progress) {
        info!(
            step = %progress.step,
            percent = (progress.fraction * 100.0).round() as u32,
            "{}",
            progress.message
        );
    }
}
