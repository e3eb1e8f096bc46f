//! In-memory table of generation jobs.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use reelcast_pipeline::{BatchReport, BatchRequest, Progress, ProgressStep};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Lifecycle of a job. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted, not started
    Pending,
    /// Batch in progress
    Running,
    /// Batch finished; see the report for per-draft results
    Done,
    /// Batch aborted
    Error,
}

impl JobStatus {
    /// Whether the status can no longer change.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }
}

/// A generation job as returned by the status endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    /// Job id
    pub job_id: String,
    /// Current status
    pub status: JobStatus,
    /// Parameters the batch was started with
    pub request: BatchRequest,
    /// Last reported stage
    pub step: Option<ProgressStep>,
    /// Last progress message
    pub message: String,
    /// Completion in percent
    pub progress: u8,
    /// Batch report, once done
    pub report: Option<BatchReport>,
    /// Why the batch aborted
    pub error: Option<String>,
    /// When the job was accepted
    pub created_at: DateTime<Utc>,
    /// When the job reached a terminal status
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    fn advance(&mut self, next: JobStatus) -> bool {
        if self.status.is_terminal() || next <= self.status {
            warn!(job_id = %self.job_id, from = ?self.status, to = ?next, "Ignored job status change");
            return false;
        }
        self.status = next;
        if next.is_terminal() {
            self.finished_at = Some(Utc::now());
        }
        true
    }
}

/// Shared job table; each job is written only by the task running it.
#[derive(Debug, Clone, Default)]
pub struct JobTable {
    jobs: Arc<RwLock<HashMap<String, Job>>>,
}

impl JobTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pending job and return its id.
    pub fn create(&self, request: BatchRequest) -> String {
        let job_id = Uuid::new_v4().to_string();
        let job = Job {
            job_id: job_id.clone(),
            status: JobStatus::Pending,
            request,
            step: None,
            message: "Queued".to_string(),
            progress: 0,
            report: None,
            error: None,
            created_at: Utc::now(),
            finished_at: None,
        };
        self.jobs.write().insert(job_id.clone(), job);
        debug!(job_id = %job_id, "Created job");
        job_id
    }

    /// Snapshot of a job.
    pub fn get(&self, job_id: &str) -> Option<Job> {
        self.jobs.read().get(job_id).cloned()
    }

    /// Number of jobs held.
    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    /// Whether no job was ever created.
    pub fn is_empty(&self) -> bool {
        self.jobs.read().is_empty()
    }

    /// pending → running.
    pub fn start(&self, job_id: &str) -> bool {
        self.with_job(job_id, |job| {
            let moved = job.advance(JobStatus::Running);
            if moved {
                job.message = "Starting".to_string();
            }
            moved
        })
    }

    /// Record progress of a running job.
    pub fn progress(&self, job_id: &str, progress: Progress) {
        self.with_job(job_id, |job| {
            if job.status != JobStatus::Running {
                return false;
            }
            job.step = Some(progress.step);
            job.message = progress.message;
            job.progress = (progress.fraction.clamp(0.0, 1.0) * 100.0).round() as u8;
            true
        });
    }

    /// running → done.
    pub fn finish(&self, job_id: &str, report: BatchReport) -> bool {
        self.with_job(job_id, |job| {
            let moved = job.advance(JobStatus::Done);
            if moved {
                job.message = format!(
                    "{} of {} drafts created",
                    report.created().len(),
                    report.outcomes.len()
                );
                job.progress = 100;
                job.report = Some(report);
            }
            moved
        })
    }

    /// pending or running → error.
    pub fn fail(&self, job_id: &str, error: String) -> bool {
        self.with_job(job_id, |job| {
            let moved = job.advance(JobStatus::Error);
            if moved {
                job.message = "Failed".to_string();
                job.error = Some(error);
            }
            moved
        })
    }

    fn with_job(&self, job_id: &str, f: impl FnOnce(&mut Job) -> bool) -> bool {
        match self.jobs.write().get_mut(job_id) {
            Some(job) => f(job),
            None => false,
        }
    }
}
