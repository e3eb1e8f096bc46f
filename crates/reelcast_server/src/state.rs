//! Shared state handed to every handler.

use crate::JobTable;
use reelcast_pipeline::BatchOrchestrator;
use reelcast_publish::Publisher;
use reelcast_storage::DraftStore;
use std::sync::Arc;

/// Handles the review service needs; cheap to clone.
#[derive(Clone)]
pub struct ApiState {
    orchestrator: Arc<BatchOrchestrator>,
    publisher: Arc<Publisher>,
    jobs: JobTable,
}

impl ApiState {
    /// Create state with an empty job table.
    pub fn new(orchestrator: Arc<BatchOrchestrator>, publisher: Arc<Publisher>) -> Self {
        Self {
            orchestrator,
            publisher,
            jobs: JobTable::new(),
        }
    }

    /// Draft store shared with the orchestrator.
    pub fn store(&self) -> &Arc<DraftStore> {
        self.orchestrator.store()
    }

    /// Batch orchestrator.
    pub fn orchestrator(&self) -> &Arc<BatchOrchestrator> {
        &self.orchestrator
    }

    /// Publisher.
    pub fn publisher(&self) -> &Arc<Publisher> {
        &self.publisher
    }

    /// Generation jobs.
    pub fn jobs(&self) -> &JobTable {
        &self.jobs
    }
}
