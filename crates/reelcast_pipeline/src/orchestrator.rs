//! Batch generation: copy, media and storage for every requested draft.

use crate::copy::CopyGenerator;
use crate::media::MediaBuilder;
use crate::progress::{Progress, ProgressReporter, ProgressStep};
use crate::prompt::CopyRequest;
use chrono::NaiveDate;
use reelcast_config::{PersonaStore, PipelineConfig};
use reelcast_core::{AssetType, Draft, DraftRecord, DraftStatus, Persona, Platform};
use reelcast_error::{ReelcastResult, StorageError, StorageErrorKind};
use reelcast_storage::DraftStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// What a batch should produce.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, derive_builder::Builder)]
#[builder(setter(into), default)]
pub struct BatchRequest {
    /// Accounts to generate for; empty means the configured defaults
    pub accounts: Vec<String>,
    /// Drafts per account; `None` means the configured default
    pub count: Option<usize>,
    /// Skip media for video drafts
    pub no_video: bool,
    /// Asset type for every draft instead of each persona's default
    pub asset_type: Option<AssetType>,
    /// Date used in draft ids; today when `None`
    pub date: Option<NaiveDate>,
}

/// Pipeline stage a draft failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DraftStage {
    /// Persona or platform setup
    Config,
    /// Copy generation
    Copy,
    /// Media generation or encoding
    Media,
    /// Writing the draft directory
    Storage,
}

/// A draft that could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftFailure {
    /// Persona account
    pub account: String,
    /// Position of the draft within the account's batch
    pub index: usize,
    /// Where it failed
    pub stage: DraftStage,
    /// Error message
    pub reason: String,
}

/// Result of one draft slot of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum DraftOutcome {
    /// A draft directory was written
    Created {
        /// Draft id
        id: String,
        /// Persona account
        account: String,
        /// Target platform
        platform: Platform,
        /// Asset type
        asset_type: AssetType,
        /// Whether media was produced
        has_media: bool,
    },
    /// The draft failed; other drafts are unaffected
    Failed(DraftFailure),
}

/// Summary of a finished batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Date used in the draft ids
    pub date: NaiveDate,
    /// One entry per draft slot, in generation order
    pub outcomes: Vec<DraftOutcome>,
}

impl BatchReport {
    /// Ids of the drafts that were written.
    pub fn created(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                DraftOutcome::Created { id, .. } => Some(id.as_str()),
                DraftOutcome::Failed(_) => None,
            })
            .collect()
    }

    /// Drafts that failed.
    pub fn failures(&self) -> Vec<&DraftFailure> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                DraftOutcome::Failed(f) => Some(f),
                DraftOutcome::Created { .. } => None,
            })
            .collect()
    }
}

/// Runs batches and regenerations against the draft store.
pub struct BatchOrchestrator {
    personas: PersonaStore,
    copy: CopyGenerator,
    media: MediaBuilder,
    store: Arc<DraftStore>,
    config: PipelineConfig,
}

impl BatchOrchestrator {
    /// Wire up an orchestrator.
    pub fn new(
        personas: PersonaStore,
        copy: CopyGenerator,
        media: MediaBuilder,
        store: Arc<DraftStore>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            personas,
            copy,
            media,
            store,
            config,
        }
    }

    /// Draft store the orchestrator writes to.
    pub fn store(&self) -> &Arc<DraftStore> {
        &self.store
    }

    /// Known personas.
    pub fn personas(&self) -> &PersonaStore {
        &self.personas
    }

    /// Accounts a request targets, falling back to the configured defaults.
    pub fn accounts_for(&self, request: &BatchRequest) -> Vec<String> {
        if request.accounts.is_empty() {
            self.config.default_accounts.clone()
        } else {
            request.accounts.clone()
        }
    }

    /// Fail fast on unknown accounts without generating anything.
    pub fn check(&self, request: &BatchRequest) -> ReelcastResult<()> {
        self.personas.resolve(&self.accounts_for(request))?;
        Ok(())
    }

    /// Generate a batch of drafts.
    ///
    /// Unknown accounts abort the batch before any generation call. After
    /// that, every draft succeeds or fails on its own and the report lists
    /// each outcome.
    #[instrument(skip(self, request, progress), fields(accounts = ?request.accounts, count = ?request.count))]
    pub async fn run(
        &self,
        request: &BatchRequest,
        progress: &dyn ProgressReporter,
    ) -> ReelcastResult<BatchReport> {
        let personas = self.personas.resolve(&self.accounts_for(request))?;
        let count = request.count.unwrap_or(self.config.default_count);
        let date = request
            .date
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        let total = (personas.len() * count).max(1);
        info!(drafts = personas.len() * count, %date, "Starting batch");

        let mut outcomes = Vec::with_capacity(personas.len() * count);
        for persona in &personas {
            for index in 0..count {
                let slot = SlotContext {
                    persona,
                    index,
                    done: outcomes.len(),
                    total,
                };
                let outcome = self.run_slot(&slot, request, date, progress).await;
                match &outcome {
                    DraftOutcome::Created { id, .. } => info!(draft_id = %id, "Draft created"),
                    DraftOutcome::Failed(f) => {
                        error!(account = %f.account, index = f.index, stage = %f.stage, reason = %f.reason, "Draft failed")
                    }
                }
                outcomes.push(outcome);
            }
        }

        let report = BatchReport { date, outcomes };
        let created = report.created().len();
        progress.report(Progress {
            step: ProgressStep::Done,
            message: format!(
                "{} of {} drafts created",
                created,
                report.outcomes.len()
            ),
            fraction: 1.0,
        });
        info!(created, failed = report.outcomes.len() - created, "Batch finished");
        Ok(report)
    }

    async fn run_slot(
        &self,
        slot: &SlotContext<'_>,
        request: &BatchRequest,
        date: NaiveDate,
        progress: &dyn ProgressReporter,
    ) -> DraftOutcome {
        let attempts = self.config.draft_attempts.max(1);
        let mut last = None;
        for attempt in 1..=attempts {
            match self.attempt(slot, request, date, progress).await {
                Ok(outcome) => return outcome,
                Err(failure) => {
                    if attempt < attempts {
                        warn!(attempt, attempts, reason = %failure.reason, "Draft attempt failed, retrying");
                    }
                    let config_failure = failure.stage == DraftStage::Config;
                    last = Some(failure);
                    if config_failure {
                        break;
                    }
                }
            }
        }
        DraftOutcome::Failed(last.unwrap_or_else(|| DraftFailure {
            account: slot.persona.account().clone(),
            index: slot.index,
            stage: DraftStage::Config,
            reason: "no attempt was made".to_string(),
        }))
    }

    async fn attempt(
        &self,
        slot: &SlotContext<'_>,
        request: &BatchRequest,
        date: NaiveDate,
        progress: &dyn ProgressReporter,
    ) -> Result<DraftOutcome, DraftFailure> {
        let persona = slot.persona;
        let fail = |stage: DraftStage, reason: String| DraftFailure {
            account: persona.account().clone(),
            index: slot.index,
            stage,
            reason,
        };

        let platform = persona.platform_for(slot.index).ok_or_else(|| {
            fail(
                DraftStage::Config,
                format!("persona '{}' lists no platforms", persona.account()),
            )
        })?;
        let asset_type = request.asset_type.unwrap_or(*persona.asset_type());
        let asset_keys = self.media.asset_keys();

        slot.report(progress, ProgressStep::Copy, "Generating copy");
        let copy_request = CopyRequest {
            persona,
            platform,
            asset_type,
            asset_keys: &asset_keys,
            previous: None,
            feedback: None,
        };
        let draft = self
            .copy
            .generate(&copy_request)
            .await
            .map_err(|e| fail(DraftStage::Copy, e.to_string()))?;

        let staged = self
            .store
            .stage()
            .await
            .map_err(|e| fail(DraftStage::Storage, e.to_string()))?;

        let skip_media = request.no_video && asset_type == AssetType::Video;
        if !skip_media {
            slot.report(progress, ProgressStep::Media, "Building media");
            if let Err(e) = self.media.build(&draft, &staged).await {
                self.store.discard(staged).await;
                return Err(fail(DraftStage::Media, e.to_string()));
            }
        }

        slot.report(progress, ProgressStep::Store, "Saving draft");
        let committed = if skip_media {
            self.store.commit_without_media(staged, &draft, date).await
        } else {
            self.store.commit(staged, &draft, date).await
        };
        let id = committed.map_err(|e| fail(DraftStage::Storage, e.to_string()))?;

        Ok(DraftOutcome::Created {
            id: id.to_string(),
            account: persona.account().clone(),
            platform,
            asset_type,
            has_media: !skip_media,
        })
    }

    /// Regenerate copy and media of an existing draft with reviewer feedback.
    ///
    /// The draft keeps its id and returns to `generated`. Published drafts
    /// cannot be regenerated.
    #[instrument(skip(self, feedback))]
    pub async fn regenerate(&self, id: &str, feedback: Option<&str>) -> ReelcastResult<DraftRecord> {
        let record = self.store.get(id).await?;
        let previous: &Draft = record.draft().as_ref().ok_or_else(|| {
            StorageError::new(StorageErrorKind::Metadata(format!(
                "{} has no readable metadata",
                id
            )))
        })?;
        if *previous.status() == DraftStatus::Published {
            return Err(StorageError::new(StorageErrorKind::InvalidTransition(format!(
                "{} is already published",
                id
            )))
            .into());
        }

        let persona = self.personas.get(previous.account())?;
        let asset_keys = self.media.asset_keys();
        let request = CopyRequest {
            persona,
            platform: *previous.platform(),
            asset_type: previous.asset_type(),
            asset_keys: &asset_keys,
            previous: Some(previous),
            feedback: feedback.filter(|f| !f.trim().is_empty()),
        };
        let draft = self.copy.generate(&request).await?;

        let staged = self.store.stage().await?;
        if let Err(e) = self.media.build(&draft, &staged).await {
            self.store.discard(staged).await;
            return Err(e);
        }
        self.store.replace(id, staged, &draft).await
    }
}

struct SlotContext<'a> {
    persona: &'a Persona,
    index: usize,
    done: usize,
    total: usize,
}

impl SlotContext<'_> {
    fn report(&self, progress: &dyn ProgressReporter, step: ProgressStep, what: &str) {
        let offset = match step {
            ProgressStep::Copy => 0.0,
            ProgressStep::Media => 0.34,
            ProgressStep::Store | ProgressStep::Done => 0.67,
        };
        progress.report(Progress {
            step,
            message: format!(
                "{} for {} ({}/{})",
                what,
                self.persona.account(),
                self.done + 1,
                self.total
            ),
            fraction: ((self.done as f32 + offset) / self.total as f32).min(1.0),
        });
    }
}
