//! Draft directory tree.

use crate::fs_util::{exists, find_media, write_atomic};
use crate::staging::{STAGING_PREFIX, StagedDraft};
use crate::summary;
use chrono::{NaiveDate, Utc};
use reelcast_core::{Draft, DraftId, DraftRecord, DraftStatus, MediaFile};
use reelcast_error::{ReelcastResult, StorageError, StorageErrorKind};
use parking_lot::Mutex as SyncMutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Metadata document name inside a draft directory.
pub const CONTENT_FILE: &str = "content.json";
/// Human-readable summary inside a draft directory.
pub const SUMMARY_FILE: &str = "spec.md";
/// Directory holding raw generator output that could not be parsed.
pub const FAILED_DIR: &str = "failed";

/// Highest sequence number tried before giving up on a day.
const MAX_SEQUENCE: u32 = 9999;

/// Draft storage rooted at one directory.
///
/// Layout: `{root}/{YYYY-MM-DD}-{account}-{seq}/` holding `content.json`,
/// `spec.md` and one media file. Drafts are built in `.staging-<uuid>/` and
/// renamed into place, so a draft directory never exists half-written. Id
/// allocation is serialized by one async mutex; writes to an existing draft
/// are serialized per draft by [`DraftStore::lock_draft`].
#[derive(Debug)]
pub struct DraftStore {
    root: PathBuf,
    allocate: Mutex<()>,
    drafts: SyncMutex<HashMap<DraftId, Arc<Mutex<()>>>>,
}

/// Exclusive hold on one draft directory.
///
/// While a guard is alive no other status change or replacement of the same
/// draft can start. Dropping it releases the draft.
#[derive(Debug)]
pub struct DraftGuard {
    id: DraftId,
    _lock: OwnedMutexGuard<()>,
}

impl DraftGuard {
    /// Id of the held draft.
    pub fn id(&self) -> &DraftId {
        &self.id
    }
}

impl DraftStore {
    /// Open (and create if needed) a draft tree.
    #[instrument(skip(root))]
    pub fn new(root: impl Into<PathBuf>) -> ReelcastResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                root.display(),
                e
            )))
        })?;
        info!(path = %root.display(), "Opened draft store");
        Ok(Self {
            root,
            allocate: Mutex::new(()),
            drafts: SyncMutex::new(HashMap::new()),
        })
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check that `id` is a well-formed draft id before touching the filesystem.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelcast_storage::DraftStore;
    ///
    /// assert!(DraftStore::validate_id("2024-01-01-genz-1").is_ok());
    /// assert!(DraftStore::validate_id("../etc/passwd").is_err());
    /// ```
    pub fn validate_id(id: &str) -> Result<DraftId, StorageError> {
        let allowed = !id.is_empty()
            && !id.contains("..")
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !allowed {
            return Err(StorageError::new(StorageErrorKind::InvalidId(id.to_string())));
        }
        id.parse()
            .map_err(|_| StorageError::new(StorageErrorKind::InvalidId(id.to_string())))
    }

    fn draft_dir(&self, id: &DraftId) -> PathBuf {
        self.root.join(id.to_string())
    }

    /// Wait for exclusive access to one draft.
    ///
    /// Holders may read the draft and call [`DraftStore::set_status_held`];
    /// [`DraftStore::set_status`] and [`DraftStore::replace`] on the same id
    /// wait until the guard is dropped.
    pub async fn lock_draft(&self, id: &str) -> ReelcastResult<DraftGuard> {
        let id = Self::validate_id(id)?;
        let lock = {
            let mut drafts = self.drafts.lock();
            drafts.retain(|_, lock| Arc::strong_count(lock) > 1);
            drafts.entry(id.clone()).or_default().clone()
        };
        let guard = lock.lock_owned().await;
        Ok(DraftGuard { id, _lock: guard })
    }

    /// Create a private staging directory for a new draft.
    #[instrument(skip(self))]
    pub async fn stage(&self) -> ReelcastResult<StagedDraft> {
        let dir = self
            .root
            .join(format!("{}{}", STAGING_PREFIX, Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                dir.display(),
                e
            )))
        })?;
        debug!(path = %dir.display(), "Staged draft");
        Ok(StagedDraft::new(dir))
    }

    /// Remove a staging directory and everything in it.
    #[instrument(skip(self, staged), fields(path = %staged.path().display()))]
    pub async fn discard(&self, staged: StagedDraft) {
        if let Err(e) = tokio::fs::remove_dir_all(staged.path()).await {
            warn!(error = %e, "Failed to remove staging directory");
        }
    }

    /// Commit a staged draft that carries its media file.
    ///
    /// Writes metadata, verifies media, and renames the staging directory to
    /// the first free `{date}-{account}-{seq}`. On any failure the staging
    /// directory is removed and no draft directory is created.
    #[instrument(skip(self, staged, draft), fields(account = %draft.account()))]
    pub async fn commit(
        &self,
        staged: StagedDraft,
        draft: &Draft,
        date: NaiveDate,
    ) -> ReelcastResult<DraftId> {
        self.commit_inner(staged, draft, date, true).await
    }

    /// Commit a staged draft without media.
    ///
    /// Used when media generation is switched off. Such a draft is listed as
    /// failed (media missing) and cannot be published.
    #[instrument(skip(self, staged, draft), fields(account = %draft.account()))]
    pub async fn commit_without_media(
        &self,
        staged: StagedDraft,
        draft: &Draft,
        date: NaiveDate,
    ) -> ReelcastResult<DraftId> {
        self.commit_inner(staged, draft, date, false).await
    }

    async fn commit_inner(
        &self,
        staged: StagedDraft,
        draft: &Draft,
        date: NaiveDate,
        require_media: bool,
    ) -> ReelcastResult<DraftId> {
        let result = async {
            if require_media {
                let media = staged.require_media().await?;
                check_media_matches(draft, &media)?;
            }
            write_metadata(staged.path(), draft).await?;
            self.allocate_and_rename(staged.path(), draft.account(), date)
                .await
        }
        .await;

        match result {
            Ok(id) => {
                info!(draft_id = %id, "Committed draft");
                Ok(id)
            }
            Err(e) => {
                self.discard(staged).await;
                Err(e)
            }
        }
    }

    async fn allocate_and_rename(
        &self,
        staging: &Path,
        account: &str,
        date: NaiveDate,
    ) -> ReelcastResult<DraftId> {
        if !DraftId::is_valid_account(account) {
            return Err(StorageError::new(StorageErrorKind::InvalidId(account.to_string())).into());
        }

        let _guard = self.allocate.lock().await;
        let mut id = DraftId::new(date, account, 1);
        while id.sequence() <= MAX_SEQUENCE {
            let target = self.draft_dir(&id);
            if !exists(&target).await {
                tokio::fs::rename(staging, &target).await.map_err(|e| {
                    StorageError::new(StorageErrorKind::FileWrite(format!(
                        "rename {} to {}: {}",
                        staging.display(),
                        target.display(),
                        e
                    )))
                })?;
                return Ok(id);
            }
            id = id.next();
        }

        Err(StorageError::new(StorageErrorKind::IdsExhausted(format!(
            "{}-{}",
            date.format("%Y-%m-%d"),
            account
        )))
        .into())
    }

    /// Read one draft directory.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> ReelcastResult<DraftRecord> {
        let id = Self::validate_id(id)?;
        let dir = self.draft_dir(&id);
        if !tokio::fs::metadata(&dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            return Err(StorageError::new(StorageErrorKind::NotFound(id.to_string())).into());
        }
        Ok(self.read_record(id, &dir).await)
    }

    async fn read_record(&self, id: DraftId, dir: &Path) -> DraftRecord {
        let draft = match tokio::fs::read_to_string(dir.join(CONTENT_FILE)).await {
            Ok(text) => match serde_json::from_str::<Draft>(&text) {
                Ok(draft) => Some(draft),
                Err(e) => {
                    warn!(draft_id = %id, error = %e, "Unreadable draft metadata");
                    None
                }
            },
            Err(e) => {
                debug!(draft_id = %id, error = %e, "Draft metadata missing");
                None
            }
        };
        match find_media(dir).await {
            Ok(media) => DraftRecord::new(id, draft, media),
            Err(e) => {
                warn!(draft_id = %id, error = %e, "Draft media unreadable");
                DraftRecord::unreadable(id, draft, format!("media unreadable: {}", e))
            }
        }
    }

    /// List drafts, newest first, optionally keeping only one effective status.
    ///
    /// Directories with missing or unreadable media or metadata are included
    /// and reported with status `failed`.
    #[instrument(skip(self))]
    pub async fn list(&self, status: Option<DraftStatus>) -> ReelcastResult<Vec<DraftRecord>> {
        let mut entries = tokio::fs::read_dir(&self.root).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                self.root.display(),
                e
            )))
        })?;

        let mut records = Vec::new();
        loop {
            let entry = entries.next_entry().await.map_err(|e| {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    self.root.display(),
                    e
                )))
            })?;
            let Some(entry) = entry else { break };

            let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
            let name = entry.file_name().to_string_lossy().to_string();
            if !is_dir || name.starts_with('.') || name == FAILED_DIR {
                continue;
            }
            let Ok(id) = name.parse::<DraftId>() else {
                debug!(name = %name, "Skipping directory that is not a draft");
                continue;
            };

            let record = self.read_record(id, &entry.path()).await;
            if status.is_none_or(|s| record.effective_status() == s) {
                records.push(record);
            }
        }

        records.sort_by(|a, b| {
            let created = |r: &DraftRecord| r.draft().as_ref().and_then(|d| *d.created_at());
            b.id()
                .date()
                .cmp(&a.id().date())
                .then_with(|| created(b).cmp(&created(a)))
                .then_with(|| b.id().sequence().cmp(&a.id().sequence()))
                .then_with(|| a.id().account().cmp(b.id().account()))
        });
        debug!(count = records.len(), "Listed drafts");
        Ok(records)
    }

    /// Media file of a complete draft.
    pub async fn media(&self, id: &str) -> ReelcastResult<MediaFile> {
        let record = self.get(id).await?;
        record.media().clone().ok_or_else(|| {
            StorageError::new(StorageErrorKind::MediaMissing(id.to_string())).into()
        })
    }

    /// Path of a draft's media file.
    pub async fn media_path(&self, id: &str) -> ReelcastResult<PathBuf> {
        Ok(self.media(id).await?.path)
    }

    /// Move a draft to `status`, enforcing the review workflow.
    ///
    /// Only complete drafts change status, and only along
    /// [`DraftStatus::can_transition_to`].
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: &str, status: DraftStatus) -> ReelcastResult<Draft> {
        let guard = self.lock_draft(id).await?;
        self.set_status_held(&guard, status).await
    }

    /// [`DraftStore::set_status`] for a draft the caller already holds.
    #[instrument(skip(self, guard), fields(draft_id = %guard.id()))]
    pub async fn set_status_held(
        &self,
        guard: &DraftGuard,
        status: DraftStatus,
    ) -> ReelcastResult<Draft> {
        let id = guard.id().to_string();
        let record = self.get(&id).await?;

        let Some(mut draft) = record.draft().clone() else {
            return Err(StorageError::new(StorageErrorKind::Metadata(format!(
                "{} has no readable metadata",
                id
            )))
            .into());
        };
        if !record.is_complete() {
            return Err(StorageError::new(StorageErrorKind::MediaMissing(id.to_string())).into());
        }
        let current = *draft.status();
        if !current.can_transition_to(status) {
            return Err(StorageError::new(StorageErrorKind::InvalidTransition(format!(
                "{}: {} -> {}",
                id, current, status
            )))
            .into());
        }

        draft.set_status(status);
        write_metadata(&self.draft_dir(record.id()), &draft).await?;
        info!(draft_id = %id, from = %current, to = %status, "Updated draft status");
        Ok(draft)
    }

    /// Swap the content and media of an existing draft for a staged one.
    ///
    /// The replacement keeps the draft id and starts over as `generated`.
    /// The old directory is only deleted after the new one is in place.
    /// Published drafts are never replaced.
    #[instrument(skip(self, staged, draft))]
    pub async fn replace(
        &self,
        id: &str,
        staged: StagedDraft,
        draft: &Draft,
    ) -> ReelcastResult<DraftRecord> {
        let _guard = match self.lock_draft(id).await {
            Ok(guard) => guard,
            Err(e) => {
                self.discard(staged).await;
                return Err(e);
            }
        };
        let result = async {
            let record = self.get(id).await?;
            if record
                .draft()
                .as_ref()
                .is_some_and(|d| *d.status() == DraftStatus::Published)
            {
                return Err(StorageError::new(StorageErrorKind::InvalidTransition(format!(
                    "{} is already published",
                    id
                )))
                .into());
            }
            let media = staged.require_media().await?;
            check_media_matches(draft, &media)?;
            write_metadata(staged.path(), draft).await?;

            let target = self.draft_dir(record.id());
            let backup = self
                .root
                .join(format!("{}replaced-{}", STAGING_PREFIX, Uuid::new_v4()));
            rename(&target, &backup).await?;
            if let Err(e) = rename(staged.path(), &target).await {
                if let Err(restore) = rename(&backup, &target).await {
                    warn!(error = %restore, "Failed to restore replaced draft");
                }
                return Err(e);
            }
            if let Err(e) = tokio::fs::remove_dir_all(&backup).await {
                warn!(error = %e, path = %backup.display(), "Failed to remove replaced draft");
            }
            Ok(self.read_record(record.id().clone(), &target).await)
        }
        .await;

        match result {
            Ok(record) => {
                info!(draft_id = %id, "Replaced draft");
                Ok(record)
            }
            Err(e) => {
                if exists(staged.path()).await {
                    self.discard(staged).await;
                }
                Err(e)
            }
        }
    }

    /// Save raw generator output that could not be parsed.
    ///
    /// Written to `failed/{YYYYMMDD-HHMMSS}-{account}.txt`; returns the path.
    #[instrument(skip(self, raw), fields(len = raw.len()))]
    pub async fn record_failed_output(&self, account: &str, raw: &str) -> ReelcastResult<PathBuf> {
        let dir = self.root.join(FAILED_DIR);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                dir.display(),
                e
            )))
        })?;

        let account: String = account
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        let stamp = Utc::now().format("%Y%m%d-%H%M%S");
        let mut path = dir.join(format!("{}-{}.txt", stamp, account));
        let mut n = 2;
        while exists(&path).await {
            path = dir.join(format!("{}-{}-{}.txt", stamp, account, n));
            n += 1;
        }

        write_atomic(&path, raw.as_bytes()).await?;
        warn!(path = %path.display(), "Saved unparseable generator output");
        Ok(path)
    }
}

fn check_media_matches(draft: &Draft, media: &MediaFile) -> Result<(), StorageError> {
    let wants_video = draft.asset_type() == reelcast_core::AssetType::Video;
    if media.kind.is_video() != wants_video || media.size_bytes == 0 {
        return Err(StorageError::new(StorageErrorKind::MediaMissing(format!(
            "{} draft needs {} media, found {} ({} bytes)",
            draft.asset_type(),
            draft.asset_type(),
            media.kind.file_name(),
            media.size_bytes
        ))));
    }
    Ok(())
}

async fn write_metadata(dir: &Path, draft: &Draft) -> ReelcastResult<()> {
    let json = serde_json::to_string_pretty(draft)
        .map_err(|e| StorageError::new(StorageErrorKind::Metadata(e.to_string())))?;
    write_atomic(&dir.join(CONTENT_FILE), json.as_bytes()).await?;
    write_atomic(&dir.join(SUMMARY_FILE), summary::render(draft).as_bytes()).await?;
    Ok(())
}

async fn rename(from: &Path, to: &Path) -> ReelcastResult<()> {
    tokio::fs::rename(from, to).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "rename {} to {}: {}",
            from.display(),
            to.display(),
            e
        )))
        .into()
    })
}
