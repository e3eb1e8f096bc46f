//! Publishing of approved drafts.

use bytes::Bytes;
use reelcast_config::AccountMap;
use reelcast_core::{DraftStatus, Platform};
use reelcast_error::{PublishError, PublishErrorKind, ReelcastResult, StorageError, StorageErrorKind};
use reelcast_interface::{PostMedia, PostRequest, PostTarget, PublishingApi};
use reelcast_storage::DraftStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// What a successful publish produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishReceipt {
    /// Draft id
    pub draft_id: String,
    /// Post id assigned by the API, when returned
    pub post_id: Option<String>,
    /// Platforms posted to
    pub platforms: Vec<Platform>,
    /// Public URL of the uploaded media
    pub media_url: String,
}

/// Publishes approved drafts through a [`PublishingApi`].
///
/// Checks run in order: draft state, media, account profiles, API key. Only
/// then is anything sent. A draft that fails to publish keeps its status.
///
/// The draft is held through [`DraftStore::lock_draft`] from the status check
/// until it is marked published, so concurrent calls for one draft post once.
pub struct Publisher {
    store: Arc<DraftStore>,
    accounts: AccountMap,
    api: Option<Arc<dyn PublishingApi>>,
    cross_post: bool,
}

impl Publisher {
    /// Create a publisher. `api` is `None` when no API key is configured.
    pub fn new(
        store: Arc<DraftStore>,
        accounts: AccountMap,
        api: Option<Arc<dyn PublishingApi>>,
        cross_post: bool,
    ) -> Self {
        Self {
            store,
            accounts,
            api,
            cross_post,
        }
    }

    /// Publish one approved draft.
    #[instrument(skip(self))]
    pub async fn publish(&self, id: &str) -> ReelcastResult<PublishReceipt> {
        let guard = self.store.lock_draft(id).await?;
        let record = self.store.get(id).await?;
        let draft = record.draft().as_ref().ok_or_else(|| {
            StorageError::new(StorageErrorKind::Metadata(format!(
                "{} has no readable metadata",
                id
            )))
        })?;

        match draft.status() {
            DraftStatus::Published => {
                return Err(PublishError::new(PublishErrorKind::AlreadyPublished(id.to_string())).into());
            }
            DraftStatus::Approved => {}
            other => {
                return Err(PublishError::new(PublishErrorKind::NotApproved {
                    draft_id: id.to_string(),
                    status: other.to_string(),
                })
                .into());
            }
        }

        let media = match record.media() {
            Some(media) if record.is_complete() => media.clone(),
            _ => {
                return Err(PublishError::new(PublishErrorKind::MediaMissing(id.to_string())).into());
            }
        };

        let account = draft.account();
        let profiles = self.accounts.get(account).ok_or_else(|| {
            PublishError::new(PublishErrorKind::UnknownAccount(account.clone()))
        })?;
        let targets: Vec<PostTarget> = if self.cross_post {
            profiles
                .configured_platforms()
                .into_iter()
                .filter_map(|platform| {
                    profiles.profile_for(platform).map(|id| PostTarget {
                        platform,
                        account_id: id.to_string(),
                    })
                })
                .collect()
        } else {
            profiles
                .profile_for(*draft.platform())
                .map(|id| PostTarget {
                    platform: *draft.platform(),
                    account_id: id.to_string(),
                })
                .into_iter()
                .collect()
        };
        if targets.is_empty() {
            return Err(PublishError::new(PublishErrorKind::MissingProfile {
                account: account.clone(),
                platform: draft.platform().to_string(),
            })
            .into());
        }

        let api = self
            .api
            .as_ref()
            .ok_or_else(|| PublishError::new(PublishErrorKind::MissingApiKey))?;

        let data = tokio::fs::read(&media.path).await.map_err(|e| {
            warn!(error = %e, path = %media.path.display(), "Media unreadable");
            PublishError::new(PublishErrorKind::MediaMissing(id.to_string()))
        })?;
        let mime = media.kind.mime_type();
        let upload = api.presign(media.kind.file_name(), mime).await?;
        api.upload(&upload.upload_url, mime, Bytes::from(data)).await?;
        info!(public_url = %upload.public_url, "Media uploaded");

        let post = PostRequest {
            content: draft.post_text(),
            platforms: targets.clone(),
            media_items: vec![PostMedia::new(media.kind, upload.public_url.clone())],
            publish_now: true,
            timezone: "UTC".to_string(),
        };
        let receipt = api.create_post(&post).await?;

        if let Err(e) = self.store.set_status_held(&guard, DraftStatus::Published).await {
            error!(
                post_id = ?receipt.post_id,
                error = %e,
                "Post went out but the draft could not be marked published; do not publish it again"
            );
            return Err(e);
        }
        drop(guard);
        info!(post_id = ?receipt.post_id, targets = targets.len(), "Draft published");

        Ok(PublishReceipt {
            draft_id: id.to_string(),
            post_id: receipt.post_id,
            platforms: targets.into_iter().map(|t| t.platform).collect(),
            media_url: upload.public_url,
        })
    }
}
