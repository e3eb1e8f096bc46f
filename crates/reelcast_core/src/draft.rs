//! Drafts: generated copy plus media, pending review.

use crate::{AssetSpec, AssetType, DraftId, DraftStatus, MediaFile, MediaKind, Platform};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Metadata document of a draft (`content.json`).
///
/// # Examples
///
/// ```
/// use reelcast_core::{AssetSpec, DraftBuilder, DraftStatus, Platform};
///
/// let draft = DraftBuilder::default()
///     .account("genz")
///     .platform(Platform::Tiktok)
///     .caption("POV: your Webkinz still needs feeding")
///     .hashtags("#nostalgia #2000s")
///     .hook("Remember this?")
///     .asset(AssetSpec::Video {
///         video_prompt: "cozy 2000s bedroom".to_string(),
///         voiceover_text: "Remember this?".to_string(),
///         music_style: "upbeat 2000s pop".to_string(),
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(*draft.status(), DraftStatus::Generated);
/// let json = serde_json::to_value(&draft).unwrap();
/// assert_eq!(json["asset_type"], "video");
/// assert_eq!(json["music_style"], "upbeat 2000s pop");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct Draft {
    /// Account (persona) the draft was written for
    account: String,
    /// Target platform
    platform: Platform,
    /// Post caption
    caption: String,
    /// Hashtags, space separated
    hashtags: String,
    /// Opening hook
    hook: String,
    /// Asset type with its prompts
    #[serde(flatten)]
    asset: AssetSpec,
    /// Asset library key, when media comes from the library
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    asset_key: Option<String>,
    /// Review status
    #[serde(default)]
    #[builder(default)]
    status: DraftStatus,
    /// Creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    created_at: Option<DateTime<Utc>>,
}

impl Draft {
    /// Asset type of this draft.
    pub fn asset_type(&self) -> AssetType {
        self.asset.asset_type()
    }

    /// Text posted with the media: caption and hashtags.
    pub fn post_text(&self) -> String {
        format!("{}\n\n{}", self.caption, self.hashtags)
            .trim()
            .to_string()
    }

    /// Update the review status.
    pub fn set_status(&mut self, status: DraftStatus) {
        self.status = status;
    }

    /// Stamp the creation time.
    pub fn set_created_at(&mut self, created_at: DateTime<Utc>) {
        self.created_at = Some(created_at);
    }
}

/// Completeness of a draft directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "lowercase")]
pub enum DraftHealth {
    /// Metadata parsed and media present
    Complete,
    /// Something is missing; the draft counts as failed
    Incomplete(String),
}

/// A draft directory as read back from the store.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct DraftRecord {
    /// Directory name
    id: DraftId,
    /// Parsed metadata, if readable
    draft: Option<Draft>,
    /// Media file, if present
    media: Option<MediaFile>,
    /// Completeness
    health: DraftHealth,
}

impl DraftRecord {
    /// Assemble a record and classify its health.
    ///
    /// A record is complete only when metadata parsed and a media file of the
    /// matching kind (video for video drafts, image for image drafts) exists.
    pub fn new(id: DraftId, draft: Option<Draft>, media: Option<MediaFile>) -> Self {
        let health = match (&draft, &media) {
            (None, _) => DraftHealth::Incomplete("metadata missing or unreadable".to_string()),
            (Some(_), None) => DraftHealth::Incomplete("media missing".to_string()),
            (Some(d), Some(m)) if m.kind.is_video() != (d.asset_type() == AssetType::Video) => {
                DraftHealth::Incomplete(format!(
                    "{} draft has {} media",
                    d.asset_type(),
                    m.kind.mime_type()
                ))
            }
            (Some(_), Some(m)) if m.size_bytes == 0 => {
                DraftHealth::Incomplete("media file is empty".to_string())
            }
            _ => DraftHealth::Complete,
        };
        Self {
            id,
            draft,
            media,
            health,
        }
    }

    /// A record whose directory could not be inspected.
    pub fn unreadable(id: DraftId, draft: Option<Draft>, reason: impl Into<String>) -> Self {
        Self {
            id,
            draft,
            media: None,
            health: DraftHealth::Incomplete(reason.into()),
        }
    }

    /// Whether metadata and media are both present.
    pub fn is_complete(&self) -> bool {
        self.health == DraftHealth::Complete
    }

    /// Status shown to reviewers: incomplete drafts are always `failed`.
    pub fn effective_status(&self) -> DraftStatus {
        match (&self.health, &self.draft) {
            (DraftHealth::Complete, Some(d)) => *d.status(),
            _ => DraftStatus::Failed,
        }
    }
}

/// Flat view of a draft for listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSummary {
    /// Draft id
    pub id: String,
    /// Account name
    pub account: String,
    /// Platform, when metadata is readable
    pub platform: Option<Platform>,
    /// Caption
    pub caption: String,
    /// Hashtags
    pub hashtags: String,
    /// Hook
    pub hook: String,
    /// Asset type, when metadata is readable
    pub asset_type: Option<AssetType>,
    /// Effective status
    pub status: DraftStatus,
    /// Whether a media file exists
    pub has_media: bool,
    /// Media kind
    pub media_type: Option<MediaKind>,
    /// Why the draft is counted as failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl From<&DraftRecord> for DraftSummary {
    fn from(record: &DraftRecord) -> Self {
        let draft = record.draft.as_ref();
        Self {
            id: record.id.to_string(),
            account: draft
                .map(|d| d.account().clone())
                .unwrap_or_else(|| record.id.account().to_string()),
            platform: draft.map(|d| *d.platform()),
            caption: draft.map(|d| d.caption().clone()).unwrap_or_default(),
            hashtags: draft.map(|d| d.hashtags().clone()).unwrap_or_default(),
            hook: draft.map(|d| d.hook().clone()).unwrap_or_default(),
            asset_type: draft.map(|d| d.asset_type()),
            status: record.effective_status(),
            has_media: record.media.is_some(),
            media_type: record.media.as_ref().map(|m| m.kind),
            failure_reason: match &record.health {
                DraftHealth::Complete => None,
                DraftHealth::Incomplete(reason) => Some(reason.clone()),
            },
        }
    }
}
