//! Draft review status.

use serde::{Deserialize, Serialize};

/// Review status of a draft.
///
/// Drafts move `generated → approved → published`. `failed` marks a draft that
/// could not be completed; the draft store also reports incomplete directories
/// as failed regardless of what their metadata says.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DraftStatus {
    /// Freshly generated, awaiting review
    #[default]
    #[serde(alias = "pending")]
    #[strum(to_string = "generated", serialize = "pending")]
    Generated,
    /// Approved by a reviewer
    Approved,
    /// Sent to the publishing API
    Published,
    /// Could not be completed
    Failed,
}

impl DraftStatus {
    /// Whether a reviewer action may move a draft from `self` to `next`.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelcast_core::DraftStatus;
    ///
    /// assert!(DraftStatus::Generated.can_transition_to(DraftStatus::Approved));
    /// assert!(!DraftStatus::Published.can_transition_to(DraftStatus::Approved));
    /// ```
    pub fn can_transition_to(self, next: DraftStatus) -> bool {
        matches!(
            (self, next),
            (DraftStatus::Generated, DraftStatus::Approved)
                | (DraftStatus::Approved, DraftStatus::Published)
                | (DraftStatus::Generated, DraftStatus::Failed)
                | (DraftStatus::Approved, DraftStatus::Failed)
        )
    }
}
