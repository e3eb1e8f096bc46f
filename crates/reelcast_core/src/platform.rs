//! Target social platforms.

use serde::{Deserialize, Serialize};

/// A social platform a draft is written for.
///
/// # Examples
///
/// ```
/// use reelcast_core::Platform;
///
/// let platform: Platform = "TikTok".parse().unwrap();
/// assert_eq!(platform, Platform::Tiktok);
/// assert_eq!(platform.to_string(), "tiktok");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Platform {
    /// TikTok short video
    Tiktok,
    /// Instagram Reels
    #[serde(alias = "reels")]
    #[strum(to_string = "instagram", serialize = "reels")]
    Instagram,
}
