//! Asset types and the prompts that go with them.

use serde::{Deserialize, Serialize};

/// Whether a draft's media is a video or a still image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    /// Short vertical video with narration and music
    #[default]
    Video,
    /// Single still image
    Image,
}

impl AssetType {
    /// Convert to string representation used in metadata documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Video => "video",
            AssetType::Image => "image",
        }
    }
}

impl std::str::FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(AssetType::Video),
            "image" => Ok(AssetType::Image),
            _ => Err(format!("Unknown asset type: {}", s)),
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Media prompts of a draft, shaped by its asset type.
///
/// Video drafts always carry narration and a music style; image drafts carry
/// only the visual prompt. Serialized flat into the metadata document with an
/// `asset_type` tag, so `video_prompt` is the key for both variants.
///
/// # Examples
///
/// ```
/// use reelcast_core::{AssetSpec, AssetType};
///
/// let spec = AssetSpec::Image {
///     video_prompt: "Tamagotchi on a school desk".to_string(),
/// };
/// assert_eq!(spec.asset_type(), AssetType::Image);
/// assert!(spec.voiceover_text().is_none());
///
/// let json = serde_json::to_value(&spec).unwrap();
/// assert_eq!(json["asset_type"], "image");
/// assert!(json.get("music_style").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "asset_type", rename_all = "lowercase")]
pub enum AssetSpec {
    /// Video draft
    Video {
        /// Visual scene description
        video_prompt: String,
        /// What the narrator says
        voiceover_text: String,
        /// Background music style
        music_style: String,
    },
    /// Image draft
    Image {
        /// Visual scene description
        video_prompt: String,
    },
}

impl AssetSpec {
    /// The asset type this spec describes.
    pub fn asset_type(&self) -> AssetType {
        match self {
            AssetSpec::Video { .. } => AssetType::Video,
            AssetSpec::Image { .. } => AssetType::Image,
        }
    }

    /// The visual prompt.
    pub fn visual_prompt(&self) -> &str {
        match self {
            AssetSpec::Video { video_prompt, .. } | AssetSpec::Image { video_prompt } => {
                video_prompt
            }
        }
    }

    /// Narration text, video only.
    pub fn voiceover_text(&self) -> Option<&str> {
        match self {
            AssetSpec::Video { voiceover_text, .. } => Some(voiceover_text),
            AssetSpec::Image { .. } => None,
        }
    }

    /// Music style, video only.
    pub fn music_style(&self) -> Option<&str> {
        match self {
            AssetSpec::Video { music_style, .. } => Some(music_style),
            AssetSpec::Image { .. } => None,
        }
    }
}
