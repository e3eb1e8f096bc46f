//! Audience personas that condition generated copy.

use crate::{AssetType, Platform};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A target audience: its voice and the platforms it is published to.
///
/// Personas are loaded once at startup from `personas/{account}.toml` and
/// never change while the process runs.
///
/// # Examples
///
/// ```
/// use reelcast_core::{Persona, PersonaBuilder, Platform};
///
/// let persona: Persona = PersonaBuilder::default()
///     .account("genz")
///     .tone("ironic, fast, meme-literate")
///     .vocabulary(vec!["no cap".to_string(), "core memory".to_string()])
///     .platforms(vec![Platform::Tiktok])
///     .build()
///     .unwrap();
///
/// assert_eq!(persona.account(), "genz");
/// assert_eq!(persona.platform_for(3), Some(Platform::Tiktok));
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
pub struct Persona {
    /// Account name; also the persona file stem
    account: String,
    /// Tone descriptor
    tone: String,
    /// Words and phrases the audience uses
    #[serde(default)]
    #[builder(default)]
    vocabulary: Vec<String>,
    /// Platforms drafts are written for, in rotation order
    #[serde(default = "default_platforms")]
    #[builder(default = "default_platforms()")]
    platforms: Vec<Platform>,
    /// Free-form audience notes added to the prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    description: Option<String>,
    /// Asset type used when a batch does not override it
    #[serde(default)]
    #[builder(default)]
    asset_type: AssetType,
}

fn default_platforms() -> Vec<Platform> {
    vec![Platform::Tiktok]
}

impl Persona {
    /// Platform for the `index`-th draft of a batch.
    ///
    /// Platforms rotate in configuration order. Returns `None` when the
    /// persona lists no platform.
    pub fn platform_for(&self, index: usize) -> Option<Platform> {
        if self.platforms.is_empty() {
            return None;
        }
        Some(self.platforms[index % self.platforms.len()])
    }
}
