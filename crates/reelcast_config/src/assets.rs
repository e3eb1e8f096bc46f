//! Asset-key mapping for the local asset library.

use reelcast_error::{ConfigError, ReelcastResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{instrument, warn};

/// Mapping of asset key to a path under the asset library
/// (`config/asset_mapping.toml`).
///
/// ```toml
/// webkinz = "toys/webkinz"
/// flip_phone = "tech/flip_phone"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetMapping {
    entries: BTreeMap<String, PathBuf>,
}

impl AssetMapping {
    /// Load the mapping; a missing file yields an empty mapping.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> ReelcastResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Asset mapping not found");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::new(format!("Failed to read {}: {}", path.display(), e)))?;
        Ok(Self::parse(&text)?)
    }

    /// Parse mapping TOML.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mapping: Self = toml::from_str(text)
            .map_err(|e| ConfigError::new(format!("Invalid asset mapping: {}", e)))?;
        if let Some((key, _)) = mapping
            .entries
            .iter()
            .find(|(_, path)| path.is_absolute() || path.components().any(|c| c.as_os_str() == ".."))
        {
            return Err(ConfigError::new(format!(
                "Asset '{}' must map to a path inside the asset library",
                key
            )));
        }
        Ok(mapping)
    }

    /// Library-relative path of `key`.
    pub fn get(&self, key: &str) -> Option<&Path> {
        self.entries.get(key).map(PathBuf::as_path)
    }

    /// Mapped keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, key: impl Into<String>, path: impl Into<PathBuf>) {
        self.entries.insert(key.into(), path.into());
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
