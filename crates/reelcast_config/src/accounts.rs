//! Account-to-profile mapping for the publishing API.

use reelcast_core::Platform;
use reelcast_error::{ConfigError, ReelcastResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{instrument, warn};

/// Prefix marking a profile id that was never filled in.
const PLACEHOLDER_PREFIX: &str = "YOUR_";

/// Publishing profile ids of one account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfiles {
    /// TikTok profile id
    #[serde(
        default,
        alias = "tiktok_account_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub tiktok_profile_id: Option<String>,
    /// Instagram profile id
    #[serde(
        default,
        alias = "instagram_account_id",
        alias = "reels_profile_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub instagram_profile_id: Option<String>,
}

impl AccountProfiles {
    /// Profile id for `platform`, ignoring empty and placeholder values.
    pub fn profile_for(&self, platform: Platform) -> Option<&str> {
        let id = match platform {
            Platform::Tiktok => self.tiktok_profile_id.as_deref(),
            Platform::Instagram => self.instagram_profile_id.as_deref(),
        }?;
        let id = id.trim();
        if id.is_empty() || id.starts_with(PLACEHOLDER_PREFIX) {
            None
        } else {
            Some(id)
        }
    }

    /// Platforms with a usable profile id, in declaration order.
    pub fn configured_platforms(&self) -> Vec<Platform> {
        [Platform::Tiktok, Platform::Instagram]
            .into_iter()
            .filter(|p| self.profile_for(*p).is_some())
            .collect()
    }
}

/// Mapping of account name to publishing profiles (`config/accounts.toml`).
///
/// ```toml
/// [genz]
/// tiktok_profile_id = "abc123"
/// instagram_profile_id = "YOUR_INSTAGRAM_ID"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountMap {
    accounts: BTreeMap<String, AccountProfiles>,
}

impl AccountMap {
    /// Load the mapping; a missing file yields an empty map.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> ReelcastResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Account mapping not found");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::new(format!("Failed to read {}: {}", path.display(), e)))?;
        Ok(Self::parse(&text)?)
    }

    /// Parse mapping TOML.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text)
            .map_err(|e| ConfigError::new(format!("Invalid account mapping: {}", e)))
    }

    /// Profiles of `account`.
    pub fn get(&self, account: &str) -> Option<&AccountProfiles> {
        self.accounts.get(account)
    }

    /// Add or replace an account.
    pub fn insert(&mut self, account: impl Into<String>, profiles: AccountProfiles) {
        self.accounts.insert(account.into(), profiles);
    }

    /// Whether no account is mapped.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
