//! Setup verification: credentials, configuration files and external tools.
//!
//! Checks only read; nothing is created or sent.

use reelcast_config::{
    AccountMap, AssetMapping, Credentials, MediaSource, PersonaStore, ReelcastConfig,
};
use reelcast_interface::MediaEncoder;
use serde::Serialize;
use std::fmt;
use tracing::{debug, instrument};

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetupCheck {
    /// What was checked
    pub name: &'static str,
    /// Whether it passed
    pub ok: bool,
    /// What was found, or how to fix it
    pub detail: String,
}

impl SetupCheck {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            ok: true,
            detail: detail.into(),
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            ok: false,
            detail: detail.into(),
        }
    }
}

/// All checks, in the order they ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SetupReport {
    /// Individual results
    pub checks: Vec<SetupCheck>,
}

impl SetupReport {
    /// Whether every check passed.
    pub fn is_ok(&self) -> bool {
        self.checks.iter().all(|c| c.ok)
    }

    /// Failed checks.
    pub fn problems(&self) -> Vec<&SetupCheck> {
        self.checks.iter().filter(|c| !c.ok).collect()
    }
}

impl fmt::Display for SetupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for check in &self.checks {
            let mark = if check.ok { "ok" } else { "!!" };
            writeln!(f, "  [{}] {}: {}", mark, check.name, check.detail)?;
        }
        Ok(())
    }
}

fn check_credentials(credentials: &Credentials, checks: &mut Vec<SetupCheck>) {
    checks.push(match credentials.require_xai() {
        Ok(_) => SetupCheck::pass("xai_api_key", "set"),
        Err(e) => SetupCheck::fail("xai_api_key", e.message),
    });
    checks.push(match credentials.require_late() {
        Ok(_) => SetupCheck::pass("late_api_key", "set"),
        Err(e) => SetupCheck::fail("late_api_key", e.message),
    });
}

fn check_personas(config: &ReelcastConfig) -> SetupCheck {
    const NAME: &str = "personas";
    let dir = &config.paths.personas_dir;
    let store = match PersonaStore::load_dir(dir) {
        Ok(store) => store,
        Err(e) => return SetupCheck::fail(NAME, e.to_string()),
    };
    if store.is_empty() {
        return SetupCheck::fail(NAME, format!("no persona files in {}", dir.display()));
    }
    match store.resolve(&config.pipeline.default_accounts) {
        Ok(_) => SetupCheck::pass(NAME, store.accounts().join(", ")),
        Err(e) => SetupCheck::fail(NAME, e.message),
    }
}

fn check_accounts(config: &ReelcastConfig) -> SetupCheck {
    const NAME: &str = "accounts";
    let path = &config.paths.accounts_file;
    if !path.exists() {
        return SetupCheck::fail(NAME, format!("{} missing", path.display()));
    }
    let map = match AccountMap::load(path) {
        Ok(map) => map,
        Err(e) => return SetupCheck::fail(NAME, e.to_string()),
    };
    let configured: Vec<&str> = config
        .pipeline
        .default_accounts
        .iter()
        .filter(|a| {
            map.get(a)
                .is_some_and(|p| !p.configured_platforms().is_empty())
        })
        .map(String::as_str)
        .collect();
    if configured.is_empty() {
        SetupCheck::fail(
            NAME,
            format!("{} needs at least one real profile id", path.display()),
        )
    } else {
        SetupCheck::pass(NAME, format!("profiles for {}", configured.join(", ")))
    }
}

fn check_asset_library(config: &ReelcastConfig) -> SetupCheck {
    const NAME: &str = "asset_library";
    let mapping = match AssetMapping::load(&config.paths.asset_mapping_file) {
        Ok(mapping) => mapping,
        Err(e) => return SetupCheck::fail(NAME, e.to_string()),
    };
    let assets = &config.paths.assets_dir;
    if !assets.is_dir() {
        return SetupCheck::fail(NAME, format!("{} is not a directory", assets.display()));
    }
    let missing: Vec<&str> = mapping
        .keys()
        .into_iter()
        .filter(|key| mapping.get(key).is_none_or(|p| !assets.join(p).exists()))
        .collect();
    if mapping.is_empty() {
        SetupCheck::fail(NAME, "asset mapping is empty")
    } else if missing.is_empty() {
        SetupCheck::pass(NAME, format!("{} assets mapped", mapping.keys().len()))
    } else {
        SetupCheck::fail(NAME, format!("missing assets: {}", missing.join(", ")))
    }
}

/// Run every check against `config`.
///
/// The encoder check covers both `ffmpeg` and `ffprobe`. The asset library is
/// checked only when media comes from it.
#[instrument(skip_all)]
pub async fn verify_setup(
    config: &ReelcastConfig,
    credentials: &Credentials,
    encoder: &dyn MediaEncoder,
) -> SetupReport {
    let mut checks = Vec::new();
    check_credentials(credentials, &mut checks);
    checks.push(check_personas(config));
    checks.push(check_accounts(config));
    checks.push(if encoder.is_available().await {
        SetupCheck::pass("ffmpeg", "available")
    } else {
        SetupCheck::fail(
            "ffmpeg",
            format!(
                "{} or {} not found on PATH",
                config.media.ffmpeg_path.display(),
                config.media.ffprobe_path.display()
            ),
        )
    });
    if config.media.source == MediaSource::Library {
        checks.push(check_asset_library(config));
    }
    debug!(failed = checks.iter().filter(|c| !c.ok).count(), "Setup verified");
    SetupReport { checks }
}
