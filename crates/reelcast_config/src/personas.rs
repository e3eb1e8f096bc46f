//! Persona definitions loaded from `personas/{account}.toml`.

use reelcast_core::{DraftId, Persona};
use reelcast_error::{ConfigError, ReelcastResult};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// All personas known to the pipeline, keyed by account name.
///
/// Each file's stem is the account name. A file may omit `account`; when it
/// is present it must match the stem.
#[derive(Debug, Clone, Default)]
pub struct PersonaStore {
    personas: BTreeMap<String, Persona>,
}

impl PersonaStore {
    /// Load every `*.toml` file in `dir`.
    ///
    /// A missing directory yields an empty store; lookups then fail with a
    /// [`ConfigError`] naming the account.
    #[instrument(skip(dir), fields(dir = %dir.as_ref().display()))]
    pub fn load_dir(dir: impl AsRef<Path>) -> ReelcastResult<Self> {
        let dir = dir.as_ref();
        let mut store = Self::default();

        if !dir.is_dir() {
            warn!("Persona directory not found");
            return Ok(store);
        }

        let entries = std::fs::read_dir(dir).map_err(|e| {
            ConfigError::new(format!("Failed to read {}: {}", dir.display(), e))
        })?;

        for entry in entries {
            let path = entry
                .map_err(|e| ConfigError::new(format!("Failed to read {}: {}", dir.display(), e)))?
                .path();
            if path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let text = std::fs::read_to_string(&path).map_err(|e| {
                ConfigError::new(format!("Failed to read {}: {}", path.display(), e))
            })?;
            let persona = Self::parse(stem, &text)
                .map_err(|e| ConfigError::new(format!("{}: {}", path.display(), e.message)))?;
            debug!(account = stem, "Loaded persona");
            store.insert(persona);
        }

        info!(count = store.len(), "Loaded personas");
        Ok(store)
    }

    /// Parse one persona document for `account`.
    pub fn parse(account: &str, text: &str) -> Result<Persona, ConfigError> {
        if !DraftId::is_valid_account(account) {
            return Err(ConfigError::new(format!(
                "Invalid account name '{}': use letters, digits, '_' or '-'",
                account
            )));
        }

        let mut table: toml::Table = toml::from_str(text)
            .map_err(|e| ConfigError::new(format!("Invalid persona TOML: {}", e)))?;
        match table.get("account").and_then(|v| v.as_str()) {
            Some(declared) if declared != account => {
                return Err(ConfigError::new(format!(
                    "Persona declares account '{}' but file is named '{}'",
                    declared, account
                )));
            }
            Some(_) => {}
            None => {
                table.insert("account".to_string(), toml::Value::String(account.to_string()));
            }
        }

        let persona: Persona = toml::Value::Table(table)
            .try_into()
            .map_err(|e| ConfigError::new(format!("Invalid persona: {}", e)))?;
        if persona.platforms().is_empty() {
            return Err(ConfigError::new(format!(
                "Persona '{}' lists no platforms",
                account
            )));
        }
        Ok(persona)
    }

    /// Add or replace a persona.
    pub fn insert(&mut self, persona: Persona) {
        self.personas.insert(persona.account().clone(), persona);
    }

    /// Look up a persona.
    pub fn get(&self, account: &str) -> Result<&Persona, ConfigError> {
        self.personas.get(account).ok_or_else(|| {
            ConfigError::new(format!(
                "Persona '{}' not found (known: {})",
                account,
                self.accounts().join(", ")
            ))
        })
    }

    /// Resolve every requested account, failing on the first unknown one.
    pub fn resolve(&self, accounts: &[String]) -> Result<Vec<Persona>, ConfigError> {
        accounts
            .iter()
            .map(|account| self.get(account).cloned())
            .collect()
    }

    /// Known account names, sorted.
    pub fn accounts(&self) -> Vec<String> {
        self.personas.keys().cloned().collect()
    }

    /// Number of personas.
    pub fn len(&self) -> usize {
        self.personas.len()
    }

    /// Whether no persona is loaded.
    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

impl FromIterator<Persona> for PersonaStore {
    fn from_iter<I: IntoIterator<Item = Persona>>(iter: I) -> Self {
        let mut store = Self::default();
        for persona in iter {
            store.insert(persona);
        }
        store
    }
}
