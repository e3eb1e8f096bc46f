//! API credentials from the environment.

use derive_getters::Getters;
use reelcast_error::ConfigError;

/// Text and media generation key.
pub const XAI_API_KEY: &str = "XAI_API_KEY";
/// Publishing API key.
pub const LATE_API_KEY: &str = "LATE_API_KEY";

/// API keys, read from the environment only.
///
/// Unset, empty and placeholder values (starting with `your_`) count as
/// missing.
#[derive(Clone, Default, Getters)]
pub struct Credentials {
    xai_api_key: Option<String>,
    late_api_key: Option<String>,
}

impl Credentials {
    /// Build from explicit values, dropping placeholders.
    pub fn new(xai_api_key: Option<String>, late_api_key: Option<String>) -> Self {
        Self {
            xai_api_key: xai_api_key.filter(|k| !is_placeholder(k)),
            late_api_key: late_api_key.filter(|k| !is_placeholder(k)),
        }
    }

    /// Read `XAI_API_KEY` and `LATE_API_KEY`.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var(XAI_API_KEY).ok(),
            std::env::var(LATE_API_KEY).ok(),
        )
    }

    /// The xAI key, or a [`ConfigError`] naming the variable.
    pub fn require_xai(&self) -> Result<&str, ConfigError> {
        self.xai_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::new(format!("{} not set in environment or .env", XAI_API_KEY)))
    }

    /// The Late key, or a [`ConfigError`] naming the variable.
    pub fn require_late(&self) -> Result<&str, ConfigError> {
        self.late_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::new(format!("{} not set in environment or .env", LATE_API_KEY)))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |k: &Option<String>| if k.is_some() { "<set>" } else { "<missing>" };
        f.debug_struct("Credentials")
            .field("xai_api_key", &redact(&self.xai_api_key))
            .field("late_api_key", &redact(&self.late_api_key))
            .finish()
    }
}

/// Whether a credential value is unset in practice.
///
/// # Examples
///
/// ```
/// use reelcast_config::is_placeholder;
///
/// assert!(is_placeholder(""));
/// assert!(is_placeholder("your_xai_key_here"));
/// assert!(!is_placeholder("xai-1234"));
/// ```
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.starts_with("your_")
}
