//! Layered pipeline settings.
//!
//! Sources, in order of precedence (later sources override earlier):
//! - Bundled defaults (include_str! from reelcast.toml)
//! - User config in home directory (~/.config/reelcast/reelcast.toml)
//! - User config in current directory (./reelcast.toml)
//! - Environment variables `REELCAST__<SECTION>__<KEY>`

use config::{Config, Environment, File, FileFormat};
use reelcast_error::{ConfigError, ReelcastResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../reelcast.toml");

/// Where drafts, personas and mappings live on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root of the draft tree
    pub drafts_dir: PathBuf,
    /// Directory of `{account}.toml` persona files
    pub personas_dir: PathBuf,
    /// Account-to-profile mapping file
    pub accounts_file: PathBuf,
    /// Asset-key mapping file
    pub asset_mapping_file: PathBuf,
    /// Asset library root
    pub assets_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            drafts_dir: PathBuf::from("drafts"),
            personas_dir: PathBuf::from("personas"),
            accounts_file: PathBuf::from("config/accounts.toml"),
            asset_mapping_file: PathBuf::from("config/asset_mapping.toml"),
            assets_dir: PathBuf::from("assets"),
        }
    }
}

/// Retry policy for transient HTTP failures (408, 429, 5xx).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Extra attempts after the first; 0 disables retries
    pub max_retries: usize,
    /// Base delay of the exponential backoff in milliseconds
    pub retry_base_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            retry_base_delay_ms: 500,
        }
    }
}

/// xAI chat completions settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XaiConfig {
    /// API base URL
    pub base_url: String,
    /// Models tried in order
    pub models: Vec<String>,
    /// Sampling temperature
    pub temperature: f32,
    /// Completion token limit
    pub max_tokens: u32,
    /// Per-request timeout
    pub request_timeout_secs: u64,
}

impl Default for XaiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.x.ai/v1".to_string(),
            models: vec!["grok-4".to_string(), "grok-3-mini".to_string()],
            temperature: 0.7,
            max_tokens: 2048,
            request_timeout_secs: 120,
        }
    }
}

/// xAI Imagine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagineConfig {
    /// API base URL
    pub base_url: String,
    /// Video generation model
    pub video_model: String,
    /// Image generation model
    pub image_model: String,
    /// Video submit request timeout
    pub submit_timeout_secs: u64,
    /// Video status poll request timeout
    pub poll_timeout_secs: u64,
    /// Image generation request timeout
    pub image_timeout_secs: u64,
    /// Media download timeout
    pub download_timeout_secs: u64,
}

impl Default for ImagineConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.x.ai/v1".to_string(),
            video_model: "grok-imagine-video".to_string(),
            image_model: "grok-imagine-image".to_string(),
            submit_timeout_secs: 60,
            poll_timeout_secs: 30,
            image_timeout_secs: 120,
            download_timeout_secs: 120,
        }
    }
}

/// Where draft media comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaSource {
    /// Generated by the media API
    #[default]
    Api,
    /// Assembled from the local asset library
    Library,
}

/// Media generation and encoding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Media source
    pub source: MediaSource,
    /// Requested video length
    pub video_duration_secs: u32,
    /// Requested aspect ratio
    pub aspect_ratio: String,
    /// Requested video resolution
    pub resolution: String,
    /// Delay between video status polls
    pub poll_interval_secs: u64,
    /// Overall video generation deadline
    pub video_deadline_secs: u64,
    /// Output frame width
    pub output_width: u32,
    /// Output frame height
    pub output_height: u32,
    /// ffmpeg binary
    pub ffmpeg_path: PathBuf,
    /// ffprobe binary
    pub ffprobe_path: PathBuf,
    /// ffmpeg run timeout
    pub ffmpeg_timeout_secs: u64,
    /// ffprobe run timeout
    pub ffprobe_timeout_secs: u64,
    /// Seconds each image is shown in a slideshow
    pub slideshow_secs_per_image: u32,
    /// Library videos are cut to this length
    pub library_max_secs: u32,
    /// Length of a clip looped from a single image
    pub still_clip_secs: u32,
    /// Music style keyword to audio file
    pub music_tracks: BTreeMap<String, PathBuf>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            source: MediaSource::Api,
            video_duration_secs: 10,
            aspect_ratio: "9:16".to_string(),
            resolution: "720p".to_string(),
            poll_interval_secs: 5,
            video_deadline_secs: 1800,
            output_width: 1080,
            output_height: 1920,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            ffmpeg_timeout_secs: 120,
            ffprobe_timeout_secs: 10,
            slideshow_secs_per_image: 3,
            library_max_secs: 60,
            still_clip_secs: 5,
            music_tracks: BTreeMap::new(),
        }
    }
}

impl MediaConfig {
    /// Resolve the music track for a music style.
    ///
    /// Returns the track of the first configured keyword (in key order) that
    /// occurs in `music_style`, compared case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelcast_config::MediaConfig;
    /// use std::path::PathBuf;
    ///
    /// let mut media = MediaConfig::default();
    /// media
    ///     .music_tracks
    ///     .insert("pop".to_string(), PathBuf::from("music/pop.mp3"));
    ///
    /// assert_eq!(
    ///     media.music_track_for("Upbeat 2000s Pop"),
    ///     Some(PathBuf::from("music/pop.mp3")).as_deref()
    /// );
    /// assert!(media.music_track_for("lofi").is_none());
    /// ```
    pub fn music_track_for(&self, music_style: &str) -> Option<&Path> {
        let style = music_style.to_lowercase();
        self.music_tracks
            .iter()
            .find(|(keyword, _)| !keyword.is_empty() && style.contains(&keyword.to_lowercase()))
            .map(|(_, path)| path.as_path())
    }

    /// Delay between video status polls.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Overall video generation deadline.
    pub fn video_deadline(&self) -> Duration {
        Duration::from_secs(self.video_deadline_secs)
    }
}

/// Batch settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Accounts generated for when none are requested
    pub default_accounts: Vec<String>,
    /// Drafts per account when no count is requested
    pub default_count: usize,
    /// Attempts per draft before it is reported as failed
    pub draft_attempts: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_accounts: vec![
                "genz".to_string(),
                "genx".to_string(),
                "millennial".to_string(),
            ],
            default_count: 1,
            draft_attempts: 1,
        }
    }
}

/// Publishing API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// API base URL
    pub base_url: String,
    /// Presign and post request timeout
    pub request_timeout_secs: u64,
    /// Media upload timeout
    pub upload_timeout_secs: u64,
    /// Post to every configured platform of the account
    pub cross_post: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            base_url: "https://getlate.dev/api/v1".to_string(),
            request_timeout_secs: 60,
            upload_timeout_secs: 120,
            cross_post: false,
        }
    }
}

/// Review service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
        }
    }
}

/// Top-level Reelcast configuration.
///
/// # Example
///
/// ```no_run
/// use reelcast_config::ReelcastConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ReelcastConfig::load()?;
/// println!("Drafts go to {}", config.paths.drafts_dir.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReelcastConfig {
    /// File locations
    pub paths: PathsConfig,
    /// HTTP retry policy
    pub http: HttpConfig,
    /// Text generation
    pub xai: XaiConfig,
    /// Media generation API
    pub imagine: ImagineConfig,
    /// Media pipeline
    pub media: MediaConfig,
    /// Batch settings
    pub pipeline: PipelineConfig,
    /// Publishing API
    pub publish: PublishConfig,
    /// Review service
    pub server: ServerConfig,
}

impl ReelcastConfig {
    /// Load configuration from a specific file, on top of the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> ReelcastResult<Self> {
        debug!("Loading configuration from file");

        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()));
        Self::build(builder)
    }

    /// Parse configuration from TOML text, on top of the bundled defaults.
    pub fn from_toml_str(text: &str) -> ReelcastResult<Self> {
        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(text, FileFormat::Toml));
        Self::build(builder)
    }

    /// Load configuration with precedence: env > current dir > home dir > bundled.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> ReelcastResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/reelcast/reelcast.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("reelcast").required(false))
            .add_source(Environment::with_prefix("REELCAST").separator("__"));

        Self::build(builder)
    }

    fn build(builder: config::ConfigBuilder<config::builder::DefaultState>) -> ReelcastResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.xai.models.is_empty() {
            return Err(ConfigError::new("xai.models must list at least one model"));
        }
        if self.pipeline.draft_attempts == 0 {
            return Err(ConfigError::new("pipeline.draft_attempts must be at least 1"));
        }
        if self.media.output_width == 0 || self.media.output_height == 0 {
            return Err(ConfigError::new("media output size must be non-zero"));
        }
        Ok(())
    }
}
