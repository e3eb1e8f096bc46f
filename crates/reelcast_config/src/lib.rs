//! Configuration for the Reelcast content pipeline.
//!
//! Pipeline settings are layered with the `config` crate (bundled defaults,
//! user files, environment). Personas, account profiles and asset mappings
//! live in their own TOML files; credentials come from the environment only.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod accounts;
mod assets;
mod credentials;
mod personas;
mod settings;

pub use accounts::{AccountMap, AccountProfiles};
pub use assets::AssetMapping;
pub use credentials::{Credentials, LATE_API_KEY, XAI_API_KEY, is_placeholder};
pub use personas::PersonaStore;
pub use settings::{
    HttpConfig, ImagineConfig, MediaConfig, MediaSource, PathsConfig, PipelineConfig,
    PublishConfig, ReelcastConfig, ServerConfig, XaiConfig,
};
