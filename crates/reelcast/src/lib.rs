//! Reelcast - persona-driven short-form video drafts
//!
//! Reelcast writes social media drafts for a set of audience personas, builds
//! a video or image for each one, stores the results as reviewable directories
//! and publishes approved drafts.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use reelcast::{BatchRequest, LogProgress, Reelcast};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = Reelcast::from_env()?;
//!     let orchestrator = app.orchestrator(app.open_store()?)?;
//!
//!     let request = BatchRequest {
//!         accounts: vec!["genz".to_string()],
//!         count: Some(2),
//!         ..Default::default()
//!     };
//!     let report = orchestrator.run(&request, &LogProgress).await?;
//!     println!("Created: {:?}", report.created());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `reelcast_core` - Draft, persona, media and status types
//! - `reelcast_interface` - Traits for the text, media, encoder and publishing services
//! - `reelcast_error` - Error types
//! - `reelcast_config` - Layered settings, personas, account and asset mappings
//! - `reelcast_models` - xAI text and Imagine media clients
//! - `reelcast_storage` - Filesystem draft store
//! - `reelcast_pipeline` - Copy generation, media building, batch orchestration
//! - `reelcast_publish` - Late publishing client and publisher
//! - `reelcast_server` - Review HTTP service
//!
//! This crate (`reelcast`) re-exports everything and wires the pieces together.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod app;
mod logging;
mod verify;

pub use app::Reelcast;
pub use logging::{LoggingConfig, init_logging};
pub use verify::{SetupCheck, SetupReport, verify_setup};

pub use reelcast_core::*;
pub use reelcast_error::*;
pub use reelcast_interface::*;

pub use reelcast_config::{
    AccountMap, AccountProfiles, AssetMapping, Credentials, HttpConfig, ImagineConfig,
    MediaConfig, MediaSource, PathsConfig, PersonaStore, PipelineConfig, PublishConfig,
    ReelcastConfig, ServerConfig, XaiConfig,
};
pub use reelcast_models::{ImagineClient, XaiClient};
pub use reelcast_pipeline::{
    AssetLibrary, BatchOrchestrator, BatchReport, BatchRequest, BatchRequestBuilder,
    CopyGenerator, DraftFailure, DraftOutcome, DraftStage, FfmpegEncoder, LogProgress,
    MediaBuilder, Progress, ProgressReporter, ProgressStep,
};
pub use reelcast_publish::{LateClient, PublishReceipt, Publisher};
pub use reelcast_server::{ApiError, ApiState, Job, JobStatus, JobTable, create_router, serve};
pub use reelcast_storage::DraftStore;
