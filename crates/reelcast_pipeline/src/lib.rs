//! Draft generation pipeline for Reelcast.
//!
//! A batch runs every requested draft through three stages:
//!
//! 1. [`CopyGenerator`] asks a [`reelcast_interface::TextGenerator`] for the
//!    caption, hashtags, hook and media prompts, and validates the JSON answer.
//! 2. [`MediaBuilder`] produces the video or image, either through a
//!    [`reelcast_interface::MediaGenerator`] or from the [`AssetLibrary`].
//! 3. The draft is committed to the [`reelcast_storage::DraftStore`].
//!
//! [`BatchOrchestrator`] drives the stages and isolates failures per draft.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod copy;
mod encoder;
mod extraction;
mod library;
mod media;
mod orchestrator;
mod progress;
mod prompt;

pub use copy::{CopyGenerator, parse_draft};
pub use encoder::FfmpegEncoder;
pub use extraction::extract_json;
pub use library::{AssetLibrary, LibraryAsset};
pub use media::{MediaBuilder, video_prompt};
pub use orchestrator::{
    BatchOrchestrator, BatchReport, BatchRequest, BatchRequestBuilder, BatchRequestBuilderError,
    DraftFailure, DraftOutcome, DraftStage,
};
pub use progress::{LogProgress, Progress, ProgressReporter, ProgressStep};
pub use prompt::{CopyRequest, build_request, user_prompt};
