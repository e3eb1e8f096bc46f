//! Error types for the Reelcast content pipeline.
//!
//! This crate provides the error types shared by every Reelcast crate.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum names the specific failure
//! - `*Error` struct wraps the kind with the source location that created it
//! - constructors use `#[track_caller]` so the location is captured automatically
//!
//! Pipeline stages map onto dedicated types: [`ConfigError`] for missing
//! credentials or mappings, [`GenerationError`] for text generation,
//! [`MediaError`] for media generation and encoding, [`StorageError`] for the
//! draft tree, and [`PublishError`] for the publishing API.
//!
//! # Examples
//!
//! ```
//! use reelcast_error::{ReelcastResult, GenerationError, GenerationErrorKind};
//!
//! fn parse_copy() -> ReelcastResult<String> {
//!     Err(GenerationError::new(GenerationErrorKind::EmptyResponse))?
//! }
//!
//! assert!(parse_copy().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod generation;
mod http;
mod json;
mod media;
mod publish;
mod retry;
mod server;
mod storage;

pub use config::ConfigError;
pub use error::{ReelcastError, ReelcastErrorKind, ReelcastResult};
pub use generation::{GenerationError, GenerationErrorKind};
pub use http::HttpError;
pub use json::JsonError;
pub use media::{MediaError, MediaErrorKind};
pub use publish::{PublishError, PublishErrorCategory, PublishErrorKind};
pub use retry::RetryableError;
pub use server::{ServerError, ServerErrorKind};
pub use storage::{StorageError, StorageErrorKind};
