//! Core data types for the Reelcast content pipeline.
//!
//! This crate provides the types shared by every stage of the pipeline:
//! personas that condition the copy, drafts that carry generated copy and
//! media, and the identifiers and statuses the draft tree is organised by.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod asset;
mod draft;
mod id;
mod media;
mod persona;
mod platform;
mod status;

pub use asset::{AssetSpec, AssetType};
pub use draft::{Draft, DraftBuilder, DraftBuilderError, DraftHealth, DraftRecord, DraftSummary};
pub use id::DraftId;
pub use media::{MediaFile, MediaKind};
pub use persona::{Persona, PersonaBuilder, PersonaBuilderError};
pub use platform::Platform;
pub use status::DraftStatus;
