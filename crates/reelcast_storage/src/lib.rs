//! Draft directory storage for the Reelcast content pipeline.
//!
//! Every draft lives in its own directory named by its [`DraftId`]. The store
//! never overwrites an existing draft: a new draft gets the first free
//! sequence number of its account and day.
//!
//! [`DraftId`]: reelcast_core::DraftId

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod fs_util;
mod staging;
mod store;
mod summary;

pub use staging::StagedDraft;
pub use store::{CONTENT_FILE, DraftGuard, DraftStore, FAILED_DIR, SUMMARY_FILE};
