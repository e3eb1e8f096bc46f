//! Publishing for Reelcast.
//!
//! [`LateClient`] implements [`reelcast_interface::PublishingApi`] over the
//! Late presign, upload and posts endpoints. [`Publisher`] checks that a draft
//! may be published, uploads its media and marks it `published`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod late;
mod publisher;

pub use late::LateClient;
pub use publisher::{PublishReceipt, Publisher};
