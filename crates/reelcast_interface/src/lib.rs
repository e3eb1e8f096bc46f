//! Service traits for the Reelcast content pipeline.
//!
//! The pipeline talks to four external services: a text generator, a media
//! generator, a media encoder and a publishing API. Each is a trait here so
//! the pipeline can be driven by mocks in tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{MediaEncoder, MediaGenerator, PublishingApi, TextGenerator};
pub use types::{
    EncodeJob, FrameSpec, ImageRequest, ImageRequestBuilder, ImageRequestBuilderError,
    PostMedia, PostReceipt, PostRequest, PostTarget, PresignedUpload, TextRequest,
    TextRequestBuilder, TextRequestBuilderError, TextResponse, VideoProbe, VideoRequest,
    VideoRequestBuilder, VideoRequestBuilderError, VideoStatus,
};
