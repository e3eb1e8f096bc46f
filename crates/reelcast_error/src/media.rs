//! Media generation and encoding error types.

use crate::RetryableError;
use crate::retry::is_transient_status;

/// Media failure conditions.
///
/// There is no placeholder media: every one of these aborts the draft.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum MediaErrorKind {
    /// Network-level failure talking to the media API
    #[display("Media request failed: {}", _0)]
    Request(String),
    /// The request or the whole generation exceeded its deadline
    #[display("Media generation timed out: {}", _0)]
    Timeout(String),
    /// HTTP error with status code and message
    #[display("HTTP {} error: {}", status_code, message)]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// The submit call did not return a job reference
    #[display("Media API did not return a request id: {}", _0)]
    MissingRequestId(String),
    /// The media job expired before completing
    #[display("Media request expired: {}", _0)]
    Expired(String),
    /// The media API reported the job as failed or cancelled
    #[display("Media job failed: {}", _0)]
    JobFailed(String),
    /// The result was withheld by content moderation
    #[display("Media filtered by content moderation: {}", _0)]
    Moderated(String),
    /// The job finished without a download URL
    #[display("Media API returned no download url: {}", _0)]
    MissingUrl(String),
    /// The downloaded payload was empty
    #[display("Downloaded media is empty: {}", _0)]
    EmptyPayload(String),
    /// The downloaded payload is not a recognised media format
    #[display("Downloaded media is corrupt or of an unexpected format: {}", _0)]
    CorruptPayload(String),
    /// The external encoder failed
    #[display("Encoding failed: {}", _0)]
    Encoding(String),
    /// An external tool could not be started
    #[display("Tool not found: {}", _0)]
    ToolNotFound(String),
    /// The asset library could not supply media
    #[display("Asset library error: {}", _0)]
    Asset(String),
    /// Local file I/O failed
    #[display("Media I/O error: {}", _0)]
    Io(String),
}

impl MediaErrorKind {
    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            MediaErrorKind::Api { status_code, .. } => is_transient_status(*status_code),
            MediaErrorKind::Request(_) => true,
            _ => false,
        }
    }
}

/// Media error with source location tracking.
///
/// # Examples
///
/// ```
/// use reelcast_error::{MediaError, MediaErrorKind};
///
/// let err = MediaError::new(MediaErrorKind::Expired("req-123".to_string()));
/// assert!(format!("{}", err).contains("req-123"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Media Error: {} at line {} in {}", kind, line, file)]
pub struct MediaError {
    /// The kind of error that occurred
    pub kind: MediaErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl MediaError {
    /// Create a new MediaError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: MediaErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl RetryableError for MediaError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
