//! Publishing error types.

use crate::RetryableError;
use crate::retry::is_transient_status;

/// Broad class of a publishing failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PublishErrorCategory {
    /// Missing profile ids or credentials
    #[display("configuration")]
    Configuration,
    /// Network failure or API rejection
    #[display("transport")]
    Transport,
    /// The draft is not in a publishable state
    #[display("precondition")]
    Precondition,
}

/// Publishing failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PublishErrorKind {
    /// LATE_API_KEY missing or a placeholder
    #[display("LATE_API_KEY environment variable not set")]
    MissingApiKey,
    /// Account absent from the accounts mapping
    #[display("Account '{}' not in accounts configuration", _0)]
    UnknownAccount(String),
    /// No usable profile id for the account/platform
    #[display("No profile id configured for account '{}' on {}", account, platform)]
    MissingProfile {
        /// Account name
        account: String,
        /// Platform name
        platform: String,
    },
    /// Network-level failure
    #[display("Publish request failed: {}", _0)]
    Transport(String),
    /// The API answered with an error status
    #[display("Publishing API rejected the request (HTTP {}): {}", status_code, message)]
    Rejected {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// The API answered 2xx with an unexpected body
    #[display("Unexpected publishing API response: {}", _0)]
    InvalidResponse(String),
    /// Draft media file is absent
    #[display("Draft '{}' has no media file", _0)]
    MediaMissing(String),
    /// Draft has not been approved
    #[display("Draft '{}' is {} and must be approved before publishing", draft_id, status)]
    NotApproved {
        /// Draft id
        draft_id: String,
        /// Current status
        status: String,
    },
    /// Draft was already published
    #[display("Draft '{}' is already published", _0)]
    AlreadyPublished(String),
}

impl PublishErrorKind {
    /// Classify this failure.
    pub fn category(&self) -> PublishErrorCategory {
        match self {
            PublishErrorKind::MissingApiKey
            | PublishErrorKind::UnknownAccount(_)
            | PublishErrorKind::MissingProfile { .. } => PublishErrorCategory::Configuration,
            PublishErrorKind::Transport(_)
            | PublishErrorKind::Rejected { .. }
            | PublishErrorKind::InvalidResponse(_) => PublishErrorCategory::Transport,
            PublishErrorKind::MediaMissing(_)
            | PublishErrorKind::NotApproved { .. }
            | PublishErrorKind::AlreadyPublished(_) => PublishErrorCategory::Precondition,
        }
    }

    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            PublishErrorKind::Rejected { status_code, .. } => is_transient_status(*status_code),
            PublishErrorKind::Transport(_) => true,
            _ => false,
        }
    }
}

/// Publishing error with location tracking.
///
/// # Examples
///
/// ```
/// use reelcast_error::{PublishError, PublishErrorCategory, PublishErrorKind};
///
/// let err = PublishError::new(PublishErrorKind::AlreadyPublished("2024-01-01-genz-1".into()));
/// assert_eq!(err.category(), PublishErrorCategory::Precondition);
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Publish Error: {} at line {} in {}", kind, line, file)]
pub struct PublishError {
    /// The kind of error that occurred
    pub kind: PublishErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PublishError {
    /// Create a new PublishError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PublishErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Classify this failure.
    pub fn category(&self) -> PublishErrorCategory {
        self.kind.category()
    }
}

impl RetryableError for PublishError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
