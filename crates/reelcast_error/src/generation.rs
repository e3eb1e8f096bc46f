//! Text generation error types.

use crate::RetryableError;
use crate::retry::is_transient_status;

/// Text generation failure conditions.
///
/// Any of these aborts the draft being generated; the batch continues with
/// the next draft.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// Network-level failure talking to the text-generation API
    #[display("Text generation request failed: {}", _0)]
    Request(String),
    /// The request exceeded its timeout
    #[display("Text generation timed out: {}", _0)]
    Timeout(String),
    /// HTTP error with status code and message
    #[display("HTTP {} error: {}", status_code, message)]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Every configured model refused access
    #[display("All configured models were rejected: {}", _0)]
    ModelsRejected(String),
    /// The API answered without any assistant content
    #[display("Text generation returned an empty response")]
    EmptyResponse,
    /// No JSON object could be located in the output
    #[display("No JSON object found in generator output ({})", _0)]
    NoJson(String),
    /// A JSON object was found but did not parse
    #[display("Generator output is not valid JSON: {}", _0)]
    InvalidJson(String),
    /// Required fields are absent or empty
    #[display("Generated draft is missing required fields: {}", _0)]
    MissingFields(String),
    /// The `asset_type` value is neither `video` nor `image`
    #[display("Unsupported asset type: {}", _0)]
    UnsupportedAssetType(String),
    /// The `platform` value is not a known platform
    #[display("Unsupported platform: {}", _0)]
    UnsupportedPlatform(String),
    /// A field disagrees with what was requested
    #[display("Generated {} is '{}' but '{}' was requested", field, actual, expected)]
    Mismatch {
        /// Field name
        field: String,
        /// Requested value
        expected: String,
        /// Value found in the response
        actual: String,
    },
}

impl GenerationErrorKind {
    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationErrorKind::Api { status_code, .. } => is_transient_status(*status_code),
            GenerationErrorKind::Request(_) | GenerationErrorKind::Timeout(_) => true,
            _ => false,
        }
    }
}

/// Text generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use reelcast_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::MissingFields("music_style".into()));
/// assert!(format!("{}", err).contains("music_style"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl RetryableError for GenerationError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
