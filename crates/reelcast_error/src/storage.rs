//! Draft storage error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create a directory
    #[display("Failed to create directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Draft not found
    #[display("Draft not found: {}", _0)]
    NotFound(String),
    /// Identifier contains characters that are not allowed in a draft id
    #[display("Invalid draft id: {}", _0)]
    InvalidId(String),
    /// Metadata document could not be parsed or serialized
    #[display("Invalid draft metadata: {}", _0)]
    Metadata(String),
    /// A draft was committed without its media file
    #[display("Draft media missing: {}", _0)]
    MediaMissing(String),
    /// The requested status change is not allowed from the current status
    #[display("Invalid status change: {}", _0)]
    InvalidTransition(String),
    /// No free sequence number was found for the day
    #[display("No free draft id: {}", _0)]
    IdsExhausted(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use reelcast_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NotFound("2024-01-01-genz-1".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
