//! Top-level error wrapper types.

use crate::{
    ConfigError, GenerationError, HttpError, JsonError, MediaError, PublishError, ServerError,
    StorageError,
};

/// Every error a Reelcast operation can surface.
///
/// # Examples
///
/// ```
/// use reelcast_error::{ReelcastError, HttpError};
///
/// let setup = HttpError::new("Late", "no TLS roots");
/// let err: ReelcastError = setup.into();
/// assert!(format!("{}", err).contains("Could not set up Late client"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum ReelcastErrorKind {
    /// API client setup failed
    #[from(HttpError)]
    Http(HttpError),
    /// Output could not be rendered as JSON
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Text generation error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Media generation or encoding error
    #[from(MediaError)]
    Media(MediaError),
    /// Draft storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Publishing error
    #[from(PublishError)]
    Publish(PublishError),
    /// Review service error
    #[from(ServerError)]
    Server(ServerError),
}

/// Reelcast error with kind discrimination.
///
/// # Examples
///
/// ```
/// use reelcast_error::{ReelcastErrorKind, ReelcastResult, ConfigError};
///
/// fn might_fail() -> ReelcastResult<()> {
///     Err(ConfigError::new("Missing persona"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), ReelcastErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Reelcast Error: {}", _0)]
pub struct ReelcastError(Box<ReelcastErrorKind>);

impl ReelcastError {
    /// Create a new error from a kind.
    pub fn new(kind: ReelcastErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ReelcastErrorKind {
        &self.0
    }

    /// Consume the wrapper and return the kind.
    pub fn into_kind(self) -> ReelcastErrorKind {
        *self.0
    }
}

// Generic From implementation for any type that converts to ReelcastErrorKind
impl<T> From<T> for ReelcastError
where
    T: Into<ReelcastErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Reelcast operations.
pub type ReelcastResult<T> = std::result::Result<T, ReelcastError>;
