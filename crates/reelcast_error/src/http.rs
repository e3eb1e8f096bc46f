//! HTTP client setup errors.

/// An API client could not be built.
///
/// Request failures are reported by the generation, media and publish
/// errors of the client that made them; this covers the step before, when
/// the underlying `reqwest::Client` is assembled.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Could not set up {} client: {} at line {} in {}", api, message, line, file)]
pub struct HttpError {
    /// Which API the client was for
    pub api: &'static str,
    /// Builder failure text
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl HttpError {
    /// Record a client setup failure for `api`.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelcast_error::HttpError;
    ///
    /// let err = HttpError::new("xAI", "invalid TLS backend");
    /// assert!(err.to_string().starts_with("Could not set up xAI client: invalid TLS backend"));
    /// ```
    #[track_caller]
    pub fn new(api: &'static str, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            api,
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
