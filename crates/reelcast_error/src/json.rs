//! Errors rendering command output as JSON.

/// A value could not be written out as JSON.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Could not render {} as JSON: {} at line {} in {}", subject, message, line, file)]
pub struct JsonError {
    /// What was being rendered, e.g. "draft list"
    pub subject: String,
    /// serde_json failure text
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Record a failure to render `subject`.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelcast_error::JsonError;
    ///
    /// let err = JsonError::new("draft list", "key must be a string");
    /// assert_eq!(err.subject, "draft list");
    /// assert!(err.to_string().starts_with("Could not render draft list as JSON"));
    /// ```
    #[track_caller]
    pub fn new(subject: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        let location = std::panic::Location::caller();
        Self {
            subject: subject.into(),
            message: cause.to_string(),
            line: location.line(),
            file: location.file(),
        }
    }
}
