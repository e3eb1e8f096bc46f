//! Retry classification shared by the API clients.

/// Trait for errors that support retry logic.
///
/// The API clients only retry when the configured retry budget is non-zero;
/// this trait decides which failures are worth another attempt.
///
/// # Examples
///
/// ```
/// use reelcast_error::{MediaError, MediaErrorKind, RetryableError};
///
/// let err = MediaError::new(MediaErrorKind::Api {
///     status_code: 503,
///     message: "Service unavailable".to_string(),
/// });
/// assert!(err.is_retryable());
///
/// let err = MediaError::new(MediaErrorKind::Api {
///     status_code: 401,
///     message: "Unauthorized".to_string(),
/// });
/// assert!(!err.is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    ///
    /// Transient errors like 503 (service unavailable), 429 (rate limit),
    /// or network timeouts should return true. Permanent errors like 401
    /// (unauthorized) or 400 (bad request) should return false.
    fn is_retryable(&self) -> bool;
}

/// HTTP status codes that indicate a transient failure.
pub(crate) fn is_transient_status(status_code: u16) -> bool {
    matches!(status_code, 408 | 429 | 500 | 502 | 503 | 504)
}
