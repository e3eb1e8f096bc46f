//! Transient-failure retries shared by the HTTP clients.

use reelcast_config::HttpConfig;
use reelcast_error::RetryableError;
use std::future::Future;
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::warn;

/// Longest pause between two attempts.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Run `op`, retrying transient failures up to `http.max_retries` times.
///
/// Permanent failures (as classified by [`RetryableError`]) return at once.
pub async fn with_retries<T, E, F, Fut>(
    http: &HttpConfig,
    operation: &'static str,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError + std::fmt::Display,
{
    if http.max_retries == 0 {
        return op().await;
    }

    let strategy = ExponentialBackoff::from_millis(http.retry_base_delay_ms.max(1))
        .factor(2)
        .max_delay(MAX_RETRY_DELAY)
        .map(jitter)
        .take(http.max_retries);

    Retry::spawn(strategy, || {
        let attempt = op();
        async move {
            attempt.await.map_err(|e| {
                if e.is_retryable() {
                    warn!(operation, error = %e, "Transient failure, will retry");
                    RetryError::Transient {
                        err: e,
                        retry_after: None,
                    }
                } else {
                    RetryError::Permanent(e)
                }
            })
        }
    })
    .await
}
