//! Bounded retry with exponential backoff for transient store failures.
//!
//! Only the call sites that own durability retry: event appends and
//! checkpoint advances. Cache operations are never retried — a cache miss is
//! always safe to treat as "recompute".

use std::future::Future;
use std::time::Duration;

use crate::error::DomainError;

/// Number of attempts made before a transient failure is surfaced.
pub const MAX_ATTEMPTS: u32 = 3;

const BASE_DELAY: Duration = Duration::from_millis(50);

/// Runs `operation`, retrying up to [`MAX_ATTEMPTS`] times while it fails
/// with [`DomainError::TransientIo`]. Delays double between attempts.
///
/// # Errors
///
/// Returns the last error once attempts are exhausted; non-transient errors
/// are returned immediately.
pub async fn with_backoff<T, F, Fut>(label: &str, mut operation: F) -> Result<T, DomainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt + 1 < MAX_ATTEMPTS => {
                let delay = BASE_DELAY * 2_u32.pow(attempt);
                tracing::warn!(
                    operation = label,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "transient failure, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
