use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::error::FetchError;

/// The backoff ceiling spec §7 sets alongside the 1s initial delay: no
/// retry waits longer than this regardless of attempt count.
pub const MAX_DELAY: Duration = Duration::from_secs(30);

/// Retries a transient RPC operation with exponential backoff (spec §7
/// `TransientRpc`: "Fetcher retries with exponential backoff; persistent
/// failure propagates to the poller"). A [`FetchError::MethodUnsupported`]
/// is never retried — it is a permanent signal, not a transient one.
pub async fn with_retry<T, Fut, F>(max_attempts: u32, base_delay: Duration, mut op: F) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(FetchError::MethodUnsupported(msg)) => return Err(FetchError::MethodUnsupported(msg)),
            Err(err) => {
                attempt += 1;
                if attempt >= max_attempts {
                    return Err(err);
                }
                let delay = base_delay.saturating_mul(2u32.saturating_pow(attempt - 1)).min(MAX_DELAY);
                warn!(attempt, ?delay, %err, "retrying after transient RPC failure");
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = with_retry(5, Duration::from_millis(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(FetchError::Transient("boom".into()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_attempts_and_propagates() {
        let result: Result<(), FetchError> =
            with_retry(3, Duration::from_millis(1), || async { Err(FetchError::Transient("down".into())) }).await;
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn delay_is_capped_at_thirty_seconds() {
        let started = tokio::time::Instant::now();
        let result: Result<(), FetchError> =
            with_retry(3, Duration::from_secs(20), || async { Err(FetchError::Transient("down".into())) }).await;
        assert!(result.is_err());
        // attempt 1 waits 20s (uncapped), attempt 2 would want 40s but is
        // capped to 30s: 50s total, not 60s.
        assert_eq!(tokio::time::Instant::now() - started, Duration::from_secs(50));
    }

    #[tokio::test]
    async fn method_unsupported_is_never_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), FetchError> = with_retry(5, Duration::from_millis(1), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchError::MethodUnsupported("no batch receipts".into())) }
        })
        .await;
        assert!(matches!(result, Err(FetchError::MethodUnsupported(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
