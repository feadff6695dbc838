//! Outbound call governor: global rate limiting plus throttle retry.
//!
//! Two orthogonal policies compose around every Shopify call:
//!
//! - **Rate limiting**: all callers serialize through one mutex-guarded slot
//!   enforcing a minimum inter-call interval of 500 ms, a global ceiling of
//!   2 calls/second across every concurrent task in the process.
//! - **Retry on throttle**: a call answered with HTTP 429 is retried up to 5
//!   attempts, with the delay doubling from 500 ms. Any other failure
//!   propagates immediately.
//!
//! Time goes through `tokio::time`, so tests drive the governor under a
//! paused clock.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant, sleep};

use crate::shopify::ShopifyError;

/// Minimum spacing between outbound calls (2 calls/second).
pub const MIN_CALL_INTERVAL: Duration = Duration::from_millis(500);

/// Maximum attempts per call when throttled.
pub const MAX_ATTEMPTS: u32 = 5;

/// Backoff before the first retry; doubles on each further retry.
pub const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Process-wide gate for outbound Shopify calls.
///
/// Cheap to clone; every clone shares the same slot state, so the rate
/// ceiling holds no matter how many tasks hold a handle. There is no
/// per-call timeout: a stuck downstream call stalls its task until the
/// transport gives up.
#[derive(Clone)]
pub struct CallGovernor {
    inner: Arc<GovernorInner>,
}

struct GovernorInner {
    /// Timestamp of the last granted call slot.
    last_slot: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl Default for CallGovernor {
    fn default() -> Self {
        Self::new()
    }
}

impl CallGovernor {
    /// Create a governor with the standard 500 ms interval.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(GovernorInner {
                last_slot: Mutex::new(None),
                min_interval: MIN_CALL_INTERVAL,
            }),
        }
    }

    /// Run a call under both policies.
    ///
    /// The closure is invoked once per attempt; request construction happens
    /// inside it so each retry sends a fresh request.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::RetriesExhausted`] when every attempt was
    /// throttled; any non-throttle error from the call is returned unchanged
    /// after the first occurrence.
    pub async fn run<T, F, Fut>(&self, mut call: F) -> Result<T, ShopifyError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ShopifyError>>,
    {
        let mut backoff = INITIAL_BACKOFF;
        for attempt in 1..=MAX_ATTEMPTS {
            self.acquire_slot().await;
            match call().await {
                Err(ShopifyError::RateLimited(retry_after)) => {
                    if attempt == MAX_ATTEMPTS {
                        tracing::error!(
                            attempts = MAX_ATTEMPTS,
                            "throttled on every attempt, giving up"
                        );
                        return Err(ShopifyError::RetriesExhausted {
                            attempts: MAX_ATTEMPTS,
                        });
                    }
                    tracing::warn!(attempt, delay = ?backoff, retry_after, "throttled, backing off");
                    sleep(backoff).await;
                    backoff *= 2;
                }
                result => return result,
            }
        }
        Err(ShopifyError::RetriesExhausted {
            attempts: MAX_ATTEMPTS,
        })
    }

    /// Wait for and claim the next call slot.
    ///
    /// The lock is held across the wait so that concurrent callers queue and
    /// each claims a distinct slot ≥ `min_interval` after the previous one.
    async fn acquire_slot(&self) {
        let mut last = self.inner.last_slot.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + self.inner.min_interval;
            let now = Instant::now();
            if ready_at > now {
                sleep(ready_at - now).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_calls_spaced_by_min_interval() {
        let governor = CallGovernor::new();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let governor = governor.clone();
            handles.push(tokio::spawn(async move {
                governor
                    .run(async || Ok::<_, ShopifyError>(Instant::now()))
                    .await
                    .expect("call succeeds")
            }));
        }

        let mut stamps = Vec::new();
        for handle in handles {
            stamps.push(handle.await.expect("task completes"));
        }
        stamps.sort();

        for pair in stamps.windows(2) {
            let (a, b) = (pair.first().expect("pair"), pair.get(1).expect("pair"));
            assert!(*b - *a >= MIN_CALL_INTERVAL);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_retried_five_times_then_exhausted() {
        let governor = CallGovernor::new();
        let calls = AtomicU32::new(0);

        let result: Result<(), ShopifyError> = governor
            .run(async || {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ShopifyError::RateLimited(1))
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert!(matches!(
            result,
            Err(ShopifyError::RetriesExhausted { attempts: 5 })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_doubles_from_initial_delay() {
        let governor = CallGovernor::new();
        let start = Instant::now();

        let _result: Result<(), ShopifyError> = governor
            .run(async || Err(ShopifyError::RateLimited(1)))
            .await;

        // Attempts at 0 ms, then after backoffs of 500/1000/2000/4000 ms.
        assert_eq!(start.elapsed(), Duration::from_millis(7500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_recovery_is_invisible_to_caller() {
        let governor = CallGovernor::new();
        let calls = AtomicU32::new(0);

        let result = governor
            .run(async || {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(ShopifyError::RateLimited(1))
                } else {
                    Ok("done")
                }
            })
            .await;

        assert_eq!(result.expect("recovers"), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_throttle_error_propagates_without_retry() {
        let governor = CallGovernor::new();
        let calls = AtomicU32::new(0);

        let result: Result<(), ShopifyError> = governor
            .run(async || {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ShopifyError::Api {
                    status: 422,
                    message: "invalid".into(),
                })
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(ShopifyError::Api { status: 422, .. })));
    }
}
