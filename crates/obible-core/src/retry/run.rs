//! Retry loop: run a closure until success or policy says stop.

use super::classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::fetch::FetchError;

/// Sleeps for the backoff duration between retryable failures.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, FetchError>
where
    F: FnMut() -> Result<T, FetchError>,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(value) => return Ok(value),
            Err(e) => {
                let kind = classify::classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(d) => {
                        tracing::debug!(attempt, ?kind, delay_ms = d.as_millis() as u64, "retrying: {}", e);
                        std::thread::sleep(d);
                        attempt += 1;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn quick(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    #[test]
    fn retries_throttling_until_success() {
        let mut calls = 0;
        let out = run_with_retry(&quick(5), || {
            calls += 1;
            if calls < 3 {
                Err(FetchError::Http(503))
            } else {
                Ok(calls)
            }
        });
        assert_eq!(out.unwrap(), 3);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let mut calls = 0;
        let out: Result<(), _> = run_with_retry(&quick(2), || {
            calls += 1;
            Err(FetchError::Http(500))
        });
        assert!(matches!(out, Err(FetchError::Http(500))));
        assert_eq!(calls, 2);
    }

    #[test]
    fn does_not_retry_client_errors() {
        let mut calls = 0;
        let out: Result<(), _> = run_with_retry(&quick(5), || {
            calls += 1;
            Err(FetchError::Http(404))
        });
        assert!(out.is_err());
        assert_eq!(calls, 1);
    }
}
