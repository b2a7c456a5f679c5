//! Retry loop: run a closure until success or policy says stop.

use super::classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::transport::TransportError;

/// Runs `f` until it succeeds or the policy gives up, sleeping between
/// retryable failures. Returns the last error.
pub fn run_with_retry<T, F>(policy: &RetryPolicy, mut f: F) -> Result<T, TransportError>
where
    F: FnMut() -> Result<T, TransportError>,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(v) => return Ok(v),
            Err(e) => match policy.decide(attempt, classify::classify(&e)) {
                RetryDecision::NoRetry => return Err(e),
                RetryDecision::RetryAfter(d) => {
                    tracing::debug!("attempt {} failed ({}), retrying in {:?}", attempt, e, d);
                    std::thread::sleep(d);
                    attempt += 1;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    #[test]
    fn retries_throttling_until_success() {
        let mut calls = 0;
        let out = run_with_retry(&fast(3), || {
            calls += 1;
            if calls < 3 {
                Err(TransportError::Http(429))
            } else {
                Ok(calls)
            }
        });
        assert_eq!(out.unwrap(), 3);
    }

    #[test]
    fn gives_up_immediately_on_not_found() {
        let mut calls = 0;
        let out: Result<(), _> = run_with_retry(&fast(5), || {
            calls += 1;
            Err(TransportError::Http(404))
        });
        assert!(matches!(out, Err(TransportError::Http(404))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn stops_at_max_attempts() {
        let mut calls = 0;
        let out: Result<(), _> = run_with_retry(&fast(2), || {
            calls += 1;
            Err(TransportError::Http(500))
        });
        assert!(out.is_err());
        assert_eq!(calls, 2);
    }
}
