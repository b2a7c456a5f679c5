//! Retry and backoff for single-URL downloads.
//!
//! Transient failures (timeouts, throttling, 5xx) are retried on the same
//! URL; anything else is returned so the caller can move on to the next
//! mirror or model version.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
