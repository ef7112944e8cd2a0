//! Retry and backoff policy for index and translation downloads.
//!
//! Errors are classified (timeouts, throttling, connection failures) and
//! mapped to an exponential backoff decision shared by every fetch.

mod classify;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
