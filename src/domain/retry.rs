//! Fixed-delay retry for units of persistence work
//!
//! Every store call made on behalf of a request goes through [`with_retry`].
//! Only [`DomainError::Storage`] triggers another attempt; validation and
//! not-found outcomes are returned to the caller untouched.

use std::future::Future;
use std::time::Duration;

use tracing::{error, warn};

use super::DomainError;

/// Message reported to callers once every attempt has failed
pub const DATABASE_ERROR: &str = "Database error";

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_DELAY_MS: u64 = 500;

/// How many times a unit of work is attempted and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Create a policy. A `max_attempts` of zero is treated as one attempt.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Run `work` until it succeeds, fails with a non-storage error, or the
/// policy runs out of attempts.
///
/// `work` must perform exactly one logical persistence operation per call
/// and leave no partial state behind when it fails. Store error details are
/// logged here and replaced by [`DATABASE_ERROR`] once attempts are exhausted.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut work: F,
) -> Result<T, DomainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 1;

    loop {
        match work().await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_transient() => return Err(err),
            Err(err) if attempt < max_attempts => {
                warn!(
                    operation,
                    attempt,
                    max_attempts,
                    error = %err,
                    "Store operation failed, retrying"
                );
                tokio::time::sleep(policy.delay()).await;
                attempt += 1;
            }
            Err(err) => {
                error!(
                    operation,
                    attempts = attempt,
                    error = %err,
                    "Store operation failed after all attempts"
                );
                return Err(DomainError::storage(DATABASE_ERROR));
            }
        }
    }
}
