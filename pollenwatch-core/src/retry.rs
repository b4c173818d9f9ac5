//! Retry/backoff driver shared by the weather and pollen clients.
//!
//! Each failed attempt is classified (timeout, 429, other HTTP status,
//! network, parse) and recorded as a human-readable diagnostic. 429
//! sleeps a fixed cooldown instead of consuming a backoff-schedule
//! slot; an empty-but-well-formed response is terminal and never
//! retried.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::FetchError;

/// How many times to try, how long to sleep between ordinary failures,
/// and how long to pause after an HTTP 429.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub backoff: Vec<Duration>,
    pub rate_limit_pause: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4),
            ],
            rate_limit_pause: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Delay to apply after the given 1-based attempt number. Falls
    /// back to the last schedule entry if the schedule is shorter than
    /// `max_attempts`.
    fn backoff_delay(&self, attempt: usize) -> Duration {
        self.backoff
            .get(attempt - 1)
            .or_else(|| self.backoff.last())
            .copied()
            .unwrap_or(Duration::from_secs(1))
    }
}

/// Drive `attempt_fn` to success or exhaustion. On exhaustion the
/// error string summarizes the attempt count and the last recorded
/// failure; it is the diagnostic surfaced to the end user.
pub(crate) async fn run_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut attempt_fn: F,
) -> Result<T, String>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let max = policy.max_attempts;
    let mut last_failure = String::new();

    for attempt in 1..=max {
        let err = match attempt_fn().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if matches!(err, FetchError::NoData) {
            return Err(format!("No {label} data available in API response"));
        }

        last_failure = describe_failure(label, &err, attempt, max);
        warn!("{last_failure}");

        match err {
            FetchError::RateLimited => {
                debug!("pausing {:?} after HTTP 429", policy.rate_limit_pause);
                tokio::time::sleep(policy.rate_limit_pause).await;
            }
            _ if attempt < max => {
                let delay = policy.backoff_delay(attempt);
                debug!("retrying after {delay:?}");
                tokio::time::sleep(delay).await;
            }
            _ => {}
        }
    }

    Err(format!(
        "Failed to fetch {label} data after {max} attempts. Last error: {last_failure}"
    ))
}

fn describe_failure(label: &str, err: &FetchError, attempt: usize, max: usize) -> String {
    match err {
        FetchError::Timeout => {
            format!("{label} API request timed out (attempt {attempt}/{max})")
        }
        FetchError::RateLimited => {
            format!("{label} API rate limited (attempt {attempt}/{max}): waiting before retry")
        }
        FetchError::Status(code) => {
            format!("{label} API HTTP error {code} (attempt {attempt}/{max})")
        }
        FetchError::Network(cause) => {
            format!("{label} API network error (attempt {attempt}/{max}): {cause}")
        }
        FetchError::Parse(cause) => {
            format!("unexpected {label} API response (attempt {attempt}/{max}): {cause}")
        }
        FetchError::NoData => format!("No {label} data available in API response"),
    }
}
