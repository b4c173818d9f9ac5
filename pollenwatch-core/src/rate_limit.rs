//! Minimum-interval spacing between requests from one client instance.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default spacing between consecutive requests.
pub const DEFAULT_MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(1);

/// Serializes requests from a single client instance so they are at
/// least `min_interval` apart. Does not coordinate across instances.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Sleep out the remainder of the interval since the previous
    /// request, then stamp the clock for the next caller.
    pub async fn wait(&self) {
        let remaining = {
            let last = self
                .last_request
                .lock()
                .expect("rate limiter lock poisoned");
            last.and_then(|at| self.min_interval.checked_sub(at.elapsed()))
        };

        if let Some(remaining) = remaining.filter(|r| !r.is_zero()) {
            tokio::time::sleep(remaining).await;
        }

        *self
            .last_request
            .lock()
            .expect("rate limiter lock poisoned") = Some(Instant::now());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_REQUEST_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_wait_does_not_block() {
        let limiter = RateLimiter::new(Duration::from_secs(5));
        let start = Instant::now();
        limiter.wait().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn back_to_back_waits_are_spaced_by_the_interval() {
        let limiter = RateLimiter::new(Duration::from_millis(80));
        let start = Instant::now();
        limiter.wait().await;
        limiter.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(80));
    }
}
