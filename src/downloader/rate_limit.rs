//! Rolling-window request rate limiting
//!
//! Keeps the start time of every call still inside the window. A caller that would
//! exceed the cap sleeps until the oldest call ages out, so no rolling window of
//! `window` length ever sees more than `max_calls` acquisitions.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

use super::config::{RATE_LIMIT_CALLS, RATE_LIMIT_WINDOW};

/// Request-based rate limiter with explicit window state
#[derive(Debug)]
pub struct RateLimiter {
    max_calls: usize,
    window: Duration,
    calls: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a request-based rate limiter
    ///
    /// # Arguments
    /// * `max_calls` - Maximum calls per window
    /// * `window` - Length of the rolling window
    pub fn new(max_calls: usize, window: Duration) -> Self {
        Self {
            max_calls,
            window,
            calls: Mutex::new(VecDeque::with_capacity(max_calls)),
        }
    }

    /// Maximum calls per window
    pub fn max_calls(&self) -> usize {
        self.max_calls
    }

    /// Length of the rolling window
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Number of calls still counted against the current window
    pub async fn in_flight(&self) -> usize {
        let mut calls = self.calls.lock().await;
        Self::evict_expired(&mut calls, self.window, Instant::now());
        calls.len()
    }

    /// Wait for a free slot and claim it
    ///
    /// Suspends the caller until fewer than `max_calls` calls fall inside the window
    /// ending now, then records the call.
    pub async fn acquire(&self) -> Result<(), RateLimitError> {
        if self.max_calls == 0 {
            return Err(RateLimitError::ZeroCapacity);
        }

        loop {
            let wait = {
                let mut calls = self.calls.lock().await;
                let now = Instant::now();
                Self::evict_expired(&mut calls, self.window, now);

                if calls.len() < self.max_calls {
                    calls.push_back(now);
                    return Ok(());
                }

                // Non-empty here since max_calls > 0
                let oldest = calls.front().copied().unwrap_or(now);
                self.window.saturating_sub(now.duration_since(oldest))
            };

            debug!(
                "Rate limit reached ({} calls per {:?}), waiting {:?}",
                self.max_calls, self.window, wait
            );
            sleep(wait).await;
        }
    }

    fn evict_expired(calls: &mut VecDeque<Instant>, window: Duration, now: Instant) {
        while let Some(&oldest) = calls.front() {
            if now.duration_since(oldest) >= window {
                calls.pop_front();
            } else {
                break;
            }
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RATE_LIMIT_CALLS, RATE_LIMIT_WINDOW)
    }
}

/// Rate limiter errors
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    /// Limiter configured with no capacity at all
    #[error("rate limiter has zero capacity; no call could ever be admitted")]
    ZeroCapacity,
}
