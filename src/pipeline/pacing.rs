use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::app::ports::PacerPort;

/// Sleeps a fixed interval after every row.
#[derive(Debug, Clone)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl PacerPort for FixedDelay {
    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Token bucket allowing `per_minute` rows per minute with a burst of one.
#[derive(Debug)]
pub struct RateLimiter {
    per_minute: u64,
    // tokens available and the time of the last refill
    bucket: Mutex<(f64, Instant)>,
}

const BURST: f64 = 1.0;

impl RateLimiter {
    pub fn new(per_minute: u64) -> Self {
        Self {
            per_minute,
            bucket: Mutex::new((BURST, Instant::now())),
        }
    }

    /// Waits until a token is available, then consumes it.
    pub async fn acquire(&self) {
        if self.per_minute == 0 {
            return;
        }
        let refill_rate = self.per_minute as f64 / 60.0; // tokens per second
        loop {
            let mut guard = self.bucket.lock().await;
            let (ref mut tokens, ref mut last) = *guard;
            let now = Instant::now();
            let elapsed = now.duration_since(*last).as_secs_f64();
            *tokens = (*tokens + elapsed * refill_rate).min(BURST);
            *last = now;
            if *tokens >= 1.0 {
                *tokens -= 1.0;
                break;
            }
            let wait = (1.0 - *tokens) / refill_rate;
            drop(guard);
            tokio::time::sleep(Duration::from_secs_f64(wait.max(0.001))).await;
        }
    }
}

#[async_trait]
impl PacerPort for RateLimiter {
    async fn pause(&self) {
        self.acquire().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_sleeps_for_interval() {
        let pacer = FixedDelay::new(Duration::from_secs(1));
        let start = Instant::now();
        pacer.pause().await;
        pacer.pause().await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay_does_not_sleep() {
        let pacer = FixedDelay::new(Duration::ZERO);
        let start = Instant::now();
        pacer.pause().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limiter_spaces_rows() {
        let limiter = RateLimiter::new(30); // one row every two seconds
        let start = Instant::now();

        limiter.pause().await;
        assert!(start.elapsed() < Duration::from_millis(10));

        limiter.pause().await;
        limiter.pause().await;
        assert!(start.elapsed() >= Duration::from_millis(3990));
    }
}
