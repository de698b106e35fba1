//! Fixed politeness delay between page requests.
//!
//! The review site is crawled strictly one page at a time and every request,
//! whether it succeeded or not, is followed by the same pause. A shared
//! last-request timestamp also guarantees the interval holds if one throttle
//! is ever used by several callers at once.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Sleeps for a fixed interval after each request.
#[derive(Debug)]
pub struct FixedIntervalThrottle {
    interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl FixedIntervalThrottle {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_request: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn from_millis(interval_ms: u64) -> Self {
        Self::new(Duration::from_millis(interval_ms))
    }

    /// Waits until a request may be issued and claims the slot. Only has an
    /// effect when the previous slot was handed out less than one interval
    /// ago, which can only happen when callers share the throttle.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.interval {
                tokio::time::sleep(self.interval.saturating_sub(elapsed)).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// Records a finished request and sleeps for the full interval.
    /// Must be called on error paths too.
    pub async fn pause_after_request(&self) {
        {
            let mut last = self.last_request.lock().await;
            *last = Some(Instant::now());
        }
        if !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn zero_interval_does_not_sleep() {
        let throttle = FixedIntervalThrottle::from_millis(0);
        let started = Instant::now();
        throttle.acquire().await;
        throttle.pause_after_request().await;
        throttle.acquire().await;
        assert!(started.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn pause_waits_for_the_full_interval() {
        let throttle = FixedIntervalThrottle::from_millis(40);
        let started = Instant::now();
        throttle.pause_after_request().await;
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn first_acquire_is_immediate() {
        let throttle = FixedIntervalThrottle::from_millis(500);
        let started = Instant::now();
        throttle.acquire().await;
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn acquire_after_pause_does_not_wait_again() {
        let throttle = FixedIntervalThrottle::from_millis(30);
        throttle.pause_after_request().await;
        let started = Instant::now();
        throttle.acquire().await;
        assert!(started.elapsed() < Duration::from_millis(30));
    }

    #[tokio::test]
    async fn concurrent_callers_are_spaced_by_the_interval() {
        let throttle = Arc::new(FixedIntervalThrottle::from_millis(120));
        let started = Instant::now();

        let spawn_caller = move |throttle: Arc<FixedIntervalThrottle>| {
            tokio::spawn(async move {
                throttle.acquire().await;
                started.elapsed()
            })
        };
        let first = spawn_caller(Arc::clone(&throttle));
        let second = spawn_caller(Arc::clone(&throttle));

        let a = first.await.unwrap();
        let b = second.await.unwrap();
        let gap = if a > b { a - b } else { b - a };
        assert!(
            gap >= Duration::from_millis(120),
            "callers let through {gap:?} apart"
        );
    }
}
