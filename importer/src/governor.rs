//! Fixed-interval pacing for candle requests.

use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Timer gate: a call may start no sooner than `min_interval` after the
/// previous one finished, whatever that call's outcome was.
#[derive(Debug)]
pub struct RateGovernor {
    min_interval: Duration,
    last_finished: Option<Instant>,
}

impl RateGovernor {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_finished: None,
        }
    }

    /// Waits until the pause after the previous call has elapsed.
    pub async fn acquire(&mut self) {
        if self.min_interval.is_zero() {
            return;
        }
        if let Some(last) = self.last_finished {
            sleep_until(last + self.min_interval).await;
        }
    }

    /// Marks the current call as finished; the pause starts now.
    pub fn release(&mut self) {
        if !self.min_interval.is_zero() {
            self.last_finished = Some(Instant::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_call_is_not_delayed() {
        let mut governor = RateGovernor::new(Duration::from_secs(5));
        let started = Instant::now();
        governor.acquire().await;
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_calls_are_spaced_by_min_interval() {
        let delay = Duration::from_millis(25);
        let calls = 5;
        let mut governor = RateGovernor::new(delay);

        let started = Instant::now();
        for _ in 0..calls {
            governor.acquire().await;
            governor.release();
        }
        assert!(started.elapsed() >= delay * (calls - 1));
    }

    #[tokio::test]
    async fn test_slow_call_still_gets_full_pause() {
        let delay = Duration::from_millis(30);
        let mut governor = RateGovernor::new(delay);

        governor.acquire().await;
        tokio::time::sleep(delay * 2).await;
        governor.release();

        let finished = Instant::now();
        governor.acquire().await;
        assert!(finished.elapsed() >= delay);
    }

    #[tokio::test]
    async fn test_zero_interval_never_waits() {
        let mut governor = RateGovernor::new(Duration::ZERO);
        let started = Instant::now();
        for _ in 0..100 {
            governor.acquire().await;
            governor.release();
        }
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
