//! Tick sources for the poll loop

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior};

/// Completes once per poll cycle
#[async_trait]
pub trait Ticker: Send {
    async fn tick(&mut self);
}

/// Fixed-period ticker. The first tick completes immediately.
#[derive(Debug)]
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    /// Panics if `period` is zero; `Config` rejects that at startup.
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        // A slow tick pushes the schedule back instead of bursting.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test]
    async fn test_first_tick_is_immediate() {
        let mut ticker = IntervalTicker::new(Duration::from_secs(600));
        let started = Instant::now();
        ticker.tick().await;
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(ticker.period(), Duration::from_secs(600));
    }

    #[tokio::test]
    async fn test_ticks_are_spaced_by_period() {
        let mut ticker = IntervalTicker::new(Duration::from_millis(30));
        let started = Instant::now();
        ticker.tick().await;
        ticker.tick().await;
        ticker.tick().await;
        assert!(started.elapsed() >= Duration::from_millis(60));
    }
}
