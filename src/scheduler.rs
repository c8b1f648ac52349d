//! Timer abstraction driving the rotator.
//!
//! The runner never calls `tokio::time` directly: it asks a [`Scheduler`]
//! to sleep, so tests can substitute a scheduler that records the requested
//! delays or returns immediately.

use std::time::Duration;

/// Source of delays for the rotator task.
#[async_trait::async_trait]
pub trait Scheduler: Send + Sync + 'static {
    /// Completes once `duration` has elapsed.
    ///
    /// Must be cancel-safe: the runner may drop the future at any point.
    async fn sleep(&self, duration: Duration);

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}

/// Scheduler backed by `tokio::time`.
///
/// Respects a paused tokio clock, which is what the simulated-time tests use.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

#[async_trait::async_trait]
impl Scheduler for TokioScheduler {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn name(&self) -> &'static str {
        "tokio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_sleeps_on_paused_clock() {
        let start = tokio::time::Instant::now();
        TokioScheduler.sleep(Duration::from_millis(150)).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(150));
        assert!(elapsed < Duration::from_millis(160));
    }

    #[test]
    fn test_name() {
        assert_eq!(TokioScheduler.name(), "tokio");
    }
}
