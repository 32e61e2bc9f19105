//! Pauses between delivery attempts.

use std::time::Duration;

use async_trait::async_trait;

/// Waits between delivery attempts.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Waits for `duration` before returning.
    async fn pause(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Converts a delay in (possibly fractional) minutes into a `Duration`.
pub fn minutes(minutes: f64) -> Duration {
    Duration::from_secs_f64((minutes * 60.0).max(0.0))
}
