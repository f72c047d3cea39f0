use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, instrument};

/// Fixed pause between consecutive batch requests
///
/// NCBI asks unauthenticated clients to stay under 3 requests/second. The
/// converter sends one request per batch, so a fixed delay between batches
/// keeps it under that ceiling. The pause is only taken *between* batches:
/// never before the first one and never after the last.
#[derive(Debug, Clone, Copy)]
pub struct BatchPacer {
    delay: Duration,
}

impl BatchPacer {
    /// Create a pacer with the given inter-batch delay
    ///
    /// # Example
    ///
    /// ```
    /// use idmap_client::pacing::BatchPacer;
    /// use std::time::Duration;
    ///
    /// let pacer = BatchPacer::new(Duration::from_millis(350));
    /// assert!(pacer.should_pause(0, 3));
    /// assert!(!pacer.should_pause(2, 3));
    /// ```
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether a pause follows the batch at `batch_idx` (0-based) out of `total_batches`
    pub fn should_pause(&self, batch_idx: usize, total_batches: usize) -> bool {
        !self.delay.is_zero() && batch_idx + 1 < total_batches
    }

    /// Sleep after the batch at `batch_idx` if another batch follows it
    #[instrument(skip(self))]
    pub async fn pause_after(&self, batch_idx: usize, total_batches: usize) {
        if self.should_pause(batch_idx, total_batches) {
            debug!(
                delay_ms = self.delay.as_millis() as u64,
                "Pausing between batches"
            );
            sleep(self.delay).await;
        }
    }
}
