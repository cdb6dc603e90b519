//! Configuration for the prefetcher.

use std::time::Duration;

/// Configuration for [`ImagePrefetcher`].
///
/// [`ImagePrefetcher`]: crate::prefetch::ImagePrefetcher
#[derive(Debug, Clone)]
pub struct PrefetchConfig {
    /// Target number of images to keep buffered ahead of the display loop.
    pub depth: usize,
    /// Delay before the first retry after a failed fetch.
    pub retry_initial_delay: Duration,
    /// Upper bound for the exponential retry backoff.
    pub retry_max_delay: Duration,
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            retry_initial_delay: Duration::from_millis(100),
            retry_max_delay: Duration::from_secs(5),
        }
    }
}

impl PrefetchConfig {
    /// Set the prefetch depth.
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Set the initial retry delay after a failed fetch.
    pub fn with_retry_initial_delay(mut self, delay: Duration) -> Self {
        self.retry_initial_delay = delay;
        self
    }

    /// Set the maximum retry delay.
    pub fn with_retry_max_delay(mut self, delay: Duration) -> Self {
        self.retry_max_delay = delay;
        self
    }
}
