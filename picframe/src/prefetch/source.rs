//! The fetch capability consumed by the prefetcher.

use super::error::FetchError;

/// Produces one item per call.
///
/// The prefetcher calls this from exactly one dedicated worker thread, so
/// implementations may keep mutable state (connection handles, counters)
/// without any synchronization of their own. A call may block for as long
/// as the underlying transport needs; the prefetcher never holds its lock
/// across the call.
///
/// Failures are transient from the prefetcher's point of view: it retries
/// with backoff and the consumer only ever observes an empty cache.
pub trait FetchSource: Send + 'static {
    /// What a successful fetch yields. The production source produces
    /// encoded images as `Vec<u8>`; the cache itself treats items as
    /// opaque and only moves ownership around.
    type Item: Send + 'static;

    /// Fetch the next item.
    fn fetch(&mut self) -> Result<Self::Item, FetchError>;
}
