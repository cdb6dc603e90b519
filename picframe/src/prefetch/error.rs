//! Error types for the prefetch module.

use std::io;
use thiserror::Error;

/// Errors that can occur when starting the prefetcher.
#[derive(Debug, Error)]
pub enum PrefetchError {
    /// A prefetch depth of zero is not a usable configuration.
    #[error("prefetch depth must be at least 1")]
    ZeroDepth,

    /// The background worker thread could not be spawned.
    #[error("failed to spawn prefetch worker thread: {0}")]
    WorkerSpawn(#[source] io::Error),
}

/// A failed fetch attempt.
///
/// These are transient: the worker logs them and retries with backoff.
/// They are never surfaced through [`ImagePrefetcher::pop`], which simply
/// reports "nothing cached yet".
///
/// [`ImagePrefetcher::pop`]: crate::prefetch::ImagePrefetcher::pop
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// HTTP transport failure (connection refused, non-2xx status, ...).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The source itself could not produce an image.
    #[error("fetch source failed: {0}")]
    Source(String),
}
