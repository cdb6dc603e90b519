//! Background image prefetching.
//!
//! The prefetcher keeps a bounded ring of already-downloaded images ahead
//! of the display loop. A single background worker pulls images through a
//! [`FetchSource`] and parks itself once the ring holds the configured
//! number of images; every [`ImagePrefetcher::pop`] wakes it to refill.
//!
//! The consumer side never blocks: `pop` returns `None` when nothing is
//! buffered yet and the caller decides its own polling cadence.

mod cache;
mod config;
mod error;
mod ring;
mod source;

pub use cache::ImagePrefetcher;
pub use config::PrefetchConfig;
pub use error::{FetchError, PrefetchError};
pub use ring::Ring;
pub use source::FetchSource;
