//! The bounded prefetch cache and its background worker.

use super::config::PrefetchConfig;
use super::error::PrefetchError;
use super::ring::Ring;
use super::source::FetchSource;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use tracing::{debug, trace, warn};

/// State shared between the worker thread and the consumer.
///
/// The ring indices and slot contents are the only shared mutable state,
/// all guarded by the one mutex. The fetch call itself runs with no lock
/// held, so a slow download never stalls `pop` or `cached_count`.
///
/// The shutdown flag is always stored while holding the ring mutex and
/// re-checked under the same mutex immediately before every condvar wait,
/// so a shutdown notification can never fall between a worker's check and
/// its wait.
struct Shared<T> {
    ring: Mutex<Ring<T>>,
    /// Wakes the worker after a pop and wakes it out of retry backoff
    /// or idle wait on shutdown.
    wake: Condvar,
    shutdown: AtomicBool,
    depth: usize,
}

/// Bounded image prefetch cache.
///
/// Owns one background worker that keeps up to `depth` fetched items
/// buffered in a fixed ring. The consumer drains the ring with [`pop`],
/// which never waits on I/O. Production use buffers encoded images as
/// `Vec<u8>`; the item type follows the [`FetchSource`] so tests can
/// buffer instrumented items.
///
/// Items are delivered in the order they were fetched (FIFO). If an insert
/// ever finds the ring full, the freshly fetched item is dropped in favor
/// of the already-buffered older ones.
///
/// Shutdown is cooperative: the worker checks a flag at every loop turn
/// and is woken out of any wait. A fetch already in flight is waited out,
/// so shutdown latency is bounded by the fetch source's own timeout.
///
/// [`pop`]: ImagePrefetcher::pop
pub struct ImagePrefetcher<T: Send + 'static = Vec<u8>> {
    shared: Arc<Shared<T>>,
    worker: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> ImagePrefetcher<T> {
    /// Start the prefetcher and its background worker.
    ///
    /// # Errors
    ///
    /// Returns [`PrefetchError::ZeroDepth`] when `config.depth == 0` and
    /// [`PrefetchError::WorkerSpawn`] when the worker thread cannot be
    /// started. No background state survives a failed start.
    pub fn start<S: FetchSource<Item = T>>(
        source: S,
        config: PrefetchConfig,
    ) -> Result<Self, PrefetchError> {
        if config.depth == 0 {
            return Err(PrefetchError::ZeroDepth);
        }

        let shared = Arc::new(Shared {
            ring: Mutex::new(Ring::new(config.depth)),
            wake: Condvar::new(),
            shutdown: AtomicBool::new(false),
            depth: config.depth,
        });

        let worker = thread::Builder::new()
            .name("image-prefetch".to_string())
            .spawn({
                let shared = Arc::clone(&shared);
                move || worker_loop(source, shared, config)
            })
            .map_err(PrefetchError::WorkerSpawn)?;

        Ok(Self {
            shared,
            worker: Some(worker),
        })
    }

    /// Take the oldest buffered item, or `None` when nothing is cached.
    ///
    /// Never blocks beyond the internal mutex. On success the freed slot
    /// is immediately eligible for reuse and the worker is signalled to
    /// refill; the returned item belongs exclusively to the caller.
    pub fn pop(&self) -> Option<T> {
        let item = self.shared.ring.lock().unwrap().pop();
        if item.is_some() {
            self.shared.wake.notify_one();
        }
        item
    }

    /// Snapshot of the number of buffered items.
    ///
    /// Purely informational: the value may be stale the instant this
    /// returns, since the worker keeps filling concurrently.
    pub fn cached_count(&self) -> usize {
        self.shared.ring.lock().unwrap().len()
    }

    /// The configured prefetch depth.
    pub fn depth(&self) -> usize {
        self.shared.depth
    }

    /// Stop the worker and release every still-buffered item.
    ///
    /// Blocks until the worker has exited. Safe to call more than once;
    /// `Drop` calls it as well.
    pub fn shutdown(&mut self) {
        {
            // Holding the ring mutex here means the worker is either
            // before its own flag check (and will see the flag) or
            // already parked on the condvar (and gets the notification);
            // the wakeup cannot be lost.
            let _ring = self.shared.ring.lock().unwrap();
            self.shared.shutdown.store(true, Ordering::Release);
            self.shared.wake.notify_all();
        }
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                warn!("prefetch worker thread panicked");
            }
        }
    }
}

impl<T: Send + 'static> Drop for ImagePrefetcher<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// The worker alternates between two states: filling (calling the fetch
/// source while the ring is below the target depth) and idle wait (parked
/// on the condvar until a pop or shutdown).
fn worker_loop<S: FetchSource>(mut source: S, shared: Arc<Shared<S::Item>>, config: PrefetchConfig) {
    debug!(depth = shared.depth, "prefetch worker started");
    let mut retry_delay = config.retry_initial_delay;

    loop {
        if shared.shutdown.load(Ordering::Acquire) {
            break;
        }

        let cached = shared.ring.lock().unwrap().len();
        if cached < shared.depth {
            // Fetch with the lock released: the consumer must be able to
            // pop while a download is in flight.
            match source.fetch() {
                Ok(item) => {
                    retry_delay = config.retry_initial_delay;
                    let mut ring = shared.ring.lock().unwrap();
                    match ring.try_push(item) {
                        Ok(()) => {
                            trace!(cached = ring.len(), "item buffered");
                        }
                        Err(_item) => {
                            // Ring filled up between the count check and
                            // the insert; keep the older items.
                            debug!("ring full, dropping freshly fetched item");
                        }
                    }
                }
                Err(err) => {
                    warn!(
                        error = %err,
                        delay_ms = retry_delay.as_millis() as u64,
                        "fetch failed, backing off"
                    );
                    // Sleep on the condvar so shutdown can cut the wait
                    // short. Shutdown may have been requested during the
                    // failed fetch: re-check under the lock, where the
                    // flag store cannot slip past us into a lost wakeup.
                    let guard = shared.ring.lock().unwrap();
                    if !shared.shutdown.load(Ordering::Acquire) {
                        let _ = shared.wake.wait_timeout(guard, retry_delay).unwrap();
                    }
                    retry_delay = (retry_delay * 2).min(config.retry_max_delay);
                }
            }
        } else {
            // Target depth reached: park until a pop frees a slot.
            let mut ring = shared.ring.lock().unwrap();
            while ring.len() >= shared.depth && !shared.shutdown.load(Ordering::Acquire) {
                ring = shared.wake.wait(ring).unwrap();
            }
        }
    }

    debug!("prefetch worker stopped");
}
