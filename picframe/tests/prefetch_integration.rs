//! Integration tests for the prefetch cache.
//!
//! These drive [`ImagePrefetcher`] end to end with scripted fetch sources
//! and verify the externally observable contract:
//! - the cache warms up to the configured depth and the worker parks
//! - `pop` never blocks, even while a fetch is in flight
//! - items come out in the order they were fetched
//! - shutdown terminates in bounded time from any worker state
//!
//! Run with: `cargo test --test prefetch_integration`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use picframe::prefetch::{FetchError, FetchSource, ImagePrefetcher, PrefetchConfig};

// ============================================================================
// Scripted fetch sources
// ============================================================================

/// Produces sequentially numbered single-byte images, as fast as asked.
struct CountingSource {
    calls: Arc<AtomicUsize>,
}

impl CountingSource {
    fn new() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl FetchSource for CountingSource {
    type Item = Vec<u8>;

    fn fetch(&mut self) -> Result<Vec<u8>, FetchError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(vec![n as u8])
    }
}

/// Blocks each fetch until the test sends a tick through the gate, then
/// produces the next numbered image. Lets tests control exactly when the
/// worker makes progress.
struct GatedSource {
    gate: Receiver<()>,
    produced: u8,
}

impl GatedSource {
    fn new() -> (Self, Sender<()>) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                gate: rx,
                produced: 0,
            },
            tx,
        )
    }
}

impl FetchSource for GatedSource {
    type Item = Vec<u8>;

    fn fetch(&mut self) -> Result<Vec<u8>, FetchError> {
        self.gate
            .recv()
            .map_err(|_| FetchError::Source("gate closed".to_string()))?;
        self.produced += 1;
        Ok(vec![self.produced])
    }
}

/// Every fetch takes a fixed amount of wall-clock time.
struct SlowSource {
    delay: Duration,
    produced: u8,
}

impl FetchSource for SlowSource {
    type Item = Vec<u8>;

    fn fetch(&mut self) -> Result<Vec<u8>, FetchError> {
        thread::sleep(self.delay);
        self.produced += 1;
        Ok(vec![self.produced])
    }
}

/// Never produces an image; counts the attempts.
struct FailingSource {
    attempts: Arc<AtomicUsize>,
}

impl FetchSource for FailingSource {
    type Item = Vec<u8>;

    fn fetch(&mut self) -> Result<Vec<u8>, FetchError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(FetchError::Http("HTTP 503 from upstream".to_string()))
    }
}

/// Every fetch takes a fixed amount of wall-clock time and then fails,
/// like a download hitting an unreachable server's connect timeout.
struct SlowFailingSource {
    delay: Duration,
}

impl FetchSource for SlowFailingSource {
    type Item = Vec<u8>;

    fn fetch(&mut self) -> Result<Vec<u8>, FetchError> {
        thread::sleep(self.delay);
        Err(FetchError::Http("connect timed out".to_string()))
    }
}

/// Item whose drop is counted, standing in for an image buffer. Lets
/// tests account for the ownership of everything the worker ever fetched.
struct TrackedImage {
    drops: Arc<AtomicUsize>,
}

impl Drop for TrackedImage {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

struct TrackedSource {
    produced: Arc<AtomicUsize>,
    drops: Arc<AtomicUsize>,
}

impl FetchSource for TrackedSource {
    type Item = TrackedImage;

    fn fetch(&mut self) -> Result<TrackedImage, FetchError> {
        self.produced.fetch_add(1, Ordering::SeqCst);
        Ok(TrackedImage {
            drops: Arc::clone(&self.drops),
        })
    }
}

fn wait_for<F: Fn() -> bool>(deadline: Duration, cond: F) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    cond()
}

// ============================================================================
// Warm-up and steady state
// ============================================================================

#[test]
fn cache_warms_up_to_depth_and_stays_there() {
    let (source, calls) = CountingSource::new();
    let prefetcher =
        ImagePrefetcher::start(source, PrefetchConfig::default().with_depth(4)).unwrap();

    assert!(
        wait_for(Duration::from_secs(2), || prefetcher.cached_count() == 4),
        "cache never reached the target depth"
    );

    // No pops happen, so the worker must settle: the count pins at the
    // depth and no further fetches are issued.
    thread::sleep(Duration::from_millis(150));
    assert_eq!(prefetcher.cached_count(), 4);
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[test]
fn cached_count_never_exceeds_depth() {
    let (source, _calls) = CountingSource::new();
    let prefetcher =
        ImagePrefetcher::start(source, PrefetchConfig::default().with_depth(3)).unwrap();

    let deadline = Instant::now() + Duration::from_millis(300);
    while Instant::now() < deadline {
        assert!(prefetcher.cached_count() <= 3);
        let _ = prefetcher.pop();
    }
}

// ============================================================================
// Non-blocking consumer
// ============================================================================

#[test]
fn pop_on_empty_cache_returns_immediately() {
    let (source, gate) = GatedSource::new();
    let prefetcher =
        ImagePrefetcher::start(source, PrefetchConfig::default().with_depth(2)).unwrap();

    // The gate never opens, so the worker sits inside fetch() forever
    // while the consumer polls freely.
    let start = Instant::now();
    for _ in 0..10 {
        assert_eq!(prefetcher.pop(), None);
    }
    assert!(
        start.elapsed() < Duration::from_millis(100),
        "pop must not wait on the in-flight fetch"
    );

    drop(gate); // unblocks the worker so shutdown can join it
}

#[test]
fn pop_does_not_block_while_fetch_is_slow() {
    let source = SlowSource {
        delay: Duration::from_millis(200),
        produced: 0,
    };
    let prefetcher =
        ImagePrefetcher::start(source, PrefetchConfig::default().with_depth(2)).unwrap();

    let start = Instant::now();
    let _ = prefetcher.pop();
    let _ = prefetcher.cached_count();
    assert!(start.elapsed() < Duration::from_millis(50));
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn images_pop_in_fetch_order_with_depth_one() {
    let (source, gate) = GatedSource::new();
    let prefetcher =
        ImagePrefetcher::start(source, PrefetchConfig::default().with_depth(1)).unwrap();

    // Nothing fetched yet.
    assert_eq!(prefetcher.pop(), None);

    gate.send(()).unwrap();
    assert!(wait_for(Duration::from_secs(1), || {
        prefetcher.cached_count() == 1
    }));
    assert_eq!(prefetcher.pop(), Some(vec![1]));

    gate.send(()).unwrap();
    assert!(wait_for(Duration::from_secs(1), || {
        prefetcher.cached_count() == 1
    }));
    assert_eq!(prefetcher.pop(), Some(vec![2]));
}

#[test]
fn images_pop_in_fetch_order_across_interleavings() {
    let (source, gate) = GatedSource::new();
    let prefetcher =
        ImagePrefetcher::start(source, PrefetchConfig::default().with_depth(3)).unwrap();

    let mut expected = 1u8;
    // Alternate bursts of fills with bursts of pops.
    for burst in [3usize, 1, 2, 3] {
        for _ in 0..burst {
            gate.send(()).unwrap();
        }
        assert!(wait_for(Duration::from_secs(1), || {
            prefetcher.cached_count() == burst
        }));
        for _ in 0..burst {
            assert_eq!(prefetcher.pop(), Some(vec![expected]));
            expected += 1;
        }
    }
}

// ============================================================================
// Failure handling
// ============================================================================

#[test]
fn fetch_failures_stay_invisible_to_the_consumer() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let source = FailingSource {
        attempts: Arc::clone(&attempts),
    };
    let config = PrefetchConfig::default()
        .with_depth(2)
        .with_retry_initial_delay(Duration::from_millis(5))
        .with_retry_max_delay(Duration::from_millis(20));
    let prefetcher = ImagePrefetcher::start(source, config).unwrap();

    // The worker keeps retrying with backoff...
    assert!(wait_for(Duration::from_secs(1), || {
        attempts.load(Ordering::SeqCst) >= 3
    }));
    // ...while the consumer just sees an empty cache.
    assert_eq!(prefetcher.pop(), None);
    assert_eq!(prefetcher.cached_count(), 0);
}

#[test]
fn backoff_throttles_a_permanently_failing_source() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let source = FailingSource {
        attempts: Arc::clone(&attempts),
    };
    let config = PrefetchConfig::default()
        .with_depth(1)
        .with_retry_initial_delay(Duration::from_millis(50))
        .with_retry_max_delay(Duration::from_millis(200));
    let _prefetcher = ImagePrefetcher::start(source, config).unwrap();

    thread::sleep(Duration::from_millis(300));
    // 50 + 100 + 200 + ... of waiting: a busy-loop would rack up
    // thousands of attempts in 300ms.
    assert!(attempts.load(Ordering::SeqCst) <= 6);
}

// ============================================================================
// Shutdown
// ============================================================================

#[test]
fn shutdown_from_idle_wait_is_prompt() {
    let (source, _calls) = CountingSource::new();
    let mut prefetcher =
        ImagePrefetcher::start(source, PrefetchConfig::default().with_depth(2)).unwrap();

    assert!(wait_for(Duration::from_secs(2), || {
        prefetcher.cached_count() == 2
    }));

    // Worker is parked on the condvar now.
    let start = Instant::now();
    prefetcher.shutdown();
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[test]
fn shutdown_waits_out_an_in_flight_fetch() {
    let source = SlowSource {
        delay: Duration::from_millis(200),
        produced: 0,
    };
    let mut prefetcher =
        ImagePrefetcher::start(source, PrefetchConfig::default().with_depth(2)).unwrap();

    // Shut down while a fetch is almost certainly in flight. The join is
    // bounded by one fetch duration, not by the remaining fill work.
    thread::sleep(Duration::from_millis(50));
    let start = Instant::now();
    prefetcher.shutdown();
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[test]
fn shutdown_cuts_retry_backoff_short() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let source = FailingSource {
        attempts: Arc::clone(&attempts),
    };
    let config = PrefetchConfig::default()
        .with_depth(1)
        .with_retry_initial_delay(Duration::from_secs(30))
        .with_retry_max_delay(Duration::from_secs(30));
    let mut prefetcher = ImagePrefetcher::start(source, config).unwrap();

    // Give the worker time to fail once and enter its 30s backoff wait.
    assert!(wait_for(Duration::from_secs(1), || {
        attempts.load(Ordering::SeqCst) >= 1
    }));

    let start = Instant::now();
    prefetcher.shutdown();
    assert!(
        start.elapsed() < Duration::from_secs(1),
        "shutdown must interrupt the backoff wait"
    );
}

#[test]
fn shutdown_during_a_failing_fetch_never_sleeps_out_the_backoff() {
    // The shutdown request lands while the worker is inside a fetch that
    // is about to fail. The worker must notice the request when it next
    // reaches the backoff wait instead of sleeping the full delay: the
    // join is bounded by the fetch, not by retry_max_delay.
    let source = SlowFailingSource {
        delay: Duration::from_millis(200),
    };
    let config = PrefetchConfig::default()
        .with_depth(1)
        .with_retry_initial_delay(Duration::from_secs(30))
        .with_retry_max_delay(Duration::from_secs(30));
    let mut prefetcher = ImagePrefetcher::start(source, config).unwrap();

    thread::sleep(Duration::from_millis(100));
    let start = Instant::now();
    prefetcher.shutdown();
    assert!(
        start.elapsed() < Duration::from_secs(2),
        "shutdown took {:?}, worker slept out its backoff",
        start.elapsed()
    );
}

#[test]
fn every_fetched_item_is_dropped_exactly_once() {
    let produced = Arc::new(AtomicUsize::new(0));
    let drops = Arc::new(AtomicUsize::new(0));
    let source = TrackedSource {
        produced: Arc::clone(&produced),
        drops: Arc::clone(&drops),
    };
    let prefetcher =
        ImagePrefetcher::start(source, PrefetchConfig::default().with_depth(3)).unwrap();

    assert!(wait_for(Duration::from_secs(2), || {
        prefetcher.cached_count() == 3
    }));

    // Take one item out; the worker refills the freed slot.
    let held = prefetcher.pop();
    assert!(held.is_some());
    assert!(wait_for(Duration::from_secs(2), || {
        prefetcher.cached_count() == 3
    }));
    assert_eq!(produced.load(Ordering::SeqCst), 4);
    assert_eq!(drops.load(Ordering::SeqCst), 0);

    // Tearing the cache down releases exactly the three buffered items;
    // the popped one is untouched because the consumer owns it now.
    drop(prefetcher);
    assert_eq!(produced.load(Ordering::SeqCst), 4);
    assert_eq!(drops.load(Ordering::SeqCst), 3);

    drop(held);
    assert_eq!(drops.load(Ordering::SeqCst), 4);
}

#[test]
fn drop_shuts_the_worker_down() {
    let (source, calls) = CountingSource::new();
    {
        let prefetcher =
            ImagePrefetcher::start(source, PrefetchConfig::default().with_depth(2)).unwrap();
        assert!(wait_for(Duration::from_secs(2), || {
            prefetcher.cached_count() == 2
        }));
    }
    // Worker is gone; the fetch count cannot move anymore.
    let settled = calls.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(100));
    assert_eq!(calls.load(Ordering::SeqCst), settled);
}
