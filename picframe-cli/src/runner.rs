//! The slideshow loop.
//!
//! Wires the collaborators together: opens the screen, registers with the
//! image server, starts the prefetcher and then alternates between the
//! idle animation (while the cache warms up) and the slideshow. Ctrl-C
//! (or SIGTERM) flips a flag that the loop observes within one frame time.

use crate::error::CliError;
use crate::Args;
use picframe::client::{ClientConfig, ImageDownloader, ReqwestClient, ServerSession};
use picframe::logging;
use picframe::prefetch::{ImagePrefetcher, PrefetchConfig};
use picframe::render::{FrameComposer, IdlePattern};
use picframe::screen::{FramebufferScreen, MemoryScreen, Screen};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Geometry used for `--headless` runs, where no device dictates one.
const HEADLESS_WIDTH: u32 = 1280;
const HEADLESS_HEIGHT: u32 = 720;

/// Time per idle-animation frame (about 30 fps), which is also the
/// shutdown responsiveness of the loop.
const FRAME_TIME: Duration = Duration::from_millis(33);

pub fn run(args: Args) -> Result<(), CliError> {
    let default_level = if args.debug { "debug" } else { "info" };
    let _logging_guard = logging::init_logging(
        logging::default_log_dir(),
        logging::default_log_file(),
        default_level,
    )
    .map_err(CliError::LoggingInit)?;

    info!(version = picframe::VERSION, "picframe starting");

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || {
            running.store(false, Ordering::SeqCst);
        })
        .map_err(|e| CliError::Signal(e.to_string()))?;
    }

    let mut screen: Box<dyn Screen> = if args.headless {
        info!(
            width = HEADLESS_WIDTH,
            height = HEADLESS_HEIGHT,
            "running headless"
        );
        Box::new(MemoryScreen::new(HEADLESS_WIDTH, HEADLESS_HEIGHT))
    } else {
        Box::new(FramebufferScreen::open(&args.fb_device).map_err(CliError::Screen)?)
    };
    let (width, height) = (screen.width(), screen.height());

    let http = ReqwestClient::with_timeout(args.timeout_secs).map_err(CliError::Client)?;
    let config = ClientConfig::new(&args.server_url, width, height)
        .with_embed_info_qr(args.embed_info_qr)
        .with_http_timeout_secs(args.timeout_secs);
    let session = ServerSession::register(&http, &config).map_err(CliError::Client)?;

    let downloader = ImageDownloader::new(http, &session);
    let mut prefetcher = ImagePrefetcher::start(
        downloader,
        PrefetchConfig::default().with_depth(args.prefetch),
    )
    .map_err(CliError::Prefetch)?;

    let composer = FrameComposer::new(width, height);
    let idle = IdlePattern::new(width, height);
    let interval = Duration::from_secs(args.interval_secs);

    let mut t = 0.0;
    let mut showing_image = false;
    let mut next_image_at = Instant::now();

    while running.load(Ordering::SeqCst) {
        if Instant::now() >= next_image_at {
            match prefetcher.pop() {
                Some(bytes) => match composer.compose(&bytes) {
                    Ok(frame) => {
                        screen.present(&frame).map_err(CliError::Screen)?;
                        showing_image = true;
                        next_image_at = Instant::now() + interval;
                        debug!(
                            cached = prefetcher.cached_count(),
                            "presented next image"
                        );
                    }
                    Err(e) => {
                        // Skip the broken image; the next loop turn pops
                        // the following one.
                        warn!(error = %e, "discarding undecodable image");
                    }
                },
                None => debug!("no image cached yet"),
            }
        }

        if !showing_image {
            let frame = idle.frame(t);
            t += 0.02;
            screen.present(&frame).map_err(CliError::Screen)?;
        }

        thread::sleep(FRAME_TIME);
    }

    info!("shutting down");
    prefetcher.shutdown();
    if let Err(e) = screen.clear() {
        warn!(error = %e, "failed to blank screen on exit");
    }
    info!("clean exit");
    Ok(())
}
