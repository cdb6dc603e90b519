//! PicFrame CLI - networked picture frame client.
//!
//! Registers with an image server, prefetches images in the background and
//! displays them on the local framebuffer.

mod error;
mod runner;

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "picframe")]
#[command(version = picframe::VERSION)]
#[command(about = "Display images from an image server on the local framebuffer", long_about = None)]
pub struct Args {
    /// Base URL of the image server, e.g. http://frame.local:8080
    #[arg(long)]
    pub server_url: String,

    /// Number of images to prefetch ahead of the slideshow
    #[arg(long, default_value_t = 3)]
    pub prefetch: usize,

    /// Seconds each image stays on screen
    #[arg(long, default_value_t = 10)]
    pub interval_secs: u64,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Framebuffer device to render to
    #[arg(long, default_value = "/dev/fb0")]
    pub fb_device: PathBuf,

    /// Ask the server to overlay an info QR code on each image
    #[arg(long)]
    pub embed_info_qr: bool,

    /// Render to an in-memory screen instead of the framebuffer
    #[arg(long)]
    pub headless: bool,

    /// Enable debug logging (same as RUST_LOG=debug)
    #[arg(long)]
    pub debug: bool,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = runner::run(args) {
        e.exit();
    }
}
