//! PicFrame - networked picture frame client
//!
//! This library implements a client that registers with a remote image
//! server, prefetches encoded images in the background, and displays them
//! on a local screen (typically the Linux framebuffer).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   fetch()   ┌──────────────────┐   pop()   ┌──────────┐
//! │ ImageServer  │ ──────────▶ │ ImagePrefetcher  │ ────────▶ │ Renderer │
//! │ (HTTP GET)   │             │ (bounded ring)   │           │ (screen) │
//! └──────────────┘             └──────────────────┘           └──────────┘
//! ```
//!
//! The [`prefetch`] module is the heart of the system: a background worker
//! keeps a fixed-capacity ring of encoded images filled so the display loop
//! never waits on network latency. The [`client`] module implements the
//! image server handshake and download, [`render`] decodes and composes
//! frames, and [`screen`] writes them to the output device.

pub mod client;
pub mod logging;
pub mod prefetch;
pub mod render;
pub mod screen;

/// Version of the PicFrame library and CLI.
///
/// This is synchronized across all components in the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
