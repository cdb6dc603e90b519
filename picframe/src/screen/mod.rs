//! Display output surfaces.
//!
//! A [`Screen`] receives fully composed RGBA frames sized exactly to its
//! own geometry. The production implementation is the Linux framebuffer
//! ([`FramebufferScreen`]); [`MemoryScreen`] backs tests and headless
//! runs.

mod framebuffer;
mod memory;

pub use framebuffer::FramebufferScreen;
pub use memory::MemoryScreen;

use image::RgbaImage;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from a display surface.
#[derive(Debug, Error)]
pub enum ScreenError {
    /// The output device could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Querying the device geometry failed.
    #[error("framebuffer ioctl failed: {0}")]
    Ioctl(io::Error),

    /// Mapping the device memory failed.
    #[error("failed to map framebuffer memory: {0}")]
    Map(io::Error),

    /// The device reports a pixel depth this client cannot drive.
    #[error("unsupported framebuffer depth: {0} bpp (need 16 or 32)")]
    UnsupportedDepth(u32),

    /// The presented frame does not match the screen geometry.
    #[error("frame is {actual_w}x{actual_h}, screen is {expected_w}x{expected_h}")]
    FrameSize {
        expected_w: u32,
        expected_h: u32,
        actual_w: u32,
        actual_h: u32,
    },
}

/// A display surface with fixed geometry.
pub trait Screen {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Write a frame to the display.
    ///
    /// The frame must match the screen's own width and height exactly;
    /// scaling and letterboxing happen in the renderer.
    fn present(&mut self, frame: &RgbaImage) -> Result<(), ScreenError>;

    /// Blank the display.
    fn clear(&mut self) -> Result<(), ScreenError>;
}
