//! Decode and letterbox images to the screen geometry.

use super::RenderError;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tracing::trace;

/// Composes encoded images into screen-sized frames.
///
/// The image is decoded, scaled to fit the screen while preserving its
/// aspect ratio, and centered on a black canvas.
pub struct FrameComposer {
    width: u32,
    height: u32,
}

impl FrameComposer {
    /// Create a composer for the given screen geometry.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Decode `encoded` and produce a frame of exactly the screen size.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Decode`] when the bytes are not an image the
    /// `image` crate can decode.
    pub fn compose(&self, encoded: &[u8]) -> Result<RgbaImage, RenderError> {
        let decoded = image::load_from_memory(encoded)?.to_rgba8();
        trace!(
            src_w = decoded.width(),
            src_h = decoded.height(),
            "decoded image"
        );

        if decoded.width() == self.width && decoded.height() == self.height {
            return Ok(decoded);
        }

        let scale = f64::min(
            self.width as f64 / decoded.width() as f64,
            self.height as f64 / decoded.height() as f64,
        );
        let target_w = ((decoded.width() as f64 * scale) as u32).max(1);
        let target_h = ((decoded.height() as f64 * scale) as u32).max(1);
        let scaled = imageops::resize(&decoded, target_w, target_h, FilterType::Triangle);

        let mut canvas = RgbaImage::from_pixel(self.width, self.height, Rgba([0, 0, 0, 255]));
        let x = (self.width - target_w) / 2;
        let y = (self.height - target_h) / 2;
        imageops::overlay(&mut canvas, &scaled, x as i64, y as i64);
        Ok(canvas)
    }
}
