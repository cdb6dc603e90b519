//! Standby animation shown while the cache is still warming up.

use image::{Rgba, RgbaImage};

/// Animated Lissajous trail.
///
/// Drawn while the prefetcher has nothing to show yet, so a freshly booted
/// frame displays motion instead of a black screen. Advance `t` a little
/// between frames (about 0.02 per frame at 30 fps).
pub struct IdlePattern {
    width: u32,
    height: u32,
}

impl IdlePattern {
    const TRAIL: u32 = 2000;

    /// Create a pattern generator for the given screen geometry.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Render the frame for animation time `t`.
    pub fn frame(&self, t: f64) -> RgbaImage {
        let mut canvas = RgbaImage::from_pixel(self.width, self.height, Rgba([0, 0, 0, 255]));

        let cx = self.width as f64 / 2.0 + 40.0 * (t * 0.5).sin();
        let cy = self.height as f64 / 2.0;
        let rx = cx - 20.0;
        let ry = cy - 20.0;

        let a = 3.0;
        let b = 2.0;
        let delta = std::f64::consts::PI * (t * 0.8).sin();

        for i in 0..Self::TRAIL {
            let p = t + f64::from(i) * (2.0 * std::f64::consts::PI / f64::from(Self::TRAIL));
            let x = (cx + rx * (a * p + delta).sin()) as i64;
            let y = (cy + ry * (b * p).sin()) as i64;

            // Brightness rises along the trail so the head glows.
            let brightness = 128 + (127 * i / Self::TRAIL) as u8;
            for dy in -1..=1 {
                for dx in -1..=1 {
                    self.set_pixel(&mut canvas, x + dx, y + dy, brightness);
                }
            }
        }

        canvas
    }

    fn set_pixel(&self, canvas: &mut RgbaImage, x: i64, y: i64, val: u8) {
        if x < 0 || x >= i64::from(self.width) || y < 0 || y >= i64::from(self.height) {
            return;
        }
        canvas.put_pixel(x as u32, y as u32, Rgba([val, val, val, 255]));
    }
}
