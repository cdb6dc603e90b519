//! In-memory screen for tests and headless runs.

use super::{Screen, ScreenError};
use image::RgbaImage;

/// Screen that keeps the last presented frame in memory.
pub struct MemoryScreen {
    width: u32,
    height: u32,
    last_frame: Option<RgbaImage>,
    presented: usize,
}

impl MemoryScreen {
    /// Create a screen with the given geometry.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            last_frame: None,
            presented: 0,
        }
    }

    /// The most recently presented frame, if any.
    pub fn last_frame(&self) -> Option<&RgbaImage> {
        self.last_frame.as_ref()
    }

    /// Number of frames presented so far.
    pub fn present_count(&self) -> usize {
        self.presented
    }
}

impl Screen for MemoryScreen {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn present(&mut self, frame: &RgbaImage) -> Result<(), ScreenError> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(ScreenError::FrameSize {
                expected_w: self.width,
                expected_h: self.height,
                actual_w: frame.width(),
                actual_h: frame.height(),
            });
        }
        self.last_frame = Some(frame.clone());
        self.presented += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ScreenError> {
        self.last_frame = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_present_stores_frame() {
        let mut screen = MemoryScreen::new(4, 4);
        let frame = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));

        screen.present(&frame).unwrap();
        assert_eq!(screen.present_count(), 1);
        assert_eq!(screen.last_frame().unwrap().get_pixel(0, 0)[0], 1);
    }

    #[test]
    fn test_present_rejects_wrong_size() {
        let mut screen = MemoryScreen::new(4, 4);
        let frame = RgbaImage::new(2, 2);

        let result = screen.present(&frame);
        assert!(matches!(result, Err(ScreenError::FrameSize { .. })));
        assert_eq!(screen.present_count(), 0);
    }

    #[test]
    fn test_clear_drops_frame() {
        let mut screen = MemoryScreen::new(4, 4);
        screen.present(&RgbaImage::new(4, 4)).unwrap();

        screen.clear().unwrap();
        assert!(screen.last_frame().is_none());
    }
}
