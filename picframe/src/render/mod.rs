//! Frame rendering.
//!
//! Turns the opaque byte buffers popped from the prefetcher into
//! screen-sized RGBA frames ([`FrameComposer`]), and animates a standby
//! pattern while nothing is cached yet ([`IdlePattern`]).

mod composer;
mod idle;

pub use composer::FrameComposer;
pub use idle::IdlePattern;

use thiserror::Error;

/// Errors from frame composition.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The fetched bytes are not a decodable image.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}
