//! Per-frame compositing of the base track and text overlays.

/// Premultiplied source-over blending and clipped blits.
pub mod composite;
/// Sequential base-track frame source.
pub mod cursor;

pub use composite::{blit_over, centered_origin, fill_solid, over};
pub use cursor::{FfmpegVideoOpener, TimelineCursor, VideoFrames, VideoOpener};

use crate::foundation::core::{Canvas, Rgba8Premul};

#[derive(Clone, Debug)]
/// CPU frame buffer in RGBA8 layout.
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Tightly packed RGBA8 bytes (`width * height * 4`).
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Canvas-sized premultiplied frame filled with `color`.
    pub fn filled(canvas: Canvas, color: Rgba8Premul) -> Self {
        let mut data = vec![0u8; canvas.rgba_len()];
        fill_solid(&mut data, color.to_array());
        Self {
            width: canvas.width,
            height: canvas.height,
            data,
            premultiplied: true,
        }
    }

    /// Frame dimensions as a canvas.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }
}
