//! Immutable render configuration.
//!
//! Every tunable the pipeline reads lives here and is fixed at [`crate::Composer`] construction
//! time. Defaults target a 1080x1920 (9:16) 30 fps vertical short.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};

/// Composition settings consumed by the orchestrator.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposeConfig {
    /// Output frame size.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Linear gain applied to the background bed.
    pub bed_gain: f32,
    /// Opacity of the persistent watermark overlay.
    pub watermark_opacity: f32,
    /// Minimum duration of a proportionally timed caption segment.
    pub caption_min_duration_sec: f64,
    /// Minimum slot length for a still image in the asset timeline.
    pub image_min_duration_sec: f64,
    /// Solid color used for the filler clip (straight RGB).
    pub filler_rgb: [u8; 3],
    /// Distance from the bottom edge to the watermark's top edge.
    pub watermark_bottom_offset_px: u32,
    /// Caption and watermark text style.
    pub text: TextStyle,
    /// Keep overlay PNGs in this directory instead of the per-render scratch directory.
    pub overlay_dir: Option<PathBuf>,
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::VERTICAL_HD,
            fps: Fps { num: 30, den: 1 },
            bed_gain: 0.12,
            watermark_opacity: 0.7,
            caption_min_duration_sec: 0.6,
            image_min_duration_sec: 1.5,
            filler_rgb: [10, 10, 10],
            watermark_bottom_offset_px: 200,
            text: TextStyle::default(),
            overlay_dir: None,
            overwrite: true,
        }
    }
}

impl ComposeConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes)
            .map_err(|e| ReelError::serde(format!("{}: {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check invariants the renderer and encoder rely on.
    pub fn validate(&self) -> ReelResult<()> {
        Fps::new(self.fps.num, self.fps.den)?;
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ReelError::validation("canvas width/height must be non-zero"));
        }
        if !self.canvas.width.is_multiple_of(2) || !self.canvas.height.is_multiple_of(2) {
            return Err(ReelError::validation(
                "canvas width/height must be even (required for yuv420p output)",
            ));
        }
        if u16::try_from(self.canvas.width).is_err() || u16::try_from(self.canvas.height).is_err()
        {
            return Err(ReelError::validation("canvas width/height must fit in u16"));
        }
        if !self.bed_gain.is_finite() || self.bed_gain < 0.0 {
            return Err(ReelError::validation("bed_gain must be finite and >= 0"));
        }
        if !(0.0..=1.0).contains(&self.watermark_opacity) {
            return Err(ReelError::validation("watermark_opacity must be in [0, 1]"));
        }
        if !self.caption_min_duration_sec.is_finite() || self.caption_min_duration_sec < 0.0 {
            return Err(ReelError::validation(
                "caption_min_duration_sec must be finite and >= 0",
            ));
        }
        if !self.image_min_duration_sec.is_finite() || self.image_min_duration_sec <= 0.0 {
            return Err(ReelError::validation(
                "image_min_duration_sec must be finite and > 0",
            ));
        }
        if self.watermark_bottom_offset_px > self.canvas.height {
            return Err(ReelError::validation(
                "watermark_bottom_offset_px must not exceed canvas height",
            ));
        }
        self.text.validate(self.canvas)
    }

    /// Maximum caption line width in pixels for this canvas.
    pub fn caption_max_width_px(&self) -> f32 {
        self.canvas
            .width
            .saturating_sub(self.text.side_margin_px.saturating_mul(2))
            .max(1) as f32
    }
}

/// Font selection for overlay text.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    /// Explicit TTF/OTF file. When unset, well-known paths and then system fonts are searched.
    pub path: Option<PathBuf>,
    /// Font size in pixels.
    pub size_px: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: None,
            size_px: 64.0,
        }
    }
}

/// Shared style of caption and watermark bitmaps.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextStyle {
    /// Font selection.
    pub font: FontConfig,
    /// Horizontal margin on each side; line width is capped at `canvas.width - 2 * margin`.
    pub side_margin_px: u32,
    /// Padding between the text block and the backdrop edge.
    pub padding_px: u32,
    /// Vertical gap between wrapped lines.
    pub line_spacing_px: u32,
    /// Backdrop corner radius.
    pub corner_radius_px: f64,
    /// Backdrop color (straight RGBA8).
    pub backdrop_rgba: [u8; 4],
    /// Glyph color (straight RGBA8).
    pub text_rgba: [u8; 4],
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: FontConfig::default(),
            side_margin_px: 60,
            padding_px: 24,
            line_spacing_px: 8,
            corner_radius_px: 20.0,
            backdrop_rgba: [0, 0, 0, 140],
            text_rgba: [255, 255, 255, 255],
        }
    }
}

impl TextStyle {
    fn validate(&self, canvas: Canvas) -> ReelResult<()> {
        if !self.font.size_px.is_finite() || self.font.size_px <= 0.0 {
            return Err(ReelError::validation(
                "text font size_px must be finite and > 0",
            ));
        }
        if self.side_margin_px.saturating_mul(2) >= canvas.width {
            return Err(ReelError::validation(
                "text side_margin_px leaves no room for captions",
            ));
        }
        if !self.corner_radius_px.is_finite() || self.corner_radius_px < 0.0 {
            return Err(ReelError::validation(
                "text corner_radius_px must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
