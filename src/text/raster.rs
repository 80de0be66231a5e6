use std::path::Path;

use anyhow::Context;
use kurbo::Shape;

use crate::assets::decode::PreparedImage;
use crate::config::{ComposeConfig, TextStyle};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::text::font::{FontSource, resolve_font};
use crate::text::layout::{LineBox, TextBrushRgba8, TextLayoutEngine, line_box, wrap_greedy};

/// Renders wrapped text onto a translucent rounded backdrop, sized to its content.
pub struct TextRasterizer {
    engine: TextLayoutEngine,
    font: vello_cpu::peniko::FontData,
    style: TextStyle,
    max_line_width_px: f32,
}

impl TextRasterizer {
    /// Build a rasterizer for `font`, wrapping lines at `max_line_width_px`.
    pub fn new(font: &FontSource, style: TextStyle, max_line_width_px: f32) -> ReelResult<Self> {
        if !max_line_width_px.is_finite() || max_line_width_px <= 0.0 {
            return Err(ReelError::validation(
                "max line width must be finite and > 0",
            ));
        }
        let engine = TextLayoutEngine::new(font)?;
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font.bytes.as_ref().clone()),
            font.index,
        );
        Ok(Self {
            engine,
            font,
            style,
            max_line_width_px,
        })
    }

    /// Resolve the configured font and wrap at the configured caption width.
    pub fn from_config(cfg: &ComposeConfig) -> ReelResult<Self> {
        let font = resolve_font(&cfg.text.font)?;
        tracing::info!(origin = %font.origin, "overlay font resolved");
        Self::new(&font, cfg.text.clone(), cfg.caption_max_width_px())
    }

    /// Wrap `text` into lines without rendering.
    pub fn wrap(&mut self, text: &str) -> ReelResult<Vec<String>> {
        let size = self.style.font.size_px;
        let engine = &mut self.engine;
        wrap_greedy(text, self.max_line_width_px, |trial| {
            engine.measure(trial, size).map(|b| b.width)
        })
    }

    /// Rasterize `text`. Returns `None` when the text has no visible words.
    pub fn rasterize(&mut self, text: &str) -> ReelResult<Option<PreparedImage>> {
        let lines = self.wrap(text)?;
        if lines.is_empty() {
            return Ok(None);
        }

        let size = self.style.font.size_px;
        let brush = TextBrushRgba8::from(self.style.text_rgba);
        let mut laid_out = Vec::with_capacity(lines.len());
        for line in &lines {
            let layout = self.engine.layout_line(line, size, brush)?;
            let extent = line_box(&layout);
            laid_out.push((layout, extent));
        }

        let extents: Vec<LineBox> = laid_out.iter().map(|(_, b)| *b).collect();
        let (width, height) = bitmap_size(&extents, &self.style);
        let w16: u16 = width
            .try_into()
            .map_err(|_| ReelError::validation("text bitmap width exceeds u16"))?;
        let h16: u16 = height
            .try_into()
            .map_err(|_| ReelError::validation("text bitmap height exceeds u16"))?;

        let mut ctx = vello_cpu::RenderContext::new(w16, h16);

        let [br, bg, bb, ba] = self.style.backdrop_rgba;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(br, bg, bb, ba));
        ctx.fill_path(&rounded_backdrop(
            f64::from(width),
            f64::from(height),
            self.style.corner_radius_px,
        ));

        let pad = self.style.padding_px as f32;
        let mut y = pad;
        for (layout, extent) in &laid_out {
            let x = ((width as f32 - extent.width) / 2.0).floor().max(0.0);
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                f64::from(x),
                f64::from(y),
            )));
            for line in layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let b = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(b.r, b.g, b.b, b.a));
                    let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&self.font)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
            y += extent.height + self.style.line_spacing_px as f32;
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);

        tracing::debug!(lines = lines.len(), width, height, "rasterized text overlay");
        Ok(Some(PreparedImage {
            width,
            height,
            rgba8_premul: std::sync::Arc::new(pixmap.data_as_u8_slice().to_vec()),
        }))
    }
}

/// Bitmap size for wrapped lines: widest line plus padding by summed heights plus spacing and
/// padding.
pub(crate) fn bitmap_size(lines: &[LineBox], style: &TextStyle) -> (u32, u32) {
    let max_w = lines.iter().map(|l| l.width).fold(0.0f32, f32::max);
    let sum_h: f32 = lines.iter().map(|l| l.height).sum();
    let gaps = lines.len().saturating_sub(1) as u32 * style.line_spacing_px;
    let pad2 = style.padding_px * 2;
    let width = (max_w.ceil() as u32).saturating_add(pad2).max(1);
    let height = (sum_h.ceil() as u32)
        .saturating_add(gaps)
        .saturating_add(pad2)
        .max(1);
    (width, height)
}

fn rounded_backdrop(width: f64, height: f64, radius: f64) -> vello_cpu::kurbo::BezPath {
    let radius = radius.min(width / 2.0).min(height / 2.0).max(0.0);
    let rect = kurbo::RoundedRect::new(0.0, 0.0, width, height, radius);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in rect.path_elements(0.1) {
        match el {
            kurbo::PathEl::MoveTo(p) => out.move_to((p.x, p.y)),
            kurbo::PathEl::LineTo(p) => out.line_to((p.x, p.y)),
            kurbo::PathEl::QuadTo(a, b) => out.quad_to((a.x, a.y), (b.x, b.y)),
            kurbo::PathEl::CurveTo(a, b, c) => out.curve_to((a.x, a.y), (b.x, b.y), (c.x, c.y)),
            kurbo::PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Write a premultiplied bitmap as a straight-alpha PNG.
pub fn write_png(img: &PreparedImage, path: &Path) -> ReelResult<()> {
    let mut straight = img.rgba8_premul.as_ref().clone();
    unpremultiply_rgba8_in_place(&mut straight);
    image::save_buffer_with_format(
        path,
        &straight,
        img.width,
        img.height,
        image::ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write overlay png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/text/raster.rs"]
mod tests;
