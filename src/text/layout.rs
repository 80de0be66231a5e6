use crate::foundation::error::{ReelError, ReelResult};
use crate::text::font::FontSource;

/// Parley brush carrying a straight RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl From<[u8; 4]> for TextBrushRgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

/// Measured extent of one laid-out line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineBox {
    /// Horizontal advance in pixels.
    pub width: f32,
    /// `ascent + descent + leading` in pixels.
    pub height: f32,
}

/// Stateful helper building single-line Parley layouts against one registered font.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
}

impl TextLayoutEngine {
    /// Register `font` and keep its family for every subsequent layout.
    pub fn new(font: &FontSource) -> ReelResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes.as_ref().clone()),
            None,
        );
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            ReelError::validation(format!("no font families registered from '{}'", font.origin))
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ReelError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
        })
    }

    /// Family name resolved from the registered font.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Lay out `text` on a single unbounded line.
    pub fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> ReelResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ReelError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Measure `text` as one line.
    pub fn measure(&mut self, text: &str, size_px: f32) -> ReelResult<LineBox> {
        let layout = self.layout_line(text, size_px, TextBrushRgba8::default())?;
        Ok(line_box(&layout))
    }
}

/// Extent of the first line of `layout`, or zero for an empty layout.
pub(crate) fn line_box(layout: &parley::Layout<TextBrushRgba8>) -> LineBox {
    layout
        .lines()
        .next()
        .map(|line| {
            let m = line.metrics();
            LineBox {
                width: m.advance,
                height: m.ascent + m.descent + m.leading,
            }
        })
        .unwrap_or(LineBox {
            width: 0.0,
            height: 0.0,
        })
}

/// Greedy word wrap.
///
/// Words (whitespace-separated) are appended to the current line while the measured width of the
/// trial line stays within `max_width`; otherwise the current line is closed and the word starts a
/// new one. A single word wider than `max_width` occupies its own line and is never split.
pub fn wrap_greedy<F>(text: &str, max_width: f32, mut measure: F) -> ReelResult<Vec<String>>
where
    F: FnMut(&str) -> ReelResult<f32>,
{
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let trial = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        if measure(&trial)? > max_width && !line.is_empty() {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        } else {
            line = trial;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    Ok(lines)
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
