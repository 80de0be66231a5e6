use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::config::FontConfig;
use crate::foundation::error::{ReelError, ReelResult};

/// Font files probed, in order, when no explicit path is configured.
pub const WELL_KNOWN_FONT_PATHS: [&str; 3] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Raw font bytes plus the face index inside them.
#[derive(Clone, Debug)]
pub struct FontSource {
    /// File contents (TTF/OTF/TTC).
    pub bytes: Arc<Vec<u8>>,
    /// Face index within a collection; 0 for single-face files.
    pub index: u32,
    /// Where the font came from, for logging.
    pub origin: String,
}

impl FontSource {
    /// Read a font file from disk.
    pub fn from_file(path: &Path) -> ReelResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        if bytes.is_empty() {
            return Err(ReelError::validation(format!(
                "font file '{}' is empty",
                path.display()
            )));
        }
        Ok(Self {
            bytes: Arc::new(bytes),
            index: 0,
            origin: path.display().to_string(),
        })
    }
}

/// Resolve the overlay font.
///
/// Order: the configured path (an error if it cannot be read), then [`WELL_KNOWN_FONT_PATHS`],
/// then the best system sans-serif face with bold preferred. When nothing resolves the result is
/// [`ReelError::Unavailable`].
pub fn resolve_font(cfg: &FontConfig) -> ReelResult<FontSource> {
    if let Some(path) = &cfg.path {
        return FontSource::from_file(path);
    }

    let candidates: Vec<PathBuf> = WELL_KNOWN_FONT_PATHS.iter().map(PathBuf::from).collect();
    if let Some(found) = first_readable(&candidates) {
        tracing::debug!(origin = %found.origin, "resolved overlay font from well-known path");
        return Ok(found);
    }

    if let Some(found) = system_sans_serif() {
        tracing::debug!(origin = %found.origin, "resolved overlay font from system fonts");
        return Ok(found);
    }

    Err(ReelError::unavailable(
        "no usable font: set text.font.path or install a sans-serif system font",
    ))
}

fn first_readable(candidates: &[PathBuf]) -> Option<FontSource> {
    candidates
        .iter()
        .filter(|p| p.is_file())
        .find_map(|p| FontSource::from_file(p).ok())
}

fn system_sans_serif() -> Option<FontSource> {
    use usvg::fontdb::{Database, Family, Query, Stretch, Style, Weight};

    let mut db = Database::new();
    db.load_system_fonts();

    let id = [Weight::BOLD, Weight::NORMAL].into_iter().find_map(|weight| {
        db.query(&Query {
            families: &[Family::SansSerif],
            weight,
            stretch: Stretch::Normal,
            style: Style::Normal,
        })
    })?;

    let origin = db
        .face(id)
        .map(|f| format!("system:{}", f.post_script_name))
        .unwrap_or_else(|| "system".to_string());
    let (bytes, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
    if bytes.is_empty() {
        return None;
    }
    Some(FontSource {
        bytes: Arc::new(bytes),
        index,
        origin,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/text/font.rs"]
mod tests;
