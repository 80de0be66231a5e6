use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// File extensions (lowercase, no dot) treated as video.
pub const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "mov", "webm", "mkv", "avi"];

#[derive(Clone, Debug)]
/// Prepared raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Wrap straight-alpha RGBA8 pixels, premultiplying them.
    pub fn from_straight(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let mut rgba8_premul = img.into_raw();
        premultiply_rgba8_in_place(&mut rgba8_premul);
        Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        }
    }
}

/// A visual input, identified by path and classified by extension.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum VisualAsset {
    /// Still image; no intrinsic duration.
    Image(PathBuf),
    /// Video clip; its audio is never used.
    Video(PathBuf),
}

impl VisualAsset {
    /// Classify `path` as video when its extension is in [`VIDEO_EXTENSIONS`], image otherwise.
    pub fn classify(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if is_video_path(&path) {
            Self::Video(path)
        } else {
            Self::Image(path)
        }
    }

    /// Source path.
    pub fn path(&self) -> &Path {
        match self {
            Self::Image(p) | Self::Video(p) => p,
        }
    }

    /// Return `true` for [`VisualAsset::Video`].
    pub fn is_video(&self) -> bool {
        matches!(self, Self::Video(_))
    }
}

/// Return `true` when the extension of `path` names a video container.
pub fn is_video_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| VIDEO_EXTENSIONS.contains(&e.as_str()))
}

/// Split mixed paths into `(images, videos)`, preserving order.
pub fn partition_assets<I, P>(paths: I) -> (Vec<PathBuf>, Vec<PathBuf>)
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    paths
        .into_iter()
        .map(Into::into)
        .partition(|p: &PathBuf| !is_video_path(p))
}

/// Choose the asset list for one render: videos when any are supplied, images otherwise.
///
/// The two kinds are never mixed within one render.
pub fn select_visual_assets(image_paths: &[PathBuf], video_paths: &[PathBuf]) -> Vec<VisualAsset> {
    if video_paths.is_empty() {
        image_paths
            .iter()
            .map(|p| VisualAsset::Image(p.clone()))
            .collect()
    } else {
        video_paths
            .iter()
            .map(|p| VisualAsset::Video(p.clone()))
            .collect()
    }
}

/// Decode an image file into straight-alpha RGBA8.
pub fn decode_image_file(path: &Path) -> ReelResult<image::RgbaImage> {
    let bytes = std::fs::read(path).map_err(|e| {
        ReelError::media(format!("failed to read image '{}': {e}", path.display()))
    })?;
    decode_image(&bytes).map_err(|e| ReelError::media(format!("{}: {e}", path.display())))
}

/// Decode encoded image bytes into straight-alpha RGBA8.
pub fn decode_image(bytes: &[u8]) -> ReelResult<image::RgbaImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| ReelError::media(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(ReelError::media("decoded image has zero size"));
    }
    Ok(rgba)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
