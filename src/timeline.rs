//! Asset Timeline Builder: cyclic, bounded reuse of visual assets to cover the narration.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::assets::decode::{PreparedImage, VisualAsset, decode_image_file};
use crate::assets::media::{MediaInfo, probe_media};
use crate::config::ComposeConfig;
use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use crate::transform::fit::{FitCrop, fit_image};

/// Safety bound on builder iterations, as a multiple of the asset count.
///
/// Degenerate (zero or near-zero duration) assets would otherwise keep the loop alive forever.
pub const ITERATION_CAP_FACTOR: usize = 5;

/// A visual asset after probing or decoding, ready to be placed on the timeline.
#[derive(Clone, Debug)]
pub enum LoadedAsset {
    /// Video clip, decoded later per clip with `crop` applied.
    Video {
        /// Probed metadata.
        info: Arc<MediaInfo>,
        /// Fit crop for the source dimensions.
        crop: FitCrop,
    },
    /// Still image already fitted to the canvas.
    Image {
        /// Canvas-sized premultiplied frame.
        frame: Arc<PreparedImage>,
    },
}

/// Loads visual assets for one render.
pub trait AssetLoader {
    /// Probe or decode `asset`. Errors are asset-level and skipped by the builder.
    fn load(&mut self, asset: &VisualAsset) -> ReelResult<LoadedAsset>;
}

/// [`AssetLoader`] backed by `ffprobe` for videos and the `image` crate for stills.
///
/// Results (including failures) are memoized per path for the lifetime of the loader, which is
/// one render.
pub struct MediaLoader {
    canvas: Canvas,
    cache: HashMap<PathBuf, Result<LoadedAsset, String>>,
}

impl MediaLoader {
    /// Loader fitting to `canvas`.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            cache: HashMap::new(),
        }
    }

    fn load_uncached(&self, asset: &VisualAsset) -> ReelResult<LoadedAsset> {
        match asset {
            VisualAsset::Video(path) => {
                let info = probe_media(path)?;
                if !info.has_video || info.width == 0 || info.height == 0 {
                    return Err(ReelError::media(format!(
                        "'{}' has no decodable video stream",
                        path.display()
                    )));
                }
                let crop = FitCrop::compute(info.width, info.height, self.canvas)?;
                Ok(LoadedAsset::Video {
                    info: Arc::new(info),
                    crop,
                })
            }
            VisualAsset::Image(path) => {
                let img = decode_image_file(path)?;
                let fitted = fit_image(&img, self.canvas)?;
                Ok(LoadedAsset::Image {
                    frame: Arc::new(PreparedImage::from_straight(fitted)),
                })
            }
        }
    }
}

impl AssetLoader for MediaLoader {
    fn load(&mut self, asset: &VisualAsset) -> ReelResult<LoadedAsset> {
        let key = asset.path().to_path_buf();
        if !self.cache.contains_key(&key) {
            let loaded = self.load_uncached(asset).map_err(|e| e.to_string());
            self.cache.insert(key.clone(), loaded);
        }
        match self.cache.get(&key) {
            Some(Ok(loaded)) => Ok(loaded.clone()),
            Some(Err(msg)) => Err(ReelError::media(msg.clone())),
            None => Err(ReelError::media("asset cache miss (unexpected)")),
        }
    }
}

/// Visual content of one timeline clip.
#[derive(Clone, Debug)]
pub enum ClipSource {
    /// Leading sub-clip of a video.
    Video {
        /// Probed metadata.
        info: Arc<MediaInfo>,
        /// Fit crop.
        crop: FitCrop,
    },
    /// Still image held for the clip.
    Image {
        /// Canvas-sized premultiplied frame.
        frame: Arc<PreparedImage>,
    },
    /// Solid color.
    Filler {
        /// Opaque fill color.
        rgb: [u8; 3],
    },
}

/// One placed clip.
#[derive(Clone, Debug)]
pub struct TimelineClip {
    /// What is shown.
    pub source: ClipSource,
    /// Index into the input asset list, `None` for filler.
    pub asset_index: Option<usize>,
    /// Placement on the output timeline, in seconds.
    pub start_sec: f64,
    /// Length in seconds.
    pub duration_sec: f64,
}

impl TimelineClip {
    /// Exclusive end on the output timeline.
    pub fn end_sec(&self) -> f64 {
        self.start_sec + self.duration_sec
    }
}

/// Ordered, gapless clip sequence whose nominal length is the narration duration.
#[derive(Clone, Debug)]
pub struct Timeline {
    /// Clips in playback order; each starts where the previous ended.
    pub clips: Vec<TimelineClip>,
    /// Output duration (the narration duration).
    pub duration_sec: f64,
}

impl Timeline {
    /// Seconds actually covered by clips; never more than `duration_sec`.
    pub fn covered_sec(&self) -> f64 {
        self.clips.last().map_or(0.0, TimelineClip::end_sec)
    }
}

/// Build the visual base timeline covering `duration_sec`.
///
/// Assets are reused cyclically. Videos contribute a leading sub-clip of
/// `min(video duration, remaining)`; images hold for
/// `min(max(image_min_duration_sec, D / len), remaining)`. The loop ends once the timeline is
/// covered or after `len * ITERATION_CAP_FACTOR` iterations. Assets that fail to load are skipped.
/// With no assets at all the timeline is a single filler clip spanning `duration_sec`.
pub fn build_timeline(
    duration_sec: f64,
    assets: &[VisualAsset],
    loader: &mut dyn AssetLoader,
    cfg: &ComposeConfig,
) -> Timeline {
    let duration_sec = if duration_sec.is_finite() {
        duration_sec.max(0.0)
    } else {
        0.0
    };

    if assets.is_empty() {
        tracing::info!(duration_sec, "no visual assets; using filler clip");
        return Timeline {
            clips: vec![TimelineClip {
                source: ClipSource::Filler {
                    rgb: cfg.filler_rgb,
                },
                asset_index: None,
                start_sec: 0.0,
                duration_sec,
            }],
            duration_sec,
        };
    }

    let len = assets.len();
    let cap = len.saturating_mul(ITERATION_CAP_FACTOR);
    let image_slot = cfg.image_min_duration_sec.max(duration_sec / len as f64);

    let mut clips = Vec::new();
    let mut t = 0.0f64;
    let mut idx = 0usize;
    while t < duration_sec && idx < cap {
        let asset_index = idx % len;
        let asset = &assets[asset_index];
        idx += 1;

        let loaded = match loader.load(asset) {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!(path = %asset.path().display(), error = %e, "skipping visual asset");
                continue;
            }
        };

        let remaining = duration_sec - t;
        let (source, wanted) = match loaded {
            LoadedAsset::Video { info, crop } => {
                let wanted = info.duration_sec;
                (ClipSource::Video { info, crop }, wanted)
            }
            LoadedAsset::Image { frame } => (ClipSource::Image { frame }, image_slot),
        };
        let slot = wanted.min(remaining);
        if slot <= 0.0 {
            tracing::debug!(path = %asset.path().display(), "asset contributes no duration");
            continue;
        }

        clips.push(TimelineClip {
            source,
            asset_index: Some(asset_index),
            start_sec: t,
            duration_sec: slot,
        });
        t = if slot >= remaining {
            duration_sec
        } else {
            t + slot
        };
    }

    if t < duration_sec {
        tracing::warn!(
            covered_sec = t,
            duration_sec,
            iterations = idx,
            "visual assets under-cover narration; remainder shows filler"
        );
    }
    tracing::debug!(clips = clips.len(), covered_sec = t, "timeline built");

    Timeline {
        clips,
        duration_sec,
    }
}

#[cfg(test)]
#[path = "../tests/unit/timeline/timeline.rs"]
mod tests;
