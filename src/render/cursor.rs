use crate::assets::media::MediaInfo;
use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange, Rgba8Premul};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::premultiply_rgba8_in_place;
use crate::render::FrameRGBA;
use crate::timeline::{ClipSource, Timeline};
use crate::transform::fit::FitCrop;

/// Sequential canvas-sized RGBA8 frames of one video clip.
pub trait VideoFrames {
    /// Next frame (straight alpha); implementations hold the last frame once exhausted.
    fn next_frame(&mut self) -> ReelResult<&[u8]>;
}

/// Opens frame sources for video clips.
pub trait VideoOpener {
    /// Open the leading `duration_sec` of `info`, fitted with `crop` to `canvas` at `fps`.
    fn open(
        &mut self,
        info: &MediaInfo,
        crop: FitCrop,
        canvas: Canvas,
        fps: Fps,
        duration_sec: f64,
    ) -> ReelResult<Box<dyn VideoFrames>>;
}

/// [`VideoOpener`] spawning one `ffmpeg` decode per clip.
#[derive(Clone, Copy, Debug, Default)]
pub struct FfmpegVideoOpener;

#[cfg(feature = "media-ffmpeg")]
impl VideoFrames for crate::assets::media::VideoFrameStream {
    fn next_frame(&mut self) -> ReelResult<&[u8]> {
        crate::assets::media::VideoFrameStream::next_frame(self)
    }
}

impl VideoOpener for FfmpegVideoOpener {
    #[cfg(feature = "media-ffmpeg")]
    fn open(
        &mut self,
        info: &MediaInfo,
        crop: FitCrop,
        canvas: Canvas,
        fps: Fps,
        duration_sec: f64,
    ) -> ReelResult<Box<dyn VideoFrames>> {
        let stream =
            crate::assets::media::VideoFrameStream::open(info, crop, canvas, fps, duration_sec)?;
        Ok(Box::new(stream))
    }

    #[cfg(not(feature = "media-ffmpeg"))]
    fn open(
        &mut self,
        _info: &MediaInfo,
        _crop: FitCrop,
        _canvas: Canvas,
        _fps: Fps,
        _duration_sec: f64,
    ) -> ReelResult<Box<dyn VideoFrames>> {
        Err(ReelError::media(
            "video decoding requires the 'media-ffmpeg' feature",
        ))
    }
}

enum ActiveClip {
    Pending,
    Streaming(Box<dyn VideoFrames>),
    Failed,
}

/// Produces base-track frames for ascending frame indices.
///
/// Each clip owns the frames of its `[start, end)` window. Frames outside every clip (after the
/// covered part of an under-covered timeline) show the filler color. A video clip that fails to
/// open or decode is logged once and shows filler for its remaining frames.
pub struct TimelineCursor<'a> {
    timeline: &'a Timeline,
    opener: &'a mut dyn VideoOpener,
    canvas: Canvas,
    fps: Fps,
    filler: Rgba8Premul,
    ranges: Vec<FrameRange>,
    clip_idx: usize,
    active: ActiveClip,
    last_frame: Option<u64>,
}

impl<'a> TimelineCursor<'a> {
    /// Cursor over `timeline` rendered at `canvas`/`fps`.
    pub fn new(
        timeline: &'a Timeline,
        opener: &'a mut dyn VideoOpener,
        canvas: Canvas,
        fps: Fps,
        filler_rgb: [u8; 3],
    ) -> Self {
        let ranges = timeline
            .clips
            .iter()
            .map(|c| FrameRange::from_secs(c.start_sec, c.end_sec(), fps))
            .collect();
        Self {
            timeline,
            opener,
            canvas,
            fps,
            filler: Rgba8Premul::opaque(filler_rgb[0], filler_rgb[1], filler_rgb[2]),
            ranges,
            clip_idx: 0,
            active: ActiveClip::Pending,
            last_frame: None,
        }
    }

    /// Write the base frame for `frame` into `out`. Frames must be requested in ascending order.
    pub fn fill_base(&mut self, frame: FrameIndex, out: &mut FrameRGBA) -> ReelResult<()> {
        if out.canvas() != self.canvas || out.data.len() != self.canvas.rgba_len() {
            return Err(ReelError::validation(
                "base frame buffer does not match the canvas",
            ));
        }
        if self.last_frame.is_some_and(|last| frame.0 <= last) {
            return Err(ReelError::validation(
                "base frames must be requested in ascending order",
            ));
        }
        self.last_frame = Some(frame.0);
        out.premultiplied = true;

        while self.clip_idx < self.ranges.len() && self.ranges[self.clip_idx].end <= frame {
            self.clip_idx += 1;
            self.active = ActiveClip::Pending;
        }
        let Some(range) = self.ranges.get(self.clip_idx).copied() else {
            super::fill_solid(&mut out.data, self.filler.to_array());
            return Ok(());
        };
        if !range.contains(frame) {
            super::fill_solid(&mut out.data, self.filler.to_array());
            return Ok(());
        }

        let timeline = self.timeline;
        let clip = &timeline.clips[self.clip_idx];
        match &clip.source {
            ClipSource::Filler { rgb } => {
                let px = Rgba8Premul::opaque(rgb[0], rgb[1], rgb[2]);
                super::fill_solid(&mut out.data, px.to_array());
            }
            ClipSource::Image { frame: img } => {
                if img.rgba8_premul.len() != out.data.len() {
                    return Err(ReelError::validation(
                        "image clip is not canvas-sized",
                    ));
                }
                out.data.copy_from_slice(&img.rgba8_premul);
            }
            ClipSource::Video { info, crop } => {
                if matches!(self.active, ActiveClip::Pending) {
                    self.active = match self.opener.open(
                        info,
                        *crop,
                        self.canvas,
                        self.fps,
                        clip.duration_sec,
                    ) {
                        Ok(stream) => ActiveClip::Streaming(stream),
                        Err(e) => {
                            tracing::warn!(
                                path = %info.source_path.display(),
                                error = %e,
                                "video clip unavailable; showing filler"
                            );
                            ActiveClip::Failed
                        }
                    };
                }
                let decoded = match &mut self.active {
                    ActiveClip::Streaming(stream) => match stream.next_frame() {
                        Ok(px) if px.len() == out.data.len() => {
                            out.data.copy_from_slice(px);
                            true
                        }
                        Ok(_) => {
                            tracing::warn!(
                                path = %info.source_path.display(),
                                "decoded frame size mismatch; showing filler"
                            );
                            false
                        }
                        Err(e) => {
                            tracing::warn!(
                                path = %info.source_path.display(),
                                error = %e,
                                "video decode failed; showing filler"
                            );
                            false
                        }
                    },
                    _ => false,
                };
                if decoded {
                    premultiply_rgba8_in_place(&mut out.data);
                } else {
                    self.active = ActiveClip::Failed;
                    super::fill_solid(&mut out.data, self.filler.to_array());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cursor.rs"]
mod tests;
