use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::decode::{PreparedImage, select_visual_assets};
use crate::assets::media::{MIX_SAMPLE_RATE, decode_audio_f32_stereo};
use crate::audio::mix::{mix_narration_and_bed, write_mix_to_f32le_file};
use crate::captions::CaptionSegment;
use crate::config::ComposeConfig;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, FrameRange, Rgba8Premul};
use crate::foundation::error::ReelResult;
use crate::render::composite::{blit_over, centered_origin};
use crate::render::cursor::{FfmpegVideoOpener, TimelineCursor, VideoOpener};
use crate::render::FrameRGBA;
use crate::text::raster::{TextRasterizer, write_png};
use crate::timeline::{MediaLoader, Timeline, build_timeline};

/// Inputs of one render.
#[derive(Clone, Debug, Default)]
pub struct ComposeRequest {
    /// Narration audio; its decoded length is the output duration.
    pub narration_path: PathBuf,
    /// Still images, used only when no videos are given.
    pub image_paths: Vec<PathBuf>,
    /// Video clips; their own audio is ignored.
    pub video_paths: Vec<PathBuf>,
    /// Caption timing; segments with `end <= start` are ignored.
    pub captions: Vec<CaptionSegment>,
    /// Persistent watermark text.
    pub watermark_text: String,
    /// Optional background bed.
    pub bgm_path: Option<PathBuf>,
    /// Destination MP4.
    pub output_path: PathBuf,
}

/// A positioned bitmap visible over a frame range.
#[derive(Clone, Debug)]
pub struct Overlay {
    /// Premultiplied bitmap.
    pub image: Arc<PreparedImage>,
    /// Left edge on the canvas (may be negative).
    pub x: i64,
    /// Top edge on the canvas (may be negative).
    pub y: i64,
    /// Frames on which the overlay is drawn.
    pub frames: FrameRange,
    /// Opacity multiplier.
    pub opacity: f32,
}

/// All overlays of a render, in compositing order.
#[derive(Clone, Debug, Default)]
pub struct OverlayPlan {
    /// Persistent watermark, drawn first.
    pub watermark: Option<Overlay>,
    /// Captions in input order; later captions draw over earlier ones where they overlap.
    pub captions: Vec<Overlay>,
}

/// Renders vertical shorts with a fixed configuration.
#[derive(Clone, Debug)]
pub struct Composer {
    cfg: ComposeConfig,
}

impl Composer {
    /// Validate `cfg` and build a composer.
    pub fn new(cfg: ComposeConfig) -> ReelResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Active configuration.
    pub fn config(&self) -> &ComposeConfig {
        &self.cfg
    }

    /// Number of output frames for a `duration_sec` narration (at least one).
    pub fn frame_count(&self, duration_sec: f64) -> u64 {
        self.cfg.fps.secs_to_frames_ceil(duration_sec).max(1)
    }

    /// Render `req` to `req.output_path` and return that path.
    ///
    /// Asset, bed, font and per-overlay failures are logged and skipped. Narration and encoder
    /// failures are terminal; a partially written output is removed.
    #[tracing::instrument(skip_all, fields(output = %req.output_path.display()))]
    pub fn compose(&self, req: &ComposeRequest) -> ReelResult<PathBuf> {
        let work = tempfile::Builder::new()
            .prefix("reelsmith-")
            .tempdir()
            .map_err(|e| anyhow::anyhow!("create render work dir: {e}"))?;

        let narration = decode_audio_f32_stereo(&req.narration_path, MIX_SAMPLE_RATE)?;
        let duration_sec = narration.duration_sec();
        tracing::info!(duration_sec, "narration decoded");

        let assets = select_visual_assets(&req.image_paths, &req.video_paths);
        let mut loader = MediaLoader::new(self.cfg.canvas);
        let timeline = build_timeline(duration_sec, &assets, &mut loader, &self.cfg);
        tracing::info!(
            assets = assets.len(),
            clips = timeline.clips.len(),
            covered_sec = timeline.covered_sec(),
            "visual timeline built"
        );

        let overlay_dir = match &self.cfg.overlay_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)
                    .map_err(|e| anyhow::anyhow!("create overlay dir '{}': {e}", dir.display()))?;
                dir.clone()
            }
            None => work.path().to_path_buf(),
        };
        let mut raster = self.overlay_rasterizer(&req.watermark_text, &req.captions);
        let overlays = self.plan_overlays(
            raster.as_mut(),
            &req.watermark_text,
            &req.captions,
            duration_sec,
            Some(&overlay_dir),
        )?;
        tracing::info!(captions = overlays.captions.len(), "overlays rasterized");

        let mix = mix_narration_and_bed(&narration, req.bgm_path.as_deref(), self.cfg.bed_gain)?;
        let mix_path = work.path().join("mix.f32le");
        write_mix_to_f32le_file(&mix, &mix_path)?;
        let audio = AudioInputConfig {
            path: mix_path,
            sample_rate: narration.sample_rate,
            channels: 2,
        };

        let existed_before = req.output_path.exists();
        let mut sink = FfmpegSink::new(FfmpegSinkOpts::for_output(&req.output_path, &self.cfg));
        let rendered = self.render_to_sink(
            &timeline,
            &overlays,
            &mut FfmpegVideoOpener,
            &mut sink,
            Some(audio),
        );
        drop(sink);

        match rendered {
            Ok(frames) => {
                tracing::info!(frames, "render complete");
                Ok(req.output_path.clone())
            }
            Err(e) => {
                if (self.cfg.overwrite || !existed_before) && req.output_path.exists() {
                    if let Err(rm) = std::fs::remove_file(&req.output_path) {
                        tracing::warn!(error = %rm, "could not remove partial output");
                    }
                }
                Err(e)
            }
        }
    }

    /// Build the overlay rasterizer, or `None` when nothing will be drawn.
    ///
    /// The font is only resolved when the watermark or a renderable caption has visible text. A
    /// font that cannot be resolved is logged and the render proceeds without overlays.
    pub fn overlay_rasterizer(
        &self,
        watermark_text: &str,
        captions: &[CaptionSegment],
    ) -> Option<TextRasterizer> {
        let has_text = !watermark_text.trim().is_empty()
            || captions
                .iter()
                .any(|seg| seg.is_renderable() && !seg.text.trim().is_empty());
        if !has_text {
            return None;
        }
        match TextRasterizer::from_config(&self.cfg) {
            Ok(raster) => Some(raster),
            Err(e) => {
                tracing::warn!(error = %e, "overlay font unavailable; rendering without text");
                None
            }
        }
    }

    /// Rasterize the watermark and captions and place them on the timeline.
    ///
    /// When `persist_dir` is given each bitmap is also written there as `wm.png` or
    /// `cap_<start ms>.png`. Blank texts, segments with `end <= start` and windows past the end
    /// produce no overlay. A text that fails to rasterize is logged and skipped. Without a
    /// rasterizer the plan is empty.
    pub fn plan_overlays(
        &self,
        raster: Option<&mut TextRasterizer>,
        watermark_text: &str,
        captions: &[CaptionSegment],
        duration_sec: f64,
        persist_dir: Option<&Path>,
    ) -> ReelResult<OverlayPlan> {
        let mut plan = OverlayPlan::default();
        let Some(raster) = raster else {
            return Ok(plan);
        };
        let canvas = self.cfg.canvas;
        let total = self.frame_count(duration_sec);

        if let Some(img) = rasterize_or_skip(raster, watermark_text, "watermark") {
            if let Some(dir) = persist_dir {
                write_png(&img, &dir.join("wm.png"))?;
            }
            let x = centered_origin(canvas.width, canvas.height, img.width, img.height).0;
            let y = i64::from(canvas.height) - i64::from(self.cfg.watermark_bottom_offset_px);
            plan.watermark = Some(Overlay {
                image: Arc::new(img),
                x,
                y,
                frames: FrameRange {
                    start: FrameIndex(0),
                    end: FrameIndex(total),
                },
                opacity: self.cfg.watermark_opacity,
            });
        }

        for seg in captions {
            if !seg.is_renderable() {
                tracing::debug!(start = seg.start, end = seg.end, "skipping empty caption window");
                continue;
            }
            let mut frames = FrameRange::from_secs(seg.start, seg.end, self.cfg.fps);
            frames.end = FrameIndex(frames.end.0.min(total));
            frames.start = FrameIndex(frames.start.0.min(frames.end.0));
            if frames.is_empty() {
                tracing::debug!(start = seg.start, end = seg.end, "caption window has no frames");
                continue;
            }
            let Some(img) = rasterize_or_skip(raster, &seg.text, "caption") else {
                continue;
            };
            if let Some(dir) = persist_dir {
                let name = format!("cap_{}.png", (seg.start * 1000.0) as i64);
                write_png(&img, &dir.join(name))?;
            }
            let (x, y) = centered_origin(canvas.width, canvas.height, img.width, img.height);
            plan.captions.push(Overlay {
                image: Arc::new(img),
                x,
                y,
                frames,
                opacity: 1.0,
            });
        }

        Ok(plan)
    }

    /// Composite every output frame and stream it into `sink`. Returns the frame count.
    pub fn render_to_sink(
        &self,
        timeline: &Timeline,
        overlays: &OverlayPlan,
        opener: &mut dyn VideoOpener,
        sink: &mut dyn FrameSink,
        audio: Option<AudioInputConfig>,
    ) -> ReelResult<u64> {
        let canvas = self.cfg.canvas;
        let total = self.frame_count(timeline.duration_sec);

        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps: self.cfg.fps,
            audio,
        })?;

        let [r, g, b] = self.cfg.filler_rgb;
        let mut frame = FrameRGBA::filled(canvas, Rgba8Premul::opaque(r, g, b));
        let mut cursor =
            TimelineCursor::new(timeline, opener, canvas, self.cfg.fps, self.cfg.filler_rgb);

        for f in 0..total {
            let idx = FrameIndex(f);
            cursor.fill_base(idx, &mut frame)?;
            for overlay in overlays.watermark.iter().chain(overlays.captions.iter()) {
                if overlay.frames.contains(idx) {
                    blit_over(&mut frame, &overlay.image, overlay.x, overlay.y, overlay.opacity)?;
                }
            }
            sink.push_frame(idx, &frame)?;
            if f > 0 && f % 300 == 0 {
                tracing::debug!(frame = f, total, "render progress");
            }
        }

        sink.end()?;
        Ok(total)
    }
}

fn rasterize_or_skip(
    raster: &mut TextRasterizer,
    text: &str,
    kind: &str,
) -> Option<PreparedImage> {
    match raster.rasterize(text) {
        Ok(img) => img,
        Err(e) => {
            tracing::warn!(error = %e, kind, "text overlay skipped");
            None
        }
    }
}

/// Render one short with `cfg`.
///
/// Convenience wrapper over [`Composer::compose`] taking the inputs positionally.
#[allow(clippy::too_many_arguments)]
pub fn compose_video(
    cfg: ComposeConfig,
    narration_path: &Path,
    image_paths: &[PathBuf],
    video_paths: &[PathBuf],
    captions: &[CaptionSegment],
    watermark_text: &str,
    bgm_path: Option<&Path>,
    output_path: &Path,
) -> ReelResult<PathBuf> {
    let composer = Composer::new(cfg)?;
    composer.compose(&ComposeRequest {
        narration_path: narration_path.to_path_buf(),
        image_paths: image_paths.to_vec(),
        video_paths: video_paths.to_vec(),
        captions: captions.to_vec(),
        watermark_text: watermark_text.to_string(),
        bgm_path: bgm_path.map(Path::to_path_buf),
        output_path: output_path.to_path_buf(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/orchestrator.rs"]
mod tests;
