//! reelsmith assembles vertical short-form videos.
//!
//! A render takes a narration track, a pool of stock images or video clips, caption timing and a
//! watermark, and produces a 1080x1920 H.264/AAC MP4:
//!
//! - time captions with [`captions::resolve_segments`] (transcription first, proportional fallback)
//! - build a [`Composer`] from a [`ComposeConfig`]
//! - call [`Composer::compose`] with a [`ComposeRequest`]
//!
//! Media IO shells out to the system `ffmpeg`/`ffprobe` (feature `media-ffmpeg`, on by default).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Visual and audio asset probing, decoding and classification.
pub mod assets;
/// Narration/bed mixing.
pub mod audio;
/// Caption timing strategies.
pub mod captions;
/// Composition Orchestrator.
pub mod compose;
pub mod config;
/// Frame sinks (in-memory and `ffmpeg`).
pub mod encode;
pub mod render;
pub mod text;
pub mod timeline;
/// Geometry transforms applied to visual assets.
pub mod transform;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange, Rgba8Premul};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::assets::decode::{PreparedImage, VisualAsset, partition_assets};
pub use crate::captions::{CaptionSegment, naive_segments, resolve_segments};
pub use crate::compose::{ComposeRequest, Composer, compose_video, output_file_name};
pub use crate::config::{ComposeConfig, FontConfig, TextStyle};
pub use crate::encode::{FfmpegSink, FfmpegSinkOpts, FrameSink, InMemorySink, SinkConfig};
pub use crate::render::FrameRGBA;
pub use crate::transform::fit::FitCrop;
