/// `ffmpeg`-backed MP4 sink.
pub mod ffmpeg;
/// Frame sink contract and an in-memory implementation.
pub mod sink;

pub use ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir};
pub use sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
