//! Media inputs: probing and decoding through `ffprobe`/`ffmpeg`, image decoding, and
//! classification of visual assets.

/// Image decoding and visual asset classification.
pub mod decode;
/// `ffprobe`/`ffmpeg` backed probing and decoding.
pub mod media;
