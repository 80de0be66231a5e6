//! Caption timing.
//!
//! Two interchangeable strategies produce [`CaptionSegment`]s: an external transcriber
//! ([`transcribe`]) and a proportional allocation over the narration text ([`timing`]). The
//! caller tries transcription first and falls back explicitly via [`resolve_segments`].

/// Proportional (text-length based) caption timing.
pub mod timing;
/// External transcription strategy and the fallback policy.
pub mod transcribe;

/// One caption timing unit, in seconds relative to narration start.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaptionSegment {
    /// Caption text.
    pub text: String,
    /// Inclusive start time in seconds.
    pub start: f64,
    /// Exclusive end time in seconds.
    pub end: f64,
}

impl CaptionSegment {
    /// Create a segment.
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Length of the visibility window in seconds (may be `<= 0` for degenerate segments).
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Return `true` when the segment has a non-empty window (`end > start`).
    pub fn is_renderable(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.end > self.start
    }
}

/// Load caption segments from a JSON array of `{text, start, end}` objects.
pub fn load_segments(path: &std::path::Path) -> crate::ReelResult<Vec<CaptionSegment>> {
    use anyhow::Context as _;

    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read captions '{}'", path.display()))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| crate::ReelError::serde(format!("{}: {e}", path.display())))
}

pub use timing::{naive_segments, naive_segments_with_floor, split_sentences};
pub use transcribe::{
    ResolvedCaptions, TimingOutcome, TimingStrategy, Transcriber, WhisperCli, WhisperCliOpts,
    resolve_segments,
};
