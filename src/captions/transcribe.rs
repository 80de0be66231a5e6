use std::path::Path;
use std::process::Command;

use tracing::{info, warn};

use crate::assets::media::is_tool_on_path;
use crate::captions::CaptionSegment;
use crate::captions::timing::naive_segments_with_floor;
use crate::foundation::error::{ReelError, ReelResult};

/// Speech-to-text capability that times captions against rendered narration audio.
pub trait Transcriber {
    /// Short human-readable name used in logs.
    fn name(&self) -> &str;

    /// Transcribe `audio_path` into ordered segments.
    ///
    /// Any failure (tool missing, model error, unparseable output) is reported as an error; the
    /// caller decides whether to fall back.
    fn transcribe(&self, audio_path: &Path) -> ReelResult<Vec<CaptionSegment>>;
}

/// Which timing strategy produced a set of segments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingStrategy {
    /// Segments came from an external transcriber.
    Transcription,
    /// Segments came from proportional allocation over the narration text.
    Proportional,
}

/// Result of attempting one timing strategy.
#[derive(Clone, Debug, PartialEq)]
pub enum TimingOutcome {
    /// The strategy produced segments.
    Timed(Vec<CaptionSegment>),
    /// The strategy could not run; the payload says why.
    Unavailable(String),
}

impl TimingOutcome {
    /// Run `transcriber` over `audio_path`, folding every failure into [`TimingOutcome::Unavailable`].
    pub fn from_transcriber(transcriber: &dyn Transcriber, audio_path: &Path) -> Self {
        match transcriber.transcribe(audio_path) {
            Ok(segments) => Self::Timed(segments),
            Err(e) => Self::Unavailable(format!("{}: {e}", transcriber.name())),
        }
    }
}

/// Segments together with the strategy that produced them.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedCaptions {
    /// Strategy that produced `segments`.
    pub strategy: TimingStrategy,
    /// Caption segments in emission order.
    pub segments: Vec<CaptionSegment>,
}

/// Time captions, preferring transcription and falling back to proportional allocation.
///
/// `measure_duration` is only invoked on fallback; the proportional strategy never decodes audio
/// itself. Its error is returned as-is because without a narration duration no timing is possible.
pub fn resolve_segments(
    transcriber: Option<&dyn Transcriber>,
    audio_path: &Path,
    text: &str,
    min_segment_sec: f64,
    measure_duration: impl FnOnce() -> ReelResult<f64>,
) -> ReelResult<ResolvedCaptions> {
    let outcome = match transcriber {
        Some(t) => TimingOutcome::from_transcriber(t, audio_path),
        None => TimingOutcome::Unavailable("no transcriber configured".to_string()),
    };

    match outcome {
        TimingOutcome::Timed(segments) => {
            info!(count = segments.len(), "captions timed by transcription");
            Ok(ResolvedCaptions {
                strategy: TimingStrategy::Transcription,
                segments,
            })
        }
        TimingOutcome::Unavailable(reason) => {
            warn!(%reason, "transcription unavailable, using proportional caption timing");
            let duration = measure_duration()?;
            let segments = naive_segments_with_floor(text, duration, min_segment_sec);
            Ok(ResolvedCaptions {
                strategy: TimingStrategy::Proportional,
                segments,
            })
        }
    }
}

/// Options for [`WhisperCli`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WhisperCliOpts {
    /// Executable name or path.
    pub program: String,
    /// Whisper model name.
    pub model: String,
    /// Spoken language hint; auto-detected when unset.
    pub language: Option<String>,
}

impl Default for WhisperCliOpts {
    fn default() -> Self {
        Self {
            program: "whisper".to_string(),
            model: "tiny".to_string(),
            language: None,
        }
    }
}

/// [`Transcriber`] backed by the `whisper` command-line tool.
#[derive(Clone, Debug, Default)]
pub struct WhisperCli {
    opts: WhisperCliOpts,
}

impl WhisperCli {
    /// Create a transcriber with the given options.
    pub fn new(opts: WhisperCliOpts) -> Self {
        Self { opts }
    }
}

impl Transcriber for WhisperCli {
    fn name(&self) -> &str {
        "whisper"
    }

    fn transcribe(&self, audio_path: &Path) -> ReelResult<Vec<CaptionSegment>> {
        if !is_tool_on_path(&self.opts.program, "--help") {
            return Err(ReelError::unavailable(format!(
                "'{}' not found on PATH; install openai-whisper for accurate caption timing",
                self.opts.program
            )));
        }

        let out_dir = tempfile::tempdir()
            .map_err(|e| ReelError::unavailable(format!("failed to create scratch dir: {e}")))?;
        let mut cmd = Command::new(&self.opts.program);
        cmd.arg(audio_path)
            .args(["--model", &self.opts.model])
            .args(["--output_format", "json", "--verbose", "False"])
            .arg("--output_dir")
            .arg(out_dir.path());
        if let Some(lang) = &self.opts.language {
            cmd.args(["--language", lang]);
        }

        let out = cmd
            .output()
            .map_err(|e| ReelError::unavailable(format!("failed to run whisper: {e}")))?;
        if !out.status.success() {
            return Err(ReelError::unavailable(format!(
                "whisper exited with status {}: {}",
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        let stem = audio_path
            .file_stem()
            .ok_or_else(|| ReelError::validation("audio path has no file name"))?;
        let mut json_name = stem.to_os_string();
        json_name.push(".json");
        let json_path = out_dir.path().join(json_name);
        let bytes = std::fs::read(&json_path).map_err(|e| {
            ReelError::unavailable(format!(
                "whisper output '{}' missing: {e}",
                json_path.display()
            ))
        })?;
        parse_whisper_json(&bytes)
    }
}

/// Parse whisper's JSON transcript into trimmed caption segments.
pub fn parse_whisper_json(bytes: &[u8]) -> ReelResult<Vec<CaptionSegment>> {
    #[derive(serde::Deserialize)]
    struct WhisperSegment {
        #[serde(default)]
        text: String,
        start: f64,
        end: f64,
    }
    #[derive(serde::Deserialize)]
    struct WhisperOut {
        #[serde(default)]
        segments: Vec<WhisperSegment>,
    }

    let parsed: WhisperOut = serde_json::from_slice(bytes)
        .map_err(|e| ReelError::serde(format!("whisper json parse failed: {e}")))?;
    Ok(parsed
        .segments
        .into_iter()
        .map(|s| CaptionSegment::new(s.text.trim(), s.start, s.end))
        .collect())
}

#[cfg(test)]
#[path = "../../tests/unit/captions/transcribe.rs"]
mod tests;
