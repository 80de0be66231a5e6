use std::path::{Path, PathBuf};
use std::process::Command;

use crate::foundation::error::{ReelError, ReelResult};

#[cfg(feature = "media-ffmpeg")]
use crate::foundation::core::{Canvas, Fps};
#[cfg(feature = "media-ffmpeg")]
use crate::transform::fit::FitCrop;

/// Internal audio mixing sample rate used across decode/mix/encode pipeline.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

#[derive(Clone, Debug)]
/// Basic metadata about a probed media file.
pub struct MediaInfo {
    /// Source path used for probing/decoding.
    pub source_path: PathBuf,
    /// Container duration in seconds (0 when unknown).
    pub duration_sec: f64,
    /// Width of the first video stream in pixels (0 without video).
    pub width: u32,
    /// Height of the first video stream in pixels (0 without video).
    pub height: u32,
    /// Whether ffprobe detected at least one video stream.
    pub has_video: bool,
    /// Whether ffprobe detected at least one audio stream.
    pub has_audio: bool,
}

#[derive(Clone, Debug)]
/// Decoded interleaved floating-point PCM.
pub struct AudioPcm {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Interleaved `f32` PCM samples.
    pub interleaved_f32: Vec<f32>,
}

impl AudioPcm {
    /// Number of sample frames (samples per channel).
    pub fn frames(&self) -> u64 {
        if self.channels == 0 {
            return 0;
        }
        (self.interleaved_f32.len() / usize::from(self.channels)) as u64
    }

    /// Decoded length in seconds.
    pub fn duration_sec(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate)
    }
}

/// Return `true` when `program` can be invoked from `PATH`.
pub fn is_tool_on_path(program: &str, probe_arg: &str) -> bool {
    Command::new(program)
        .arg(probe_arg)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Measure an audio file by decoding it at [`MIX_SAMPLE_RATE`].
///
/// This is the same measurement the renderer uses for narration duration.
pub fn audio_duration_sec(path: &Path) -> ReelResult<f64> {
    Ok(decode_audio_f32_stereo(path, MIX_SAMPLE_RATE)?.duration_sec())
}

/// Probe media metadata through `ffprobe`.
#[cfg(feature = "media-ffmpeg")]
pub fn probe_media(source_path: &Path) -> ReelResult<MediaInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| ReelError::media(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(ReelError::media(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| ReelError::media(format!("ffprobe json parse failed: {e}")))?;

    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"));
    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    let format_duration = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .and_then(parse_duration);
    let stream_duration = parsed
        .streams
        .iter()
        .filter_map(|s| s.duration.as_deref().and_then(parse_duration))
        .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.max(d))));

    Ok(MediaInfo {
        source_path: source_path.to_path_buf(),
        duration_sec: format_duration.or(stream_duration).unwrap_or(0.0),
        width: video_stream.and_then(|s| s.width).unwrap_or(0),
        height: video_stream.and_then(|s| s.height).unwrap_or(0),
        has_video: video_stream.is_some(),
        has_audio,
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
/// Probe media metadata through `ffprobe`.
///
/// Returns an error when `media-ffmpeg` feature is disabled.
pub fn probe_media(_source_path: &Path) -> ReelResult<MediaInfo> {
    Err(ReelError::media(
        "video/audio assets require the 'media-ffmpeg' feature",
    ))
}

fn parse_duration(s: &str) -> Option<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
}

#[cfg(feature = "media-ffmpeg")]
/// Decode audio from media source to stereo interleaved `f32` PCM.
pub fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> ReelResult<AudioPcm> {
    let out = Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "2",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| ReelError::media(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        let msg = String::from_utf8_lossy(&out.stderr);
        // ffmpeg reports a missing audio stream as an error; that is silence, not a failure.
        if msg.contains("Stream specifier")
            || msg.contains("matches no streams")
            || msg.contains("Output file #0 does not contain any stream")
        {
            return Ok(AudioPcm {
                sample_rate,
                channels: 2,
                interleaved_f32: Vec::new(),
            });
        }
        return Err(ReelError::media(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            msg.trim()
        )));
    }

    Ok(AudioPcm {
        sample_rate,
        channels: 2,
        interleaved_f32: f32le_bytes_to_samples(&out.stdout)?,
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
/// Decode audio from media source to stereo interleaved `f32` PCM.
///
/// Returns an error when `media-ffmpeg` feature is disabled.
pub fn decode_audio_f32_stereo(_path: &Path, _sample_rate: u32) -> ReelResult<AudioPcm> {
    Err(ReelError::media(
        "video/audio assets require the 'media-ffmpeg' feature",
    ))
}

/// Reinterpret raw little-endian `f32` bytes as samples.
pub(crate) fn f32le_bytes_to_samples(bytes: &[u8]) -> ReelResult<Vec<f32>> {
    if !bytes.len().is_multiple_of(4) {
        return Err(ReelError::media(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Sequential decoder for one timeline clip of a video file.
///
/// One `ffmpeg` process decodes the clip's leading `duration_sec`, applies the fit transform and
/// resamples to the output frame rate, so every frame read is exactly canvas-sized RGBA8. Once
/// the process runs dry the last frame is held.
#[cfg(feature = "media-ffmpeg")]
pub struct VideoFrameStream {
    source_path: PathBuf,
    child: std::process::Child,
    stdout: Option<std::process::ChildStdout>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    frame: Vec<u8>,
    frames_read: u64,
}

#[cfg(feature = "media-ffmpeg")]
impl VideoFrameStream {
    /// Spawn the decoder for the first `duration_sec` seconds of `info`.
    pub fn open(
        info: &MediaInfo,
        crop: FitCrop,
        canvas: Canvas,
        fps: Fps,
        duration_sec: f64,
    ) -> ReelResult<Self> {
        use std::io::Read as _;
        use std::process::Stdio;

        let filter = format!("{},fps={}/{}", crop.ffmpeg_filter(canvas), fps.num, fps.den);
        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-t", &format!("{duration_sec:.6}"), "-i"])
            .arg(&info.source_path)
            .args([
                "-an", "-vf", &filter, "-f", "rawvideo", "-pix_fmt", "rgba", "pipe:1",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ReelError::media(format!("failed to spawn ffmpeg video decode: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ReelError::media("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ReelError::media("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        Ok(Self {
            source_path: info.source_path.clone(),
            child,
            stdout: Some(stdout),
            stderr_drain: Some(stderr_drain),
            frame: vec![0u8; canvas.rgba_len()],
            frames_read: 0,
        })
    }

    /// Return the next decoded frame (straight RGBA8), or the held last frame once exhausted.
    pub fn next_frame(&mut self) -> ReelResult<&[u8]> {
        use std::io::Read as _;

        if let Some(stdout) = self.stdout.as_mut() {
            match stdout.read_exact(&mut self.frame) {
                Ok(()) => self.frames_read += 1,
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    self.stdout = None;
                    self.finish_process()?;
                }
                Err(e) => {
                    return Err(ReelError::media(format!(
                        "failed to read decoded frames for '{}': {e}",
                        self.source_path.display()
                    )));
                }
            }
        }

        if self.frames_read == 0 {
            return Err(ReelError::media(format!(
                "ffmpeg returned no video frames for '{}'",
                self.source_path.display()
            )));
        }
        Ok(&self.frame)
    }

    fn finish_process(&mut self) -> ReelResult<()> {
        let status = self
            .child
            .wait()
            .map_err(|e| ReelError::media(format!("failed to wait for ffmpeg decode: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ReelError::media("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| ReelError::media(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        if !status.success() && self.frames_read == 0 {
            return Err(ReelError::media(format!(
                "ffmpeg video decode failed for '{}': {}",
                self.source_path.display(),
                String::from_utf8_lossy(&stderr_bytes).trim()
            )));
        }
        Ok(())
    }
}

#[cfg(feature = "media-ffmpeg")]
impl Drop for VideoFrameStream {
    fn drop(&mut self) {
        if self.stdout.take().is_some() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
