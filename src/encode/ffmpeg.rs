use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::assets::media::is_tool_on_path;
use crate::config::ComposeConfig;
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::FrameRGBA;

/// Where and how [`FfmpegSink`] writes the finished short.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Replace an existing file at `out_path`.
    pub overwrite: bool,
    /// Opaque color shown through translucent pixels, since H.264 carries no alpha.
    pub matte_rgb: [u8; 3],
}

impl FfmpegSinkOpts {
    /// Options for writing `out_path` under `cfg`, matting over the filler color.
    pub fn for_output(out_path: impl Into<PathBuf>, cfg: &ComposeConfig) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: cfg.overwrite,
            matte_rgb: cfg.filler_rgb,
        }
    }
}

/// Streams composited frames into a system `ffmpeg` producing an H.264/AAC fast-start MP4.
///
/// Frames go to stdin as raw RGBA; the soundtrack is read from the `f32le` file named in
/// [`SinkConfig::audio`]. Dropping an unfinished sink kills the encoder.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr: Option<JoinHandle<Vec<u8>>>,
    opaque: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Create an idle sink; the encoder is spawned in [`FrameSink::begin`].
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr: None,
            opaque: Vec::new(),
            cfg: None,
            last_idx: None,
        }
    }

    fn command(&self, cfg: &SinkConfig) -> ReelResult<Command> {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .arg(if self.opts.overwrite { "-y" } else { "-n" })
            .args(["-loglevel", "error"]);

        // Inputs: raw frames on stdin at the output rate, then the mixed soundtrack.
        cmd.args(["-f", "rawvideo", "-pix_fmt", "rgba"])
            .args(["-s", &format!("{}x{}", cfg.width, cfg.height)])
            .args(["-r", &format!("{}/{}", cfg.fps.num, cfg.fps.den)])
            .args(["-i", "pipe:0"]);
        if let Some(audio) = &cfg.audio {
            push_audio_input(&mut cmd, audio)?;
        }

        cmd.args(["-c:v", "libx264", "-pix_fmt", "yuv420p"]);
        if cfg.audio.is_some() {
            cmd.args(["-c:a", "aac", "-shortest"]);
        } else {
            cmd.arg("-an");
        }
        cmd.args(["-movflags", "+faststart"]).arg(&self.opts.out_path);
        Ok(cmd)
    }
}

fn push_audio_input(cmd: &mut Command, audio: &AudioInputConfig) -> ReelResult<()> {
    if audio.sample_rate == 0 || audio.channels == 0 {
        return Err(ReelError::validation(
            "soundtrack sample_rate and channels must be non-zero",
        ));
    }
    cmd.args(["-f", "f32le"])
        .args(["-ar", &audio.sample_rate.to_string()])
        .args(["-ac", &audio.channels.to_string()])
        .arg("-i")
        .arg(&audio.path);
    Ok(())
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(ReelError::validation("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(ReelError::validation("output size must be non-zero"));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(ReelError::validation(format!(
                "output size {}x{} must be even for yuv420p",
                cfg.width, cfg.height
            )));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(ReelError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_tool_on_path("ffmpeg", "-version") {
            return Err(ReelError::unavailable("ffmpeg not found on PATH"));
        }

        let mut child = self
            .command(&cfg)?
            .spawn()
            .map_err(|e| ReelError::encode(format!("spawn ffmpeg: {e}")))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ReelError::encode("ffmpeg stdin unavailable"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ReelError::encode("ffmpeg stderr unavailable"))?;
        // Drained concurrently so a chatty encoder cannot block on a full pipe.
        self.stderr = Some(std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stderr.read_to_end(&mut buf);
            buf
        }));

        tracing::debug!(
            out = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            audio = cfg.audio.is_some(),
            "ffmpeg encoder started"
        );
        self.opaque = vec![0u8; cfg.width as usize * cfg.height as usize * 4];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ReelResult<()> {
        let Some(cfg) = self.cfg.as_ref() else {
            return Err(ReelError::encode("frame pushed before the encoder started"));
        };
        if self.last_idx.is_some_and(|last| idx <= last) {
            return Err(ReelError::encode(format!(
                "frame {} pushed out of order",
                idx.0
            )));
        }
        if (frame.width, frame.height) != (cfg.width, cfg.height)
            || frame.data.len() != self.opaque.len()
        {
            return Err(ReelError::validation(format!(
                "frame is {}x{}, encoder expects {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        self.last_idx = Some(idx);

        if frame.premultiplied {
            flatten_onto_matte(&mut self.opaque, &frame.data, self.opts.matte_rgb);
        } else {
            self.opaque.copy_from_slice(&frame.data);
        }

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| ReelError::encode("encoder already finalized"))?;
        stdin
            .write_all(&self.opaque)
            .map_err(|e| ReelError::encode(format!("write frame {} to ffmpeg: {e}", idx.0)))
    }

    fn end(&mut self) -> ReelResult<()> {
        // Closing stdin signals end of stream.
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| ReelError::encode("encoder was never started"))?;
        let status = child
            .wait()
            .map_err(|e| ReelError::encode(format!("wait for ffmpeg: {e}")))?;
        let stderr = self
            .stderr
            .take()
            .and_then(|h| h.join().ok())
            .unwrap_or_default();
        self.cfg = None;

        if !status.success() {
            return Err(ReelError::encode(format!(
                "ffmpeg exited with {status}: {}",
                String::from_utf8_lossy(&stderr).trim()
            )));
        }
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Composite premultiplied RGBA over an opaque matte; `dst` and `src` have equal length.
fn flatten_onto_matte(dst: &mut [u8], src: &[u8], matte: [u8; 3]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let inv = 255 - u16::from(s[3]);
        for c in 0..3 {
            let under = mul_div255_u16(u16::from(matte[c]), inv);
            d[c] = (u16::from(s[c]) + under).min(255) as u8;
        }
        d[3] = 255;
    }
}

/// Create the parent directory of `path` if it is missing.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
