use std::path::Path;

use anyhow::Context;

use crate::assets::media::{AudioPcm, decode_audio_f32_stereo};
use crate::audio::manifest::{AudioManifest, AudioSegment, build_mix_manifest};
use crate::foundation::error::ReelResult;

/// Mix all manifest segments into interleaved output PCM, clamped to `[-1, 1]`.
pub fn mix_manifest(manifest: &AudioManifest) -> Vec<f32> {
    let frames = manifest.total_samples as usize;
    let mut out = vec![0.0f32; frames * usize::from(manifest.channels)];

    for seg in &manifest.segments {
        mix_segment(&mut out, manifest, seg);
    }

    for s in &mut out {
        *s = s.clamp(-1.0, 1.0);
    }
    out
}

fn mix_segment(out: &mut [f32], manifest: &AudioManifest, seg: &AudioSegment) {
    let end = seg.timeline_end_sample.min(manifest.total_samples);
    if end <= seg.timeline_start_sample || seg.source_channels == 0 {
        return;
    }

    let src = seg.source_interleaved_f32.as_ref();
    let src_frames = src.len() / usize::from(seg.source_channels);
    if src_frames == 0 {
        return;
    }

    for dst_sample in seg.timeline_start_sample..end {
        let rel_sample = dst_sample - seg.timeline_start_sample;
        let rel_sec = (rel_sample as f64) / f64::from(manifest.sample_rate);

        let src_pos = (seg.source_start_sec + rel_sec) * f64::from(seg.source_sample_rate);
        if !src_pos.is_finite() || src_pos < 0.0 {
            break;
        }
        let src_frame0 = src_pos.floor() as usize;
        if src_frame0 >= src_frames {
            break;
        }
        let src_frame1 = (src_frame0 + 1).min(src_frames - 1);
        let frac = (src_pos - src_frame0 as f64) as f32;

        let dst_idx = dst_sample as usize * usize::from(manifest.channels);
        let (l, r) = if seg.source_channels == 1 {
            let v0 = src[src_frame0];
            let v1 = src[src_frame1];
            let v = v0 + ((v1 - v0) * frac);
            (v, v)
        } else {
            let i0 = src_frame0 * usize::from(seg.source_channels);
            let i1 = src_frame1 * usize::from(seg.source_channels);
            (
                src[i0] + ((src[i1] - src[i0]) * frac),
                src[i0 + 1] + ((src[i1 + 1] - src[i0 + 1]) * frac),
            )
        };

        out[dst_idx] += l * seg.volume;
        if manifest.channels > 1 {
            out[dst_idx + 1] += r * seg.volume;
        }
    }
}

/// Mix narration with an optional background bed.
///
/// The bed is decoded at the narration rate, looped or truncated to the narration length and
/// attenuated by `bed_gain`. Any bed failure is logged and the narration is returned alone.
pub fn mix_narration_and_bed(
    narration: &AudioPcm,
    bed_path: Option<&Path>,
    bed_gain: f32,
) -> ReelResult<Vec<f32>> {
    let bed = bed_path.and_then(|p| match decode_audio_f32_stereo(p, narration.sample_rate) {
        Ok(pcm) => Some(pcm),
        Err(e) => {
            tracing::warn!(path = %p.display(), error = %e, "background bed unusable; narration only");
            None
        }
    });

    let manifest = match build_mix_manifest(narration, bed.as_ref(), bed_gain) {
        Ok(m) => m,
        Err(e) if bed.is_some() => {
            tracing::warn!(error = %e, "background bed mix failed; narration only");
            build_mix_manifest(narration, None, bed_gain)?
        }
        Err(e) => return Err(e),
    };
    tracing::debug!(
        segments = manifest.segments.len(),
        duration_sec = manifest.duration_sec(),
        "audio mix planned"
    );
    Ok(mix_manifest(&manifest))
}

/// Write interleaved `f32` PCM samples to a raw little-endian `.f32le` file.
pub fn write_mix_to_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> ReelResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!(
                "create audio mix output directory '{}'",
                parent.display()
            )
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes)
        .with_context(|| format!("write mixed audio file '{}'", out_path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
