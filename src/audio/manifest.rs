use std::ops::Range;
use std::sync::Arc;

use crate::assets::media::AudioPcm;
use crate::foundation::error::{ReelError, ReelResult};

#[derive(Clone, Debug)]
/// One scheduled audio contribution in timeline sample space.
pub struct AudioSegment {
    /// First output sample frame covered.
    pub timeline_start_sample: u64,
    /// Exclusive end output sample frame.
    pub timeline_end_sample: u64,
    /// Source offset, in seconds, at `timeline_start_sample`.
    pub source_start_sec: f64,
    /// Linear gain.
    pub volume: f32,
    /// Source sample rate in Hz.
    pub source_sample_rate: u32,
    /// Source channel count (1 or 2).
    pub source_channels: u16,
    /// Shared interleaved source PCM.
    pub source_interleaved_f32: Arc<Vec<f32>>,
}

#[derive(Clone, Debug)]
/// Output mix plan: narration plus optional bed copies.
pub struct AudioManifest {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Output channel count.
    pub channels: u16,
    /// Output length in sample frames (the narration length).
    pub total_samples: u64,
    /// Contributions summed by the mixer.
    pub segments: Vec<AudioSegment>,
}

impl AudioManifest {
    /// Output length in seconds.
    pub fn duration_sec(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.total_samples as f64 / f64::from(self.sample_rate)
    }
}

/// Timeline placement of whole bed copies covering `total_frames`.
///
/// A bed shorter than the total is repeated `ceil(total / bed)` times and the last copy is cut at
/// `total_frames`; a bed at least as long contributes one leading copy of exactly `total_frames`.
pub fn plan_bed_loops(bed_frames: u64, total_frames: u64) -> Vec<Range<u64>> {
    if bed_frames == 0 || total_frames == 0 {
        return Vec::new();
    }
    let copies = total_frames.div_ceil(bed_frames);
    (0..copies)
        .map(|k| {
            let start = k * bed_frames;
            start..(start + bed_frames).min(total_frames)
        })
        .collect()
}

/// Plan the narration-plus-bed mix.
///
/// The narration defines the output rate, layout and length. The bed, when given, is looped or
/// truncated to that length and scaled by `bed_gain`.
pub fn build_mix_manifest(
    narration: &AudioPcm,
    bed: Option<&AudioPcm>,
    bed_gain: f32,
) -> ReelResult<AudioManifest> {
    if narration.sample_rate == 0 || !(1..=2).contains(&narration.channels) {
        return Err(ReelError::media(format!(
            "narration pcm must be mono or stereo with a non-zero rate (got {} ch @ {} Hz)",
            narration.channels, narration.sample_rate
        )));
    }

    let total_samples = narration.frames();
    let mut segments = vec![AudioSegment {
        timeline_start_sample: 0,
        timeline_end_sample: total_samples,
        source_start_sec: 0.0,
        volume: 1.0,
        source_sample_rate: narration.sample_rate,
        source_channels: narration.channels,
        source_interleaved_f32: Arc::new(narration.interleaved_f32.clone()),
    }];

    if let Some(bed) = bed {
        if bed.sample_rate == 0 || !(1..=2).contains(&bed.channels) {
            return Err(ReelError::media("bed pcm must be mono or stereo with a non-zero rate"));
        }
        // Bed length expressed in output sample frames.
        let bed_out_frames = (bed.duration_sec() * f64::from(narration.sample_rate)).round() as u64;
        if bed_out_frames == 0 {
            return Err(ReelError::media("bed audio is empty"));
        }
        let source = Arc::new(bed.interleaved_f32.clone());
        for range in plan_bed_loops(bed_out_frames, total_samples) {
            segments.push(AudioSegment {
                timeline_start_sample: range.start,
                timeline_end_sample: range.end,
                source_start_sec: 0.0,
                volume: bed_gain,
                source_sample_rate: bed.sample_rate,
                source_channels: bed.channels,
                source_interleaved_f32: Arc::clone(&source),
            });
        }
    }

    Ok(AudioManifest {
        sample_rate: narration.sample_rate,
        channels: 2,
        total_samples,
        segments,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/manifest.rs"]
mod tests;
