use super::*;
use std::sync::Arc;

fn stereo(rate: u32, frames: usize, value: f32) -> AudioPcm {
    AudioPcm {
        sample_rate: rate,
        channels: 2,
        interleaved_f32: vec![value; frames * 2],
    }
}

#[test]
fn bed_is_attenuated_and_summed_over_full_length() {
    let narration = stereo(10, 25, 0.5);
    let bed = stereo(10, 10, 1.0);
    let manifest = build_mix_manifest(&narration, Some(&bed), 0.12).unwrap();
    let out = mix_manifest(&manifest);

    assert_eq!(out.len(), 50);
    for s in &out {
        assert!((s - 0.62).abs() < 1e-6, "{s}");
    }
}

#[test]
fn sum_is_clamped() {
    let narration = stereo(10, 4, 0.95);
    let bed = stereo(10, 4, 1.0);
    let out = mix_manifest(&build_mix_manifest(&narration, Some(&bed), 0.5).unwrap());
    assert!(out.iter().all(|s| *s == 1.0));

    let narration = stereo(10, 4, -0.95);
    let bed = stereo(10, 4, -1.0);
    let out = mix_manifest(&build_mix_manifest(&narration, Some(&bed), 0.5).unwrap());
    assert!(out.iter().all(|s| *s == -1.0));
}

#[test]
fn mono_source_is_duplicated_to_both_channels() {
    let manifest = AudioManifest {
        sample_rate: 4,
        channels: 2,
        total_samples: 2,
        segments: vec![AudioSegment {
            timeline_start_sample: 0,
            timeline_end_sample: 2,
            source_start_sec: 0.0,
            volume: 1.0,
            source_sample_rate: 4,
            source_channels: 1,
            source_interleaved_f32: Arc::new(vec![0.25, 0.5]),
        }],
    };
    assert_eq!(mix_manifest(&manifest), vec![0.25, 0.25, 0.5, 0.5]);
}

#[test]
fn looped_bed_restarts_from_source_start() {
    // Bed ramps 0.0, 0.1, 0.2 and is looped over 7 frames.
    let narration = AudioPcm {
        sample_rate: 3,
        channels: 1,
        interleaved_f32: vec![0.0; 7],
    };
    let bed = AudioPcm {
        sample_rate: 3,
        channels: 1,
        interleaved_f32: vec![0.0, 0.1, 0.2],
    };
    let out = mix_manifest(&build_mix_manifest(&narration, Some(&bed), 1.0).unwrap());
    let left: Vec<f32> = out.chunks_exact(2).map(|c| c[0]).collect();
    let expected = [0.0, 0.1, 0.2, 0.0, 0.1, 0.2, 0.0];
    for (a, b) in left.iter().zip(expected) {
        assert!((a - b).abs() < 1e-6);
    }
}

#[test]
fn missing_bed_falls_back_to_narration_only() {
    let narration = stereo(48_000, 480, 0.25);
    let out = mix_narration_and_bed(
        &narration,
        Some(Path::new("/no/such/bed.mp3")),
        0.12,
    )
    .unwrap();
    assert_eq!(out.len(), 960);
    assert!(out.iter().all(|s| (*s - 0.25).abs() < 1e-6));
}

#[test]
fn f32le_file_roundtrips_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("mix.f32le");
    write_mix_to_f32le_file(&[0.5, -1.0], &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 8);
    assert_eq!(f32::from_le_bytes(bytes[4..8].try_into().unwrap()), -1.0);
}
