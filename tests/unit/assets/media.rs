use super::*;

#[test]
fn pcm_frames_and_duration() {
    let pcm = AudioPcm {
        sample_rate: 4,
        channels: 2,
        interleaved_f32: vec![0.0; 16],
    };
    assert_eq!(pcm.frames(), 8);
    assert!((pcm.duration_sec() - 2.0).abs() < 1e-12);

    let empty = AudioPcm {
        sample_rate: 0,
        channels: 0,
        interleaved_f32: Vec::new(),
    };
    assert_eq!(empty.frames(), 0);
    assert_eq!(empty.duration_sec(), 0.0);
}

#[test]
fn f32le_bytes_roundtrip_and_alignment() {
    let mut bytes = Vec::new();
    for v in [0.5f32, -1.0, 0.25] {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    assert_eq!(f32le_bytes_to_samples(&bytes).unwrap(), vec![0.5, -1.0, 0.25]);
    assert!(f32le_bytes_to_samples(&bytes[..5]).is_err());
}

#[test]
fn duration_strings_are_validated() {
    assert_eq!(parse_duration(" 12.5 "), Some(12.5));
    assert_eq!(parse_duration("N/A"), None);
    assert_eq!(parse_duration("-1"), None);
}

#[test]
fn missing_tool_is_not_on_path() {
    assert!(!is_tool_on_path("reelsmith-no-such-tool", "-version"));
}

// Probing/decoding functions shell out to `ffprobe`/`ffmpeg`; they are covered by the
// `media_pipeline` integration test, which skips itself when the tools are unavailable.
