use super::*;
use crate::foundation::core::Fps;

fn args(cmd: &Command) -> Vec<String> {
    cmd.get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

fn sink_at(path: impl Into<PathBuf>) -> FfmpegSink {
    FfmpegSink::new(FfmpegSinkOpts::for_output(path, &ComposeConfig::default()))
}

#[test]
fn transparent_pixels_show_the_matte() {
    let src = [0u8, 0, 0, 0, 1, 2, 3, 255];
    let mut dst = [0u8; 8];
    flatten_onto_matte(&mut dst, &src, [10, 20, 30]);
    assert_eq!(dst, [10, 20, 30, 255, 1, 2, 3, 255]);
}

#[test]
fn half_covered_pixel_blends_with_matte() {
    // premultiplied white at alpha 128 over black
    let mut dst = [0u8; 4];
    flatten_onto_matte(&mut dst, &[128, 128, 128, 128], [0, 0, 0]);
    assert_eq!(dst, [128, 128, 128, 255]);
}

#[test]
fn opts_follow_compose_config() {
    let cfg = ComposeConfig {
        overwrite: false,
        filler_rgb: [1, 2, 3],
        ..ComposeConfig::default()
    };
    let opts = FfmpegSinkOpts::for_output("out/short.mp4", &cfg);
    assert!(!opts.overwrite);
    assert_eq!(opts.matte_rgb, [1, 2, 3]);
    assert_eq!(opts.out_path, PathBuf::from("out/short.mp4"));
}

#[test]
fn command_muxes_h264_and_aac_with_audio() {
    let sink = sink_at("/tmp/out.mp4");
    let cfg = SinkConfig {
        width: 1080,
        height: 1920,
        fps: Fps::default(),
        audio: Some(AudioInputConfig {
            path: PathBuf::from("/tmp/mix.f32le"),
            sample_rate: 48_000,
            channels: 2,
        }),
    };
    let a = args(&sink.command(&cfg).unwrap());
    let joined = a.join(" ");
    assert_eq!(a[0], "-y");
    assert!(joined.contains("-s 1080x1920 -r 30/1 -i pipe:0"));
    assert!(joined.contains("-f f32le -ar 48000 -ac 2 -i /tmp/mix.f32le"));
    assert!(joined.contains("-c:v libx264 -pix_fmt yuv420p -c:a aac -shortest"));
    assert!(joined.contains("-movflags +faststart"));
    assert_eq!(a.last().map(String::as_str), Some("/tmp/out.mp4"));
}

#[test]
fn command_without_audio_disables_audio_stream() {
    let sink = FfmpegSink::new(FfmpegSinkOpts {
        out_path: PathBuf::from("o.mp4"),
        overwrite: false,
        matte_rgb: [0, 0, 0],
    });
    let cfg = SinkConfig {
        width: 2,
        height: 2,
        fps: Fps::new(25, 1).unwrap(),
        audio: None,
    };
    let a = args(&sink.command(&cfg).unwrap());
    assert_eq!(a[0], "-n");
    assert!(a.contains(&"-an".to_string()));
    assert!(!a.contains(&"aac".to_string()));
}

#[test]
fn command_rejects_silent_soundtrack_format() {
    let sink = sink_at("o.mp4");
    let cfg = SinkConfig {
        width: 2,
        height: 2,
        fps: Fps::default(),
        audio: Some(AudioInputConfig {
            path: PathBuf::from("mix.f32le"),
            sample_rate: 0,
            channels: 2,
        }),
    };
    assert!(matches!(sink.command(&cfg), Err(ReelError::Validation(_))));
}

#[test]
fn begin_rejects_odd_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = sink_at(dir.path().join("o.mp4"));
    let err = sink
        .begin(SinkConfig {
            width: 3,
            height: 2,
            fps: Fps::default(),
            audio: None,
        })
        .unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
}

#[test]
fn push_before_begin_is_an_encode_error() {
    let mut sink = sink_at("o.mp4");
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
        premultiplied: true,
    };
    let err = sink.push_frame(FrameIndex(0), &frame).unwrap_err();
    assert!(matches!(err, ReelError::Encode(_)));
}

#[test]
fn ensure_parent_dir_creates_nested_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("a").join("b").join("o.mp4");
    ensure_parent_dir(&out).unwrap();
    assert!(out.parent().unwrap().is_dir());
    ensure_parent_dir(Path::new("bare.mp4")).unwrap();
}
