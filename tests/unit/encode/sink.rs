use super::*;
use crate::foundation::core::{Canvas, Rgba8Premul};

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 2,
        height: 2,
        fps: Fps::default(),
        audio: None,
    }
}

fn frame() -> FrameRGBA {
    FrameRGBA::filled(
        Canvas {
            width: 2,
            height: 2,
        },
        Rgba8Premul::opaque(1, 2, 3),
    )
}

#[test]
fn captures_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame()).unwrap();
    sink.push_frame(FrameIndex(1), &frame()).unwrap();
    sink.end().unwrap();

    assert!(sink.is_finished());
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.config().unwrap().width, 2);
}

#[test]
fn rejects_frames_before_begin_or_out_of_order() {
    let mut sink = InMemorySink::new();
    assert!(sink.push_frame(FrameIndex(0), &frame()).is_err());

    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(5), &frame()).unwrap();
    let err = sink.push_frame(FrameIndex(5), &frame()).unwrap_err();
    assert!(matches!(err, ReelError::Encode(_)));
}
