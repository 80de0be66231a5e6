use super::*;

/// Loader returning fixed video durations / images keyed by file stem, failing for "bad".
struct FakeLoader {
    calls: usize,
}

fn video_info(path: &std::path::Path, duration_sec: f64) -> Arc<MediaInfo> {
    Arc::new(MediaInfo {
        source_path: path.to_path_buf(),
        duration_sec,
        width: 1920,
        height: 1080,
        has_video: true,
        has_audio: false,
    })
}

impl AssetLoader for FakeLoader {
    fn load(&mut self, asset: &VisualAsset) -> ReelResult<LoadedAsset> {
        self.calls += 1;
        let stem = asset
            .path()
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        if stem == "bad" {
            return Err(ReelError::media("corrupt"));
        }
        match asset {
            VisualAsset::Video(p) => Ok(LoadedAsset::Video {
                info: video_info(p, stem.parse().unwrap()),
                crop: FitCrop::compute(1920, 1080, Canvas::VERTICAL_HD).unwrap(),
            }),
            VisualAsset::Image(_) => Ok(LoadedAsset::Image {
                frame: Arc::new(PreparedImage::from_straight(image::RgbaImage::new(2, 2))),
            }),
        }
    }
}

fn loader() -> FakeLoader {
    FakeLoader { calls: 0 }
}

fn videos(durations: &[&str]) -> Vec<VisualAsset> {
    durations
        .iter()
        .map(|d| VisualAsset::Video(PathBuf::from(format!("{d}.mp4"))))
        .collect()
}

fn images(n: usize) -> Vec<VisualAsset> {
    (0..n)
        .map(|i| VisualAsset::Image(PathBuf::from(format!("img{i}.png"))))
        .collect()
}

#[test]
fn two_videos_cycle_to_cover_ten_seconds() {
    let cfg = ComposeConfig::default();
    let tl = build_timeline(10.0, &videos(&["4", "3"]), &mut loader(), &cfg);

    let slots: Vec<(Option<usize>, f64, f64)> = tl
        .clips
        .iter()
        .map(|c| (c.asset_index, c.start_sec, c.duration_sec))
        .collect();
    assert_eq!(
        slots,
        vec![(Some(0), 0.0, 4.0), (Some(1), 4.0, 3.0), (Some(0), 7.0, 3.0)]
    );
    assert_eq!(tl.covered_sec(), 10.0);
    assert_eq!(tl.duration_sec, 10.0);

    let unique: std::collections::HashSet<_> = tl
        .clips
        .iter()
        .map(|c| match &c.source {
            ClipSource::Video { info, .. } => info.source_path.clone(),
            _ => panic!("expected video"),
        })
        .collect();
    assert_eq!(unique.len(), 2);
}

#[test]
fn zero_assets_yield_single_filler_spanning_duration() {
    let cfg = ComposeConfig::default();
    let tl = build_timeline(7.25, &[], &mut loader(), &cfg);
    assert_eq!(tl.clips.len(), 1);
    assert!(matches!(
        tl.clips[0].source,
        ClipSource::Filler { rgb: [10, 10, 10] }
    ));
    assert_eq!(tl.clips[0].duration_sec, 7.25);
    assert_eq!(tl.covered_sec(), 7.25);
}

#[test]
fn degenerate_assets_terminate_under_iteration_cap() {
    let cfg = ComposeConfig::default();
    let mut l = loader();
    let tl = build_timeline(100.0, &videos(&["0", "0.5"]), &mut l, &cfg);

    assert_eq!(l.calls, 2 * ITERATION_CAP_FACTOR);
    // Only the 0.5 s asset contributes: five times.
    assert_eq!(tl.clips.len(), 5);
    assert!(tl.covered_sec() <= 100.0);
    assert!((tl.covered_sec() - 2.5).abs() < 1e-9);
    assert_eq!(tl.duration_sec, 100.0);
}

#[test]
fn failing_assets_are_skipped_without_advancing_time() {
    let cfg = ComposeConfig::default();
    let assets = vec![
        VisualAsset::Video(PathBuf::from("bad.mp4")),
        VisualAsset::Video(PathBuf::from("6.mp4")),
    ];
    let tl = build_timeline(10.0, &assets, &mut loader(), &cfg);
    assert!(tl.clips.iter().all(|c| c.asset_index == Some(1)));
    assert_eq!(tl.clips[0].start_sec, 0.0);
    assert_eq!(tl.covered_sec(), 10.0);
}

#[test]
fn all_assets_failing_leaves_timeline_uncovered() {
    let cfg = ComposeConfig::default();
    let assets = vec![VisualAsset::Image(PathBuf::from("bad.png"))];
    let tl = build_timeline(3.0, &assets, &mut loader(), &cfg);
    assert!(tl.clips.is_empty());
    assert_eq!(tl.covered_sec(), 0.0);
}

#[test]
fn images_share_duration_with_minimum_slot() {
    let cfg = ComposeConfig::default();

    // 3 images over 12 s: 4 s each.
    let tl = build_timeline(12.0, &images(3), &mut loader(), &cfg);
    let durs: Vec<f64> = tl.clips.iter().map(|c| c.duration_sec).collect();
    assert_eq!(durs, vec![4.0, 4.0, 4.0]);

    // 10 images over 6 s: the 1.5 s floor wins and only four slots fit.
    let tl = build_timeline(6.0, &images(10), &mut loader(), &cfg);
    let durs: Vec<f64> = tl.clips.iter().map(|c| c.duration_sec).collect();
    assert_eq!(durs, vec![1.5, 1.5, 1.5, 1.5]);
}

#[test]
fn image_slot_is_clamped_to_remaining_time() {
    let cfg = ComposeConfig::default();
    let tl = build_timeline(1.0, &images(2), &mut loader(), &cfg);
    assert_eq!(tl.clips.len(), 1);
    assert_eq!(tl.clips[0].duration_sec, 1.0);
}

#[test]
fn clips_are_contiguous_and_end_exactly_at_duration() {
    let cfg = ComposeConfig::default();
    let tl = build_timeline(0.7, &videos(&["0.1", "0.2"]), &mut loader(), &cfg);
    for pair in tl.clips.windows(2) {
        assert_eq!(pair[0].end_sec(), pair[1].start_sec);
    }
    assert!(tl.covered_sec() <= 0.7 + 1e-12);
}

#[test]
fn zero_duration_produces_no_clips_for_real_assets() {
    let cfg = ComposeConfig::default();
    let tl = build_timeline(0.0, &videos(&["4"]), &mut loader(), &cfg);
    assert!(tl.clips.is_empty());
}

#[test]
fn media_loader_memoizes_failures() {
    let mut l = MediaLoader::new(Canvas::VERTICAL_HD);
    let asset = VisualAsset::Image(PathBuf::from("/no/such/image.png"));
    let e1 = l.load(&asset).unwrap_err();
    let e2 = l.load(&asset).unwrap_err();
    assert_eq!(e1.to_string(), e2.to_string());
    assert_eq!(l.cache.len(), 1);
}

#[test]
fn media_loader_fits_images_to_canvas() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("wide.png");
    image::RgbaImage::from_pixel(40, 10, image::Rgba([1, 2, 3, 255]))
        .save(&p)
        .unwrap();
    let canvas = Canvas {
        width: 18,
        height: 32,
    };
    let mut l = MediaLoader::new(canvas);
    let LoadedAsset::Image { frame } = l.load(&VisualAsset::Image(p)).unwrap() else {
        panic!("expected image");
    };
    assert_eq!((frame.width, frame.height), (18, 32));
}
