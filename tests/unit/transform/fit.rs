use super::*;

const TARGET: Canvas = Canvas::VERTICAL_HD;

#[test]
fn landscape_crops_columns_and_keeps_height() {
    let c = FitCrop::compute(1920, 1080, TARGET).unwrap();
    assert_eq!(c.height, 1080);
    assert_eq!(c.width, 607); // floor(1080 * 0.5625)
    assert_eq!(c.x, (1920 - 607) / 2);
    assert_eq!(c.y, 0);
}

#[test]
fn tall_source_crops_rows_and_keeps_width() {
    let c = FitCrop::compute(1000, 3000, TARGET).unwrap();
    assert_eq!(c.width, 1000);
    assert_eq!(c.height, 1777); // floor(1000 / 0.5625)
    assert_eq!(c.x, 0);
    assert_eq!(c.y, (3000 - 1777) / 2);
}

#[test]
fn exact_aspect_is_identity_crop() {
    let c = FitCrop::compute(540, 960, TARGET).unwrap();
    assert_eq!(
        c,
        FitCrop {
            x: 0,
            y: 0,
            width: 540,
            height: 960
        }
    );
}

#[test]
fn crop_stays_inside_source_for_many_shapes() {
    for (w, h) in [
        (1, 1),
        (1, 5000),
        (5000, 1),
        (3, 7),
        (1081, 1920),
        (1079, 1920),
        (4096, 2160),
        (720, 1280),
    ] {
        let c = FitCrop::compute(w, h, TARGET).unwrap();
        assert!(c.width >= 1 && c.height >= 1, "{w}x{h}");
        assert!(c.x + c.width <= w, "{w}x{h}");
        assert!(c.y + c.height <= h, "{w}x{h}");
    }
}

#[test]
fn zero_sized_source_is_rejected() {
    assert!(FitCrop::compute(0, 10, TARGET).is_err());
    assert!(FitCrop::compute(10, 0, TARGET).is_err());
}

#[test]
fn fitted_image_is_always_canvas_sized() {
    let target = Canvas {
        width: 36,
        height: 64,
    };
    for (w, h) in [(100, 20), (20, 100), (36, 64), (7, 7), (1, 300)] {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([9, 8, 7, 255]));
        let out = fit_image(&img, target).unwrap();
        assert_eq!(out.dimensions(), (36, 64), "{w}x{h}");
    }
}

#[test]
fn landscape_fit_keeps_the_center() {
    // Left third red, middle third green, right third blue; a 9:16 crop lands in the middle.
    let mut img = image::RgbaImage::new(300, 100);
    for (x, _, px) in img.enumerate_pixels_mut() {
        *px = match x {
            0..100 => image::Rgba([255, 0, 0, 255]),
            100..200 => image::Rgba([0, 255, 0, 255]),
            _ => image::Rgba([0, 0, 255, 255]),
        };
    }
    let out = fit_image(
        &img,
        Canvas {
            width: 18,
            height: 32,
        },
    )
    .unwrap();
    assert_eq!(out.get_pixel(9, 16).0, [0, 255, 0, 255]);
}

#[test]
fn ffmpeg_filter_encodes_crop_then_scale() {
    let c = FitCrop::compute(1920, 1080, TARGET).unwrap();
    assert_eq!(c.ffmpeg_filter(TARGET), "crop=607:1080:656:0,scale=1080:1920,setsar=1");
}
