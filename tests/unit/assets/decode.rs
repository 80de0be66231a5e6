use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

#[test]
fn classify_by_extension_case_insensitive() {
    assert!(VisualAsset::classify("a/b/clip.MP4").is_video());
    assert!(VisualAsset::classify("clip.webm").is_video());
    assert!(VisualAsset::classify("x.avi").is_video());
    assert!(!VisualAsset::classify("photo.jpg").is_video());
    assert!(!VisualAsset::classify("noext").is_video());
    assert_eq!(
        VisualAsset::classify("photo.png").path(),
        Path::new("photo.png")
    );
}

#[test]
fn partition_preserves_order() {
    let (images, videos) = partition_assets(["a.png", "b.mov", "c.jpg", "d.mkv"]);
    assert_eq!(images, vec![PathBuf::from("a.png"), PathBuf::from("c.jpg")]);
    assert_eq!(videos, vec![PathBuf::from("b.mov"), PathBuf::from("d.mkv")]);
}

#[test]
fn videos_take_precedence_over_images() {
    let images = vec![PathBuf::from("a.png")];
    let videos = vec![PathBuf::from("b.mp4")];
    let picked = select_visual_assets(&images, &videos);
    assert_eq!(picked, vec![VisualAsset::Video(PathBuf::from("b.mp4"))]);

    let picked = select_visual_assets(&images, &[]);
    assert_eq!(picked, vec![VisualAsset::Image(PathBuf::from("a.png"))]);
    assert!(select_visual_assets(&[], &[]).is_empty());
}

#[test]
fn decode_png_and_premultiply() {
    let bytes = png_bytes(3, 2, [200, 100, 50, 128]);
    let img = decode_image(&bytes).unwrap();
    assert_eq!(img.dimensions(), (3, 2));
    let prepared = PreparedImage::from_straight(img);
    assert_eq!(prepared.rgba8_premul.len(), 3 * 2 * 4);
    assert_eq!(&prepared.rgba8_premul[0..4], &[100, 50, 25, 128]);
}

#[test]
fn garbage_bytes_are_a_media_error() {
    assert!(matches!(
        decode_image(b"not an image"),
        Err(ReelError::Media(_))
    ));
    assert!(matches!(
        decode_image_file(Path::new("/definitely/missing.png")),
        Err(ReelError::Media(_))
    ));
}
