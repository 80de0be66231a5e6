use crate::assets::decode::PreparedImage;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::mul_div255_u8;
use crate::render::FrameRGBA;

/// Premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over of `src` onto `dst`, with `src` scaled by `opacity`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Fill every pixel of an RGBA8 buffer with `px`.
pub fn fill_solid(dst: &mut [u8], px: PremulRgba8) {
    for d in dst.chunks_exact_mut(4) {
        d.copy_from_slice(&px);
    }
}

/// Top-left origin that centers a `w x h` overlay on `frame_w x frame_h`.
pub fn centered_origin(frame_w: u32, frame_h: u32, w: u32, h: u32) -> (i64, i64) {
    (
        (i64::from(frame_w) - i64::from(w)).div_euclid(2),
        (i64::from(frame_h) - i64::from(h)).div_euclid(2),
    )
}

/// Composite `src` over `dst` with its top-left corner at `(x, y)`.
///
/// Parts of `src` falling outside the frame are clipped.
pub fn blit_over(
    dst: &mut FrameRGBA,
    src: &PreparedImage,
    x: i64,
    y: i64,
    opacity: f32,
) -> ReelResult<()> {
    if !dst.premultiplied {
        return Err(ReelError::validation(
            "blit_over expects a premultiplied destination frame",
        ));
    }
    let src_px = src.rgba8_premul.as_ref();
    if src_px.len() != src.width as usize * src.height as usize * 4 {
        return Err(ReelError::validation(
            "overlay pixel buffer does not match its dimensions",
        ));
    }

    let dst_w = i64::from(dst.width);
    let dst_h = i64::from(dst.height);
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + i64::from(src.width)).min(dst_w);
    let y1 = (y + i64::from(src.height)).min(dst_h);
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    let span = ((x1 - x0) * 4) as usize;
    for row in y0..y1 {
        let d_off = ((row * dst_w + x0) * 4) as usize;
        let s_off = (((row - y) * i64::from(src.width) + (x0 - x)) * 4) as usize;
        let d_row = &mut dst.data[d_off..d_off + span];
        let s_row = &src_px[s_off..s_off + span];
        for (d, s) in d_row.chunks_exact_mut(4).zip(s_row.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
            d.copy_from_slice(&out);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
