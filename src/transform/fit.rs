use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};

/// Source-space crop rectangle of the vertical fit transform.
///
/// Fitting is crop-then-scale: the largest centered region of the source with the target aspect
/// ratio is cut out and then scaled to exactly the canvas size. Nothing is letterboxed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FitCrop {
    /// Left edge in source pixels.
    pub x: u32,
    /// Top edge in source pixels.
    pub y: u32,
    /// Crop width in source pixels.
    pub width: u32,
    /// Crop height in source pixels.
    pub height: u32,
}

impl FitCrop {
    /// Compute the crop for a `src_w x src_h` source and `target` canvas.
    ///
    /// Wider-than-target sources lose columns symmetrically and keep full height; all others lose
    /// rows symmetrically and keep full width.
    pub fn compute(src_w: u32, src_h: u32, target: Canvas) -> ReelResult<Self> {
        if src_w == 0 || src_h == 0 {
            return Err(ReelError::media("cannot fit a zero-sized frame"));
        }
        if target.width == 0 || target.height == 0 {
            return Err(ReelError::validation("fit target must be non-zero"));
        }

        let target_ratio = target.aspect();
        let ratio = f64::from(src_w) / f64::from(src_h);
        if ratio > target_ratio {
            let width = ((f64::from(src_h) * target_ratio) as u32).clamp(1, src_w);
            Ok(Self {
                x: (src_w - width) / 2,
                y: 0,
                width,
                height: src_h,
            })
        } else {
            let height = ((f64::from(src_w) / target_ratio) as u32).clamp(1, src_h);
            Ok(Self {
                x: 0,
                y: (src_h - height) / 2,
                width: src_w,
                height,
            })
        }
    }

    /// `ffmpeg` filter chain applying this crop and the final scale.
    pub fn ffmpeg_filter(&self, target: Canvas) -> String {
        format!(
            "crop={}:{}:{}:{},scale={}:{},setsar=1",
            self.width, self.height, self.x, self.y, target.width, target.height
        )
    }

    /// Apply the crop to `img` and scale the result to exactly `target`.
    pub fn apply(&self, img: &image::RgbaImage, target: Canvas) -> image::RgbaImage {
        let cropped =
            image::imageops::crop_imm(img, self.x, self.y, self.width, self.height).to_image();
        if cropped.dimensions() == (target.width, target.height) {
            return cropped;
        }
        image::imageops::resize(
            &cropped,
            target.width,
            target.height,
            image::imageops::FilterType::Triangle,
        )
    }
}

/// Fit an arbitrary-aspect image onto `target`.
pub fn fit_image(img: &image::RgbaImage, target: Canvas) -> ReelResult<image::RgbaImage> {
    let crop = FitCrop::compute(img.width(), img.height(), target)?;
    Ok(crop.apply(img, target))
}

#[cfg(test)]
#[path = "../../tests/unit/transform/fit.rs"]
mod tests;
