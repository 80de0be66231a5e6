/// Crop-then-scale normalization onto the output frame.
pub mod fit;
