//! Caption and watermark text: font resolution, Parley layout, and CPU rasterization.

/// Font discovery.
pub mod font;
/// Parley-backed line layout and greedy word wrap.
pub mod layout;
/// Backdrop-boxed bitmap rendering.
pub mod raster;

pub use font::{FontSource, WELL_KNOWN_FONT_PATHS, resolve_font};
pub use layout::{LineBox, TextBrushRgba8, TextLayoutEngine, wrap_greedy};
pub use raster::{TextRasterizer, write_png};
