//! Composition Orchestrator: narration, visuals, captions and watermark into one MP4.

/// Output file naming.
pub mod naming;
/// The render pipeline.
pub mod orchestrator;

pub use naming::output_file_name;
pub use orchestrator::{ComposeRequest, Composer, Overlay, OverlayPlan, compose_video};
