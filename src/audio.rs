/// Segment plan for the output mix.
pub mod manifest;
/// Sample-domain mixer and raw PCM output.
pub mod mix;

pub use manifest::{AudioManifest, AudioSegment, build_mix_manifest, plan_bed_loops};
pub use mix::{mix_manifest, mix_narration_and_bed, write_mix_to_f32le_file};
