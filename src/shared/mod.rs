//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält Typen, die zwischen `core`, `app` und dem Renderer geteilt
//! werden, um direkte Abhängigkeiten zu vermeiden.

pub mod options;
mod relation_frame;

pub use options::RelationOptions;
pub use options::{FONT_SIZE_MAX, FONT_SIZE_MIN, OVERLAP_THRESHOLD, SNAP_HALF_EXTENT};
pub use relation_frame::{RelationFrame, RelationSurface};
