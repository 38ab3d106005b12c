//! Rendering boundary.
//!
//! The scene never rasterizes on its own: it issues backend calls in a fixed
//! per-layer order (background instances, canvas, instances). A backend
//! implementation (GPU, software, test recorder) lives outside this crate's
//! concerns, except for [`Recorder`] which captures calls for inspection.
//!
//! Convention:
//! - Coordinates are scene pixels (top-left origin, +Y down).
//! - `set_translation` replaces the current layer transform; it does not stack.

mod backend;
mod recorder;

pub use backend::{ImageDraw, RenderBackend};
pub use recorder::{DrawCmd, Recorder};
