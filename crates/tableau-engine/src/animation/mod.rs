//! Sprite animation: shared animation data and the per-instance playback
//! state machine.
//!
//! Responsibilities:
//! - `set`: animations × 32 facing directions × frame lists, shared by every
//!   instance of a class, with missing directions aliased to the nearest
//!   authored one at build time
//! - `active`: animation / direction / frame state, speed accumulator,
//!   override slots and flashing

mod active;
mod set;

pub use active::{Active, FRAME_THRESHOLD};
pub(crate) use active::wrap_direction;
pub use set::{Animation, AnimationId, AnimationSet, AnimationSetBuilder, Direction, DIRECTION_COUNT};
