//! Input subsystem.
//!
//! Platform-agnostic: the driver translates window-system events into
//! `Key`/`MouseButton` transitions and feeds them to the scene, which keeps
//! held state in `InputState` and per-tick edges in `InputFrame`.

mod frame;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{Key, MouseButton};
