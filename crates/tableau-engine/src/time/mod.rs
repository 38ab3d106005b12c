//! Time subsystem.
//!
//! Frame timing for drivers, decoupled from the scene:
//! - one `FrameClock` per tick loop
//! - call `tick()` once per scene tick and pass `FrameTime::dt` to `Scene::tick`

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
