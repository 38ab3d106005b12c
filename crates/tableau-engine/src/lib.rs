//! Tableau engine crate.
//!
//! Runtime scene model for 2D games: scenes own z-ordered layers and the
//! instances placed on them, run the per-tick update/draw pipeline, and
//! provide collision tests, paintable per-layer canvases and sprite
//! animation playback. Rasterization is delegated to a `RenderBackend`.

pub mod animation;
pub mod canvas;
pub mod collision;
pub mod config;
pub mod coords;
pub mod image;
pub mod input;
pub mod instance;
pub mod layer;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod time;

mod error;

pub use error::{Result, SceneError};
