//! Colour model shared by canvases, tints and the render boundary.
//!
//! Colours are straight (non-premultiplied) RGBA8, the format the canvas
//! pixel buffer is stored and uploaded in.

pub mod color;

pub use color::Color;
