//! Coordinate and geometry types shared by the scene model.
//!
//! Canonical space:
//! - Scene pixels, integer positions
//! - Origin top-left
//! - +X right, +Y down
//!
//! Parallax factors and scales are fractional and use `Vec2`.

mod point;
mod rect;
mod vec2;

pub use point::Point;
pub use rect::Rect;
pub use vec2::Vec2;
