//! Shared bitmap resources.
//!
//! Images are immutable once built and are shared by `Arc` between animation
//! frames, backdrops and canvas paint items.

use crate::coords::Point;
use crate::paint::Color;

/// An RGBA bitmap with a hotspot (the pixel placed at an instance's position)
/// and an action point (where projectiles/attachments spawn).
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: i32,
    height: i32,
    pub hotspot: Point,
    pub action: Point,
    pixels: Vec<Color>,
}

impl Image {
    /// Creates an image from row-major pixels.
    ///
    /// `pixels` is truncated or padded with transparent pixels to
    /// `width * height`.
    pub fn new(width: i32, height: i32, mut pixels: Vec<Color>) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let len = (width as usize) * (height as usize);
        if pixels.len() != len {
            log::debug!(
                "image pixel count {} does not match {}x{}, resizing",
                pixels.len(),
                width,
                height
            );
            pixels.resize(len, Color::TRANSPARENT);
        }

        Self {
            width,
            height,
            hotspot: Point::zero(),
            action: Point::zero(),
            pixels,
        }
    }

    /// A `width`×`height` image filled with `color`.
    pub fn filled(width: i32, height: i32, color: Color) -> Self {
        let len = (width.max(0) as usize) * (height.max(0) as usize);
        Self::new(width, height, vec![color; len])
    }

    pub fn with_hotspot(mut self, x: i32, y: i32) -> Self {
        self.hotspot = Point::new(x, y);
        self
    }

    pub fn with_action_point(mut self, x: i32, y: i32) -> Self {
        self.action = Point::new(x, y);
        self
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Whether the pixel at `(x, y)` is part of the collision mask.
    /// Out-of-bounds pixels are never opaque.
    #[inline]
    pub fn is_opaque(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(|c| c.a != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_count_is_normalized() {
        let img = Image::new(2, 2, vec![Color::WHITE]);
        assert_eq!(img.pixels().len(), 4);
        assert_eq!(img.get(0, 0), Some(Color::WHITE));
        assert_eq!(img.get(1, 1), Some(Color::TRANSPARENT));
    }

    #[test]
    fn out_of_bounds_is_not_opaque() {
        let img = Image::filled(2, 2, Color::WHITE);
        assert!(img.is_opaque(1, 1));
        assert!(!img.is_opaque(2, 0));
        assert!(!img.is_opaque(0, -1));
        assert_eq!(img.get(5, 5), None);
    }
}
