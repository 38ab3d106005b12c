use std::sync::Arc;

use crate::coords::{Point, Rect, Vec2};
use crate::image::Image;
use crate::paint::Color;

/// Placement parameters for a textured quad.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ImageDraw {
    /// Scene position the anchor pixel lands on.
    pub position: Point,
    /// Image-space pixel placed at `position` (the hotspot for sprites,
    /// the origin for backdrops).
    pub anchor: Point,
    /// Degrees, counter-clockwise.
    pub angle: f64,
    pub scale: Vec2,
    pub flip_x: bool,
    pub flip_y: bool,
    pub tint: Color,
}

impl ImageDraw {
    /// Untransformed draw with `anchor` placed at `position`.
    pub fn at(position: Point, anchor: Point) -> Self {
        Self {
            position,
            anchor,
            angle: 0.0,
            scale: Vec2::one(),
            flip_x: false,
            flip_y: false,
            tint: Color::WHITE,
        }
    }
}

/// Calls the scene issues to whatever draws pixels.
///
/// Calls are never issued concurrently and always follow the layer draw order.
pub trait RenderBackend {
    /// Clears the target before the first layer is drawn.
    fn clear(&mut self, color: Color);

    /// Sets the translation applied to everything drawn until the next call.
    fn set_translation(&mut self, x: f32, y: f32);

    /// Replaces the texture backing layer `layer`'s canvas.
    ///
    /// Only issued when the canvas pixels changed since the last upload.
    fn upload_canvas(&mut self, layer: usize, width: i32, height: i32, rgba: &[u8]);

    /// Draws layer `layer`'s canvas texture as a quad at the origin.
    fn draw_canvas(&mut self, layer: usize, width: i32, height: i32);

    fn draw_image(&mut self, image: &Arc<Image>, draw: ImageDraw);

    fn fill_rect(&mut self, rect: Rect, color: Color);
}
