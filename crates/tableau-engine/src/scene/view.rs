use crate::coords::Point;
use crate::instance::InstanceId;
use crate::render::RenderBackend;

use super::Scene;

impl Scene {
    /// Current scroll offset (top-left of the view in scene space).
    #[inline]
    pub fn offset(&self) -> Point {
        Point::new(self.off_x, self.off_y)
    }

    /// Centers the view on `(x, y)`. A `None` axis is left unchanged.
    ///
    /// The vertical offset is clamped to the scene height; the horizontal
    /// one is not. Instances that do not scroll with the playfield are
    /// shifted by the offset change so they keep their screen position.
    pub fn set_display_center(&mut self, x: Option<i32>, y: Option<i32>) {
        let (old_x, old_y) = (self.off_x, self.off_y);
        let vw = self.config.viewport_width;
        let vh = self.config.viewport_height;

        if let Some(x) = x {
            self.off_x = x - vw / 2;
        }
        if let Some(y) = y {
            self.off_y = (y - vh / 2).max(0).min(self.height - vh);
        }

        let (dx, dy) = (self.off_x - old_x, self.off_y - old_y);
        if dx == 0 && dy == 0 {
            return;
        }
        for layer in &self.layers {
            layer.scroll(&mut self.objects, dx, dy);
        }
    }

    #[inline]
    pub fn frame_left(&self) -> i32 {
        self.off_x
    }

    #[inline]
    pub fn frame_top(&self) -> i32 {
        self.off_y
    }

    #[inline]
    pub fn frame_right(&self) -> i32 {
        self.off_x + self.config.viewport_width
    }

    #[inline]
    pub fn frame_bottom(&self) -> i32 {
        self.off_y + self.config.viewport_height
    }

    /// X as seen on screen relative to a parallax-1 layer.
    pub fn display_x(&self, id: InstanceId) -> Option<i32> {
        let inst = self.objects.get(id)?;
        let sx = self.layers.get(inst.layer)?.parallax.x as f64;
        Some((inst.x as f64 + self.off_x as f64 * (1.0 - sx)) as i32)
    }

    /// Y as seen on screen relative to a parallax-1 layer.
    pub fn display_y(&self, id: InstanceId) -> Option<i32> {
        let inst = self.objects.get(id)?;
        let sy = self.layers.get(inst.layer)?.parallax.y as f64;
        Some((inst.y as f64 + self.off_y as f64 * (1.0 - sy)) as i32)
    }

    /// Clears with the background colour, then draws every layer back to
    /// front under its own parallax translation.
    pub fn draw(&mut self, backend: &mut dyn RenderBackend) {
        backend.clear(self.background_color.with_alpha(255));

        let (off_x, off_y) = (self.off_x as f32, self.off_y as f32);
        for layer in &mut self.layers {
            let tx = (-off_x * layer.parallax.x).floor();
            let ty = (-off_y * layer.parallax.y).floor();
            backend.set_translation(tx, ty);
            layer.draw(&self.objects, backend);
        }
    }
}
