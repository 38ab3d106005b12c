//! Per-layer paintable, destructible pixel buffer.
//!
//! Responsibilities:
//! - keep an ordered history of paint operations ("items")
//! - rebuild the pixel buffer by replaying that history from a cleared buffer
//! - hit-test obstacle items, newest first
//!
//! Invariant: after `update()`, the pixel buffer equals a replay of `items`
//! in order. Erasing removes items and schedules a full replay instead of
//! undoing pixel writes.

use std::sync::Arc;

use crate::collision::{self, Shape, SpriteShape};
use crate::coords::{Point, Rect, Vec2};
use crate::image::Image;
use crate::paint::Color;
use crate::render::RenderBackend;

/// Integer annotation on a paint item controlling hit-testing.
///
/// `OBSTACLE` items are recorded for replay and hit-testing but are never
/// rasterized. Every other tag rasterizes and never collides.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct CollisionTag(pub i32);

impl CollisionTag {
    pub const NONE: CollisionTag = CollisionTag(0);
    pub const OBSTACLE: CollisionTag = CollisionTag(1);

    #[inline]
    pub const fn is_obstacle(self) -> bool {
        self.0 == Self::OBSTACLE.0
    }
}

/// One recorded paint operation.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintItem {
    pub image: Arc<Image>,
    /// Canvas position of the source region's top-left pixel.
    pub dest: Point,
    /// Region of `image` to copy.
    pub source: Rect,
    pub tag: CollisionTag,
}

impl PaintItem {
    /// Canvas-space rectangle covered by this item.
    #[inline]
    pub fn dest_rect(&self) -> Rect {
        Rect::new(self.dest.x, self.dest.y, self.source.w, self.source.h)
    }

    fn shape(&self) -> Shape<'_> {
        Shape::Sprite(SpriteShape {
            image: &self.image,
            rect: self.dest_rect(),
            source: self.source.min(),
            scale: Vec2::one(),
            use_mask: true,
        })
    }
}

/// Fixed-size RGBA canvas with a replayable paint history.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: i32,
    height: i32,
    pixels: Vec<Color>,
    items: Vec<PaintItem>,
    /// Items were added or removed since the last replay.
    items_changed: bool,
    /// Pixels changed since the last backend upload.
    dirty: bool,
}

impl Canvas {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            pixels: vec![Color::TRANSPARENT; (width as usize) * (height as usize)],
            items: Vec::new(),
            items_changed: false,
            dirty: true,
        }
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
    pub fn items(&self) -> &[PaintItem] {
        &self.items
    }

    #[inline]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Reads a pixel as currently stored (without reconciling the history).
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Whether the pixel buffer must be re-uploaded before the next draw.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clears every pixel. With `clear_items`, the paint history is dropped too.
    pub fn reset(&mut self, clear_items: bool) {
        self.pixels.fill(Color::TRANSPARENT);
        self.dirty = true;
        self.items_changed = false;
        if clear_items {
            self.items.clear();
        }
    }

    /// Pastes `source` of `image` with its top-left pixel at `dest`.
    ///
    /// With `persist`, the operation is recorded for replay and the pixels are
    /// left untouched until the next `update()`. Otherwise it is blended
    /// immediately (obstacle items are never blended).
    pub fn paste(&mut self, image: &Arc<Image>, dest: Point, source: Rect, tag: CollisionTag, persist: bool) {
        if persist {
            self.items.push(PaintItem {
                image: Arc::clone(image),
                dest,
                source,
                tag,
            });
            self.items_changed = true;
            return;
        }

        if tag.is_obstacle() {
            return;
        }

        for dx in 0..source.w {
            let src_x = source.x + dx;
            let dst_x = dest.x + dx;
            if src_x < 0 || src_x >= image.width() || dst_x < 0 || dst_x >= self.width {
                continue;
            }
            for dy in 0..source.h {
                let src_y = source.y + dy;
                let dst_y = dest.y + dy;
                if src_y < 0 || src_y >= image.height() || dst_y < 0 || dst_y >= self.height {
                    continue;
                }
                let Some(src) = image.get(src_x, src_y) else {
                    continue;
                };
                let idx = (dst_y * self.width + dst_x) as usize;
                self.pixels[idx] = src.blend_over(self.pixels[idx]);
            }
        }
        self.dirty = true;
    }

    /// Removes every item whose destination rectangle contains `(x, y)`.
    ///
    /// Pixels are not touched; the next `update()` replays what remains.
    /// Returns the number of removed items.
    pub fn erase(&mut self, x: i32, y: i32) -> usize {
        let p = Point::new(x, y);
        let before = self.items.len();
        self.items.retain(|item| !item.dest_rect().contains(p));

        let removed = before - self.items.len();
        if removed > 0 {
            self.items_changed = true;
        }
        removed
    }

    /// Reconciles pixels with the paint history.
    ///
    /// No-op unless items were added or removed since the last call.
    pub fn update(&mut self) {
        if !self.items_changed {
            return;
        }
        self.reset(false);

        let items = std::mem::take(&mut self.items);
        for item in &items {
            self.paste(&item.image, item.dest, item.source, item.tag, false);
        }
        self.items = items;
    }

    /// Hit-tests `shape` against obstacle items, newest first.
    pub fn collide(&mut self, shape: &Shape<'_>) -> bool {
        self.update();
        self.items
            .iter()
            .rev()
            .filter(|item| item.tag.is_obstacle())
            .any(|item| collision::collide(shape, &item.shape()))
    }

    /// Reconciles, uploads if the pixels changed, and draws the canvas quad.
    pub fn draw(&mut self, layer: usize, backend: &mut dyn RenderBackend) {
        self.update();
        if self.dirty {
            backend.upload_canvas(layer, self.width, self.height, bytemuck::cast_slice(&self.pixels));
            self.dirty = false;
        }
        backend.draw_canvas(layer, self.width, self.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCmd, Recorder};

    fn solid(w: i32, h: i32, color: Color) -> Arc<Image> {
        Arc::new(Image::filled(w, h, color))
    }

    fn red() -> Color {
        Color::rgb(255, 0, 0)
    }

    // ── paste ─────────────────────────────────────────────────────────────

    #[test]
    fn persisted_paste_waits_for_update() {
        let mut canvas = Canvas::new(8, 8);
        canvas.paste(&solid(2, 2, red()), Point::new(1, 1), Rect::new(0, 0, 2, 2), CollisionTag::NONE, true);
        assert_eq!(canvas.pixel(1, 1), Some(Color::TRANSPARENT));

        canvas.update();
        assert_eq!(canvas.pixel(1, 1), Some(red()));
        assert_eq!(canvas.pixel(2, 2), Some(red()));
        assert_eq!(canvas.pixel(3, 3), Some(Color::TRANSPARENT));
    }

    #[test]
    fn paste_clips_to_canvas_and_image() {
        let mut canvas = Canvas::new(4, 4);
        // Region extends past both the image and the canvas.
        canvas.paste(&solid(2, 2, red()), Point::new(3, 3), Rect::new(0, 0, 5, 5), CollisionTag::NONE, false);
        assert_eq!(canvas.pixel(3, 3), Some(red()));
        assert_eq!(canvas.pixels().iter().filter(|c| **c == red()).count(), 1);
    }

    #[test]
    fn obstacle_paste_is_never_rasterized() {
        let mut canvas = Canvas::new(4, 4);
        canvas.paste(&solid(2, 2, red()), Point::zero(), Rect::new(0, 0, 2, 2), CollisionTag::OBSTACLE, true);
        canvas.update();
        assert!(canvas.pixels().iter().all(|c| *c == Color::TRANSPARENT));
        assert!(canvas.collide(&Shape::Point(Point::new(1, 1))));
    }

    #[test]
    fn transparent_source_keeps_destination_bits() {
        let mut canvas = Canvas::new(2, 1);
        canvas.paste(&solid(2, 1, Color::rgba(10, 20, 30, 77)), Point::zero(), Rect::new(0, 0, 2, 1), CollisionTag::NONE, false);
        let before = canvas.pixels().to_vec();
        canvas.paste(&solid(2, 1, Color::rgba(255, 255, 255, 0)), Point::zero(), Rect::new(0, 0, 2, 1), CollisionTag::NONE, false);
        assert_eq!(canvas.pixels(), before.as_slice());
    }

    // ── replay ────────────────────────────────────────────────────────────

    #[test]
    fn replay_is_order_preserving() {
        let mut canvas = Canvas::new(4, 4);
        canvas.paste(&solid(2, 2, red()), Point::zero(), Rect::new(0, 0, 2, 2), CollisionTag::NONE, true);
        canvas.paste(&solid(1, 1, Color::rgb(0, 0, 255)), Point::new(1, 1), Rect::new(0, 0, 1, 1), CollisionTag::NONE, true);
        canvas.update();
        assert_eq!(canvas.pixel(1, 1), Some(Color::rgb(0, 0, 255)));
        assert_eq!(canvas.pixel(0, 0), Some(red()));
    }

    #[test]
    fn update_is_idempotent() {
        let mut canvas = Canvas::new(4, 4);
        canvas.paste(&solid(2, 2, Color::rgba(0, 255, 0, 100)), Point::zero(), Rect::new(0, 0, 2, 2), CollisionTag::NONE, true);
        canvas.update();
        let first = canvas.pixels().to_vec();
        canvas.update();
        assert_eq!(canvas.pixels(), first.as_slice());

        // A forced replay of the same history yields the same buffer.
        canvas.items_changed = true;
        canvas.update();
        assert_eq!(canvas.pixels(), first.as_slice());
    }

    // ── erase ─────────────────────────────────────────────────────────────

    #[test]
    fn erase_then_update_clears_region() {
        let mut canvas = Canvas::new(4, 4);
        canvas.paste(&solid(2, 2, red()), Point::zero(), Rect::new(0, 0, 2, 2), CollisionTag::OBSTACLE, true);
        canvas.paste(&solid(2, 2, red()), Point::zero(), Rect::new(0, 0, 2, 2), CollisionTag::NONE, true);
        canvas.update();
        assert_eq!(canvas.pixel(0, 0), Some(red()));

        assert_eq!(canvas.erase(0, 0), 2);
        assert!(!canvas.collide(&Shape::Point(Point::new(1, 1))));
        canvas.update();
        assert_eq!(canvas.pixel(0, 0), Some(Color::TRANSPARENT));
    }

    #[test]
    fn erase_miss_leaves_history_alone() {
        let mut canvas = Canvas::new(4, 4);
        canvas.paste(&solid(2, 2, red()), Point::zero(), Rect::new(0, 0, 2, 2), CollisionTag::NONE, true);
        canvas.update();
        assert_eq!(canvas.erase(3, 3), 0);
        assert!(!canvas.items_changed);
        assert_eq!(canvas.items().len(), 1);
    }

    // ── collide ───────────────────────────────────────────────────────────

    #[test]
    fn only_obstacles_collide() {
        let mut canvas = Canvas::new(8, 8);
        canvas.paste(&solid(4, 4, red()), Point::zero(), Rect::new(0, 0, 4, 4), CollisionTag::NONE, true);
        assert!(!canvas.collide(&Shape::Point(Point::new(1, 1))));
        assert!(!canvas.collide(&Shape::Point(Point::new(1, 1))));

        canvas.paste(&solid(4, 4, red()), Point::new(4, 4), Rect::new(0, 0, 4, 4), CollisionTag::OBSTACLE, true);
        assert!(canvas.collide(&Shape::Box(Rect::new(3, 3, 2, 2))));
    }

    #[test]
    fn obstacle_mask_ignores_transparent_pixels() {
        let mut canvas = Canvas::new(8, 8);
        canvas.paste(&solid(4, 4, Color::TRANSPARENT), Point::zero(), Rect::new(0, 0, 4, 4), CollisionTag::OBSTACLE, true);
        assert!(!canvas.collide(&Shape::Point(Point::new(1, 1))));
    }

    // ── draw ──────────────────────────────────────────────────────────────

    #[test]
    fn draw_uploads_only_when_dirty() {
        let mut canvas = Canvas::new(2, 2);
        let mut rec = Recorder::new();
        canvas.draw(3, &mut rec);
        canvas.draw(3, &mut rec);
        assert_eq!(rec.upload_count(), 1);
        assert_eq!(
            rec.commands()[0],
            DrawCmd::UploadCanvas { layer: 3, width: 2, height: 2, bytes: 16 }
        );

        canvas.paste(&solid(1, 1, red()), Point::zero(), Rect::new(0, 0, 1, 1), CollisionTag::NONE, true);
        canvas.draw(3, &mut rec);
        assert_eq!(rec.upload_count(), 2);
    }
}
