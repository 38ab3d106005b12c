//! Z-ordered instance container with its own parallax and paint canvas.
//!
//! A layer stores instance handles, not instances; operations that need
//! instance state take the scene's instance storage as an argument.
//!
//! Draw order is fixed: background instances, then the canvas, then regular
//! instances back to front.

use std::sync::Arc;

use slotmap::SlotMap;

use crate::canvas::{Canvas, CollisionTag};
use crate::collision::Shape;
use crate::coords::{Point, Rect, Vec2};
use crate::image::Image;
use crate::instance::{Instance, InstanceId};
use crate::render::RenderBackend;

pub type Instances = SlotMap<InstanceId, Instance>;

#[derive(Debug)]
pub struct Layer {
    index: usize,
    pub visible: bool,
    /// Multiplier applied to the scene scroll offset when drawing.
    pub parallax: Vec2,

    /// Back to front.
    instances: Vec<InstanceId>,
    /// Drawn under the canvas; owned here, outside the scene indexes.
    backgrounds: Vec<Instance>,
    canvas: Option<Canvas>,
    canvas_size: (i32, i32),
}

impl Layer {
    pub fn new(index: usize, parallax: Vec2, visible: bool, canvas_size: (i32, i32)) -> Self {
        Self {
            index,
            visible,
            parallax,
            instances: Vec::new(),
            backgrounds: Vec::new(),
            canvas: None,
            canvas_size,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn instances(&self) -> &[InstanceId] {
        &self.instances
    }

    #[inline]
    pub fn backgrounds(&self) -> &[Instance] {
        &self.backgrounds
    }

    #[inline]
    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    // ── membership & z-order ──────────────────────────────────────────────

    pub(crate) fn add(&mut self, id: InstanceId) {
        self.instances.push(id);
    }

    pub(crate) fn add_background(&mut self, instance: Instance) {
        self.backgrounds.push(instance);
    }

    /// Inserts at `index`, clamped to the end of the list.
    pub(crate) fn insert(&mut self, id: InstanceId, index: usize) {
        let index = index.min(self.instances.len());
        self.instances.insert(index, id);
    }

    pub(crate) fn remove(&mut self, id: InstanceId) {
        self.instances.retain(|i| *i != id);
    }

    /// Moves `id` to position `index`; a negative index moves it to the
    /// front (end of the list).
    pub fn set_level(&mut self, id: InstanceId, index: i32) {
        self.remove(id);
        match usize::try_from(index) {
            Ok(index) => self.insert(id, index),
            Err(_) => self.add(id),
        }
    }

    /// Position of `id` in the z-order, `0` being back-most.
    pub fn level(&self, id: InstanceId) -> Option<usize> {
        self.instances.iter().position(|i| *i == id)
    }

    /// Reorders instances with a stable sort.
    pub(crate) fn sort_by<F>(&mut self, objects: &Instances, mut key: F)
    where
        F: FnMut(&Instance, &Instance) -> std::cmp::Ordering,
    {
        self.instances.sort_by(|a, b| match (objects.get(*a), objects.get(*b)) {
            (Some(a), Some(b)) => key(a, b),
            _ => std::cmp::Ordering::Equal,
        });
    }

    /// Shifts instances that do not move with the playfield by `(dx, dy)`.
    pub fn scroll(&self, objects: &mut Instances, dx: i32, dy: i32) {
        for id in &self.instances {
            let Some(inst) = objects.get_mut(*id) else {
                continue;
            };
            if inst.scroll {
                continue;
            }
            inst.set_position(inst.x + dx, inst.y + dy);
        }
    }

    // ── canvas ────────────────────────────────────────────────────────────

    fn canvas_mut(&mut self) -> &mut Canvas {
        let (w, h) = self.canvas_size;
        let index = self.index;
        self.canvas.get_or_insert_with(|| {
            log::trace!("layer {}: creating {}x{} canvas", index, w, h);
            Canvas::new(w, h)
        })
    }

    /// Records a paste of `source` of `image` at `dest` on this layer's
    /// canvas, creating the canvas on first use.
    pub fn paint(&mut self, image: &Arc<Image>, dest: Point, source: Rect, tag: CollisionTag) {
        self.canvas_mut().paste(image, dest, source, tag, true);
    }

    /// Drops every pixel and paint item.
    pub fn clear_canvas(&mut self) {
        if let Some(canvas) = &mut self.canvas {
            canvas.reset(true);
        }
    }

    /// Removes paint items covering `(x, y)`. Pixel-accurate (`fine`)
    /// erasing is not supported and falls back to whole items.
    pub fn erase_canvas_at(&mut self, x: i32, y: i32, fine: bool) -> usize {
        if fine {
            log::warn!("fine canvas erase at {}, {} not implemented, erasing whole items", x, y);
        }
        match &mut self.canvas {
            Some(canvas) => canvas.erase(x, y),
            None => 0,
        }
    }

    pub fn collide_canvas(&mut self, shape: &Shape<'_>) -> bool {
        match &mut self.canvas {
            Some(canvas) => canvas.collide(shape),
            None => false,
        }
    }

    pub fn test_background_collision(&mut self, x: i32, y: i32) -> bool {
        self.collide_canvas(&Shape::Point(Point::new(x, y)))
    }

    // ── drawing ───────────────────────────────────────────────────────────

    pub fn draw(&mut self, objects: &Instances, backend: &mut dyn RenderBackend) {
        if !self.visible {
            return;
        }

        for bg in self.backgrounds.iter().filter(|b| b.visible) {
            bg.draw(backend);
        }

        if let Some(canvas) = &mut self.canvas {
            canvas.draw(self.index, backend);
        }

        for id in &self.instances {
            if let Some(inst) = objects.get(*id).filter(|i| i.visible) {
                inst.draw(backend);
            }
        }
    }
}
