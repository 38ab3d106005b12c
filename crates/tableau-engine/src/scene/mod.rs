//! The scene: layers, live instances and the per-tick pipeline.
//!
//! Responsibilities:
//! - own every instance and keep the three indexes (flat list, class
//!   buckets, layer lists) in step
//! - run the tick: update pass, scene logic, destruction sweep, input reset
//! - draw layers in z-order with their parallax offsets
//!
//! Destruction is two-phase. `destroy` only marks and queues; the sweep at
//! the end of `tick` removes the instance from all indexes. Until then the
//! instance stays updatable and visible to lookups.

mod events;
mod input;
mod query;
mod transition;
mod view;

use std::cell::Cell;
use std::collections::HashMap;
use std::mem;
use std::sync::Arc;

use slotmap::{Key as _, KeyData};

use crate::canvas::CollisionTag;
use crate::config::{EmptyLookupPolicy, EngineConfig};
use crate::coords::{Point, Rect, Vec2};
use crate::error::{Result, SceneError};
use crate::input::{InputFrame, InputState};
use crate::instance::{ClassId, Instance, InstanceId, InstanceKind};
use crate::layer::{Instances, Layer};
use crate::paint::Color;

pub use events::SceneEvents;
pub use transition::Transition;

/// Direction for `Scene::sort_layer_by_alterable`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SortOrder {
    /// Smallest value at the back.
    Ascending,
    /// Largest value at the back.
    Descending,
}

#[derive(Debug)]
pub struct Scene {
    name: String,
    index: usize,
    width: i32,
    height: i32,
    pub background_color: Color,
    config: EngineConfig,

    layers: Vec<Layer>,
    objects: Instances,
    /// Every instance in creation order; the update pass walks this.
    instances: Vec<InstanceId>,
    classes: HashMap<ClassId, Vec<InstanceId>>,
    destroyed: Vec<InstanceId>,

    off_x: i32,
    off_y: i32,

    transition: Transition,
    quit: Cell<bool>,
    loop_count: u64,
    time: f64,
    iteration: u32,

    input: InputState,
    edges: InputFrame,
}

impl Scene {
    pub fn new(
        name: impl Into<String>,
        width: i32,
        height: i32,
        background_color: Color,
        index: usize,
        config: EngineConfig,
    ) -> Self {
        Self {
            name: name.into(),
            index,
            width,
            height,
            background_color,
            config,
            layers: Vec::new(),
            objects: Instances::with_key(),
            instances: Vec::new(),
            classes: HashMap::new(),
            destroyed: Vec::new(),
            off_x: 0,
            off_y: 0,
            transition: Transition::None,
            quit: Cell::new(false),
            loop_count: 0,
            time: 0.0,
            iteration: 0,
            input: InputState::default(),
            edges: InputFrame::default(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
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
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ticks run since the scene started.
    #[inline]
    pub fn loop_count(&self) -> u64 {
        self.loop_count
    }

    /// Seconds of scene time.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn set_timer(&mut self, seconds: f64) {
        self.time = seconds;
    }

    /// Times the scene has been ended.
    #[inline]
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    // ── layers ────────────────────────────────────────────────────────────

    /// Appends a layer in front of the existing ones and returns its index.
    pub fn add_layer(&mut self, scroll_x: f32, scroll_y: f32, visible: bool) -> usize {
        let index = self.layers.len();
        let canvas = (self.config.canvas_width, self.config.canvas_height);
        self.layers.push(Layer::new(index, Vec2::new(scroll_x, scroll_y), visible, canvas));
        index
    }

    #[inline]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[inline]
    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    #[inline]
    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    pub fn set_layer_visible(&mut self, index: usize, visible: bool) {
        match self.layers.get_mut(index) {
            Some(layer) => layer.visible = visible,
            None => log::warn!("set_layer_visible: no layer {} in {}", index, self.name),
        }
    }

    /// Reorders a layer's instances by a numeric alterable. Instances without
    /// alterables sort as `default`. The sort is stable.
    pub fn sort_layer_by_alterable(&mut self, layer: usize, value: usize, default: f64, order: SortOrder) {
        let Some(target) = self.layers.get_mut(layer) else {
            log::warn!("sort_layer_by_alterable: no layer {} in {}", layer, self.name);
            return;
        };
        target.sort_by(&self.objects, |a, b| {
            let (a, b) = (a.alterable_or(value, default), b.alterable_or(value, default));
            match order {
                SortOrder::Ascending => a.total_cmp(&b),
                SortOrder::Descending => b.total_cmp(&a),
            }
        });
    }

    // ── instances ─────────────────────────────────────────────────────────

    /// Adds `instance` on `layer` (clamped to the existing layers) and
    /// registers it in every index.
    pub fn add_instance(&mut self, mut instance: Instance, layer: usize) -> Result<InstanceId> {
        let Some(last) = self.layers.len().checked_sub(1) else {
            return Err(SceneError::NoLayers);
        };
        let layer = layer.min(last);

        instance.layer = layer;
        instance.destroying = false;
        let class = instance.class();

        let id = self.objects.insert(instance);
        self.instances.push(id);
        self.classes.entry(class).or_default().push(id);
        self.layers[layer].add(id);
        Ok(id)
    }

    /// Adds a static instance drawn under `layer`'s canvas. Background
    /// instances are owned by the layer and never appear in lookups.
    pub fn add_background(&mut self, mut instance: Instance, layer: usize) -> Result<()> {
        let count = self.layers.len();
        let target = self
            .layers
            .get_mut(layer)
            .ok_or(SceneError::LayerOutOfRange { index: layer, count })?;
        instance.layer = layer;
        target.add_background(instance);
        Ok(())
    }

    #[inline]
    pub fn get(&self, id: InstanceId) -> Option<&Instance> {
        self.objects.get(id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut Instance> {
        self.objects.get_mut(id)
    }

    /// Exists and is not marked for destruction.
    pub fn is_live(&self, id: InstanceId) -> bool {
        self.objects.get(id).is_some_and(|i| !i.destroying)
    }

    /// Every instance in creation order, including ones marked for
    /// destruction this tick.
    #[inline]
    pub fn instances(&self) -> &[InstanceId] {
        &self.instances
    }

    /// Marks `id` for removal at the end of the current tick. Repeated calls
    /// and stale handles are ignored.
    pub fn destroy(&mut self, id: InstanceId) {
        let Some(inst) = self.objects.get_mut(id) else {
            log::debug!("destroy: stale instance handle in {}", self.name);
            return;
        };
        if inst.destroying {
            return;
        }
        inst.destroying = true;
        self.destroyed.push(id);
    }

    /// Moves an instance to another layer, in front of that layer's
    /// instances.
    pub fn set_instance_layer(&mut self, id: InstanceId, layer: usize) -> Result<()> {
        let count = self.layers.len();
        if layer >= count {
            return Err(SceneError::LayerOutOfRange { index: layer, count });
        }
        let inst = self.objects.get_mut(id).ok_or(SceneError::UnknownInstance)?;
        let old = mem::replace(&mut inst.layer, layer);

        self.layers[old].remove(id);
        self.layers[layer].add(id);
        Ok(())
    }

    // ── lookups ───────────────────────────────────────────────────────────

    /// Instances of `class` in creation order. Empty for classes never
    /// instantiated.
    pub fn lookup_by_class(&self, class: ClassId) -> &[InstanceId] {
        self.classes.get(&class).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Concatenates the buckets of `classes` in argument order.
    pub fn lookup_qualifier(&self, classes: &[ClassId]) -> Vec<InstanceId> {
        classes
            .iter()
            .flat_map(|c| self.lookup_by_class(*c).iter().copied())
            .collect()
    }

    /// First instance of `class`.
    ///
    /// An empty bucket is logged and reported as `EmptyClass`; with
    /// `EmptyLookupPolicy::Quit` it also requests quit.
    pub fn lookup_one(&self, class: ClassId) -> Result<InstanceId> {
        match self.lookup_by_class(class).first() {
            Some(id) => Ok(*id),
            None => Err(self.empty_lookup(SceneError::EmptyClass { class })),
        }
    }

    pub fn lookup_one_qualifier(&self, classes: &[ClassId]) -> Result<InstanceId> {
        match self.lookup_qualifier(classes).first() {
            Some(id) => Ok(*id),
            None => Err(self.empty_lookup(SceneError::EmptyQualifier)),
        }
    }

    fn empty_lookup(&self, err: SceneError) -> SceneError {
        log::error!("{} (scene {})", err, self.name);
        if self.config.empty_lookup == EmptyLookupPolicy::Quit {
            self.quit.set(true);
        }
        err
    }

    // ── z-order ───────────────────────────────────────────────────────────

    /// Position of `id` within its layer, `0` being back-most.
    pub fn level(&self, id: InstanceId) -> Option<usize> {
        let layer = self.objects.get(id)?.layer;
        self.layers.get(layer)?.level(id)
    }

    /// Moves `id` to `index` within its layer; negative means front.
    pub fn set_level(&mut self, id: InstanceId, index: i32) {
        let Some(layer) = self.objects.get(id).map(|i| i.layer) else {
            return;
        };
        if let Some(layer) = self.layers.get_mut(layer) {
            layer.set_level(id, index);
        }
    }

    pub fn move_to_back(&mut self, id: InstanceId) {
        self.set_level(id, 0);
    }

    pub fn move_to_front(&mut self, id: InstanceId) {
        self.set_level(id, -1);
    }

    /// Sets `id`'s level to `level(other) + 1`, with `other`'s level read
    /// before `id` is removed. When `id` was behind `other` it ends up one
    /// slot past it: `[a, b, c]` with `move_after(a, b)` gives `[b, c, a]`.
    pub fn move_after(&mut self, id: InstanceId, other: InstanceId) {
        if let Some(level) = self.level(other) {
            self.set_level(id, level as i32 + 1);
        }
    }

    /// Places `id` at `other`'s current level.
    pub fn move_to_level_of(&mut self, id: InstanceId, other: InstanceId) {
        if let Some(level) = self.level(other) {
            self.set_level(id, level as i32);
        }
    }

    // ── fixed values ──────────────────────────────────────────────────────

    /// Encodes a handle as a number that scene logic can store in an
    /// alterable value.
    pub fn fixed_value(&self, id: InstanceId) -> f64 {
        f64::from_bits(id.data().as_ffi())
    }

    /// Decodes `fixed_value`. Stale and destroying handles resolve to `None`.
    pub fn resolve_fixed(&self, value: f64) -> Option<InstanceId> {
        let id = InstanceId::from(KeyData::from_ffi(value.to_bits()));
        self.is_live(id).then_some(id)
    }

    // ── canvas ────────────────────────────────────────────────────────────

    /// Pastes the instance's current image onto its layer's canvas.
    pub fn paste_instance(&mut self, id: InstanceId, tag: CollisionTag) {
        let Some(inst) = self.objects.get(id) else {
            return;
        };
        let (image, dest) = match inst.kind() {
            InstanceKind::Active(active) => match active.current_image() {
                Some(img) => (Arc::clone(img), Point::new(inst.x - img.hotspot.x, inst.y - img.hotspot.y)),
                None => {
                    log::warn!("paste: no current image ({})", inst.name);
                    return;
                }
            },
            InstanceKind::Backdrop(b) => (Arc::clone(&b.image), inst.position()),
            _ => {
                log::debug!("paste: {} has no image", inst.name);
                return;
            }
        };

        let source = Rect::new(0, 0, image.width(), image.height());
        if let Some(layer) = self.layers.get_mut(inst.layer) {
            layer.paint(&image, dest, source, tag);
        }
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    pub fn start<E: SceneEvents + ?Sized>(&mut self, events: &mut E) {
        log::debug!("scene {} ({}) start", self.name, self.index);
        events.on_start(self);
    }

    /// Releases every instance and layer and resets per-run state.
    pub fn end(&mut self) {
        log::debug!(
            "scene {} end after {} ticks, {} instances released",
            self.name,
            self.loop_count,
            self.objects.len()
        );
        self.objects.clear();
        self.instances.clear();
        self.classes.clear();
        self.destroyed.clear();
        self.layers.clear();
        self.transition = Transition::None;
        self.loop_count = 0;
        self.off_x = 0;
        self.off_y = 0;
        self.time = 0.0;
        self.edges.clear();
        self.iteration += 1;
    }

    /// Runs one tick. Returns `false` once quit has been requested.
    pub fn tick<E: SceneEvents + ?Sized>(&mut self, dt: f32, events: &mut E) -> bool {
        self.time += dt as f64;

        for i in 0..self.instances.len() {
            let id = self.instances[i];
            if let Some(inst) = self.objects.get_mut(id) {
                inst.update(dt);
                inst.update_movement(dt);
            }
        }

        events.handle_events(self);
        self.sweep();

        self.edges.clear();
        self.loop_count += 1;
        !self.quit.get()
    }

    fn sweep(&mut self) {
        if self.destroyed.is_empty() {
            return;
        }
        let destroyed = mem::take(&mut self.destroyed);
        log::trace!("scene {}: sweeping {} instances", self.name, destroyed.len());

        for id in destroyed {
            let Some(inst) = self.objects.remove(id) else {
                continue;
            };
            self.instances.retain(|i| *i != id);
            if let Some(bucket) = self.classes.get_mut(&inst.class()) {
                bucket.retain(|i| *i != id);
            }
            if let Some(layer) = self.layers.get_mut(inst.layer) {
                layer.remove(id);
            }
        }
    }

    // ── transitions ───────────────────────────────────────────────────────

    /// Requests a rebuild of this scene after the current tick.
    pub fn restart(&mut self) {
        self.transition = Transition::Restart;
    }

    pub fn goto(&mut self, index: usize) {
        self.transition = Transition::Goto(index);
    }

    pub fn quit(&mut self) {
        self.quit.set(true);
    }

    #[inline]
    pub fn has_quit(&self) -> bool {
        self.quit.get()
    }

    #[inline]
    pub fn next_transition(&self) -> Transition {
        self.transition
    }
}
