//! Placeable scene entities.
//!
//! An `Instance` carries the state every kind shares (position, visibility,
//! tint, facing direction) plus a kind payload. Animation, movement,
//! alterable values and shader parameters are optional components owned by
//! the instance, not layers of a type hierarchy.
//!
//! Instances are owned by their `Scene` and addressed by `InstanceId`.

mod alterables;
mod movement;
mod shader;

use std::fmt;
use std::sync::Arc;

use crate::animation::{self, Active};
use crate::collision::Shape;
use crate::coords::{Point, Rect};
use crate::image::Image;
use crate::paint::Color;
use crate::render::{ImageDraw, RenderBackend};

pub use alterables::{Alterables, STRING_COUNT, VALUE_COUNT};
pub use movement::{Body, Movement, StaticMovement};
pub use shader::ShaderParameters;

slotmap::new_key_type! {
    /// Handle to an instance owned by a `Scene`.
    pub struct InstanceId;
}

/// Declared object kind. Shared by every instance created from the same
/// declaration and used for class-bucket lookups.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ClassId(pub u32);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Static image placed by its top-left corner.
#[derive(Debug, Clone)]
pub struct Backdrop {
    pub image: Arc<Image>,
}

/// Solid coloured rectangle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct QuickBackdrop {
    pub width: i32,
    pub height: i32,
    pub color: Color,
}

/// Per-kind payload.
#[derive(Debug, Clone)]
pub enum InstanceKind {
    /// Logic-only object. Never drawn, never collides.
    Plain,
    Active(Box<Active>),
    Backdrop(Backdrop),
    QuickBackdrop(QuickBackdrop),
}

#[derive(Debug)]
pub struct Instance {
    pub name: String,
    class: ClassId,
    pub x: i32,
    pub y: i32,
    pub visible: bool,
    pub blend_color: Color,
    direction: usize,
    /// Moves with the playfield. Instances with `false` keep their screen
    /// position when the view scrolls.
    pub scroll: bool,

    pub(crate) destroying: bool,
    pub(crate) layer: usize,

    movement: Option<Box<dyn Movement>>,
    alterables: Option<Alterables>,
    shader: Option<ShaderParameters>,
    kind: InstanceKind,
}

impl Instance {
    pub fn new(name: impl Into<String>, class: ClassId, x: i32, y: i32, mut kind: InstanceKind) -> Self {
        let name = name.into();
        let mut alterables = None;
        if let InstanceKind::Active(active) = &mut kind {
            active.owner = Arc::from(name.as_str());
            alterables = Some(Alterables::new());
        }

        Self {
            name,
            class,
            x,
            y,
            visible: true,
            blend_color: Color::WHITE,
            direction: 0,
            scroll: true,
            destroying: false,
            layer: 0,
            movement: None,
            alterables,
            shader: None,
            kind,
        }
    }

    pub fn plain(name: impl Into<String>, class: ClassId, x: i32, y: i32) -> Self {
        Self::new(name, class, x, y, InstanceKind::Plain)
    }

    pub fn active(name: impl Into<String>, class: ClassId, x: i32, y: i32, active: Active) -> Self {
        Self::new(name, class, x, y, InstanceKind::Active(Box::new(active)))
    }

    pub fn backdrop(name: impl Into<String>, class: ClassId, x: i32, y: i32, image: Arc<Image>) -> Self {
        Self::new(name, class, x, y, InstanceKind::Backdrop(Backdrop { image }))
    }

    pub fn quick_backdrop(name: impl Into<String>, class: ClassId, rect: Rect, color: Color) -> Self {
        let kind = InstanceKind::QuickBackdrop(QuickBackdrop {
            width: rect.w,
            height: rect.h,
            color,
        });
        Self::new(name, class, rect.x, rect.y, kind)
    }

    // ── identity & state ──────────────────────────────────────────────────

    #[inline]
    pub fn class(&self) -> ClassId {
        self.class
    }

    #[inline]
    pub fn kind(&self) -> &InstanceKind {
        &self.kind
    }

    #[inline]
    pub fn layer(&self) -> usize {
        self.layer
    }

    /// Marked for destruction; removed at the end of the current tick.
    #[inline]
    pub fn is_destroying(&self) -> bool {
        self.destroying
    }

    #[inline]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub fn as_active(&self) -> Option<&Active> {
        match &self.kind {
            InstanceKind::Active(a) => Some(&**a),
            _ => None,
        }
    }

    pub fn as_active_mut(&mut self) -> Option<&mut Active> {
        match &mut self.kind {
            InstanceKind::Active(a) => Some(&mut **a),
            _ => None,
        }
    }

    /// Replaces the tint's RGB from a packed `0xRRGGBB`, keeping its alpha.
    pub fn set_blend_color(&mut self, rgb: u32) {
        let a = self.blend_color.a;
        self.blend_color = Color::from_rgb_int(rgb).with_alpha(a);
    }

    // ── direction ─────────────────────────────────────────────────────────

    #[inline]
    pub fn direction(&self) -> usize {
        self.direction
    }

    /// Sets the facing direction to `value & 31`.
    pub fn set_direction(&mut self, value: i32) {
        self.direction = animation::wrap_direction(value);
        if let InstanceKind::Active(active) = &mut self.kind {
            active.set_direction(self.direction);
        }
    }

    /// Clears the animation's forced direction and adopts it as the facing
    /// direction, so movements and direction tests see what is drawn.
    pub fn restore_direction(&mut self) {
        let restored = match &mut self.kind {
            InstanceKind::Active(active) => active.restore_direction(),
            _ => None,
        };
        if let Some(dir) = restored {
            self.set_direction(dir as i32);
        }
    }

    pub fn test_direction(&self, value: usize) -> bool {
        self.direction == value
    }

    /// Tests the facing direction against a bitmask of accepted directions.
    pub fn test_directions(&self, mask: u32) -> bool {
        (mask >> self.direction) & 1 != 0
    }

    // ── components ────────────────────────────────────────────────────────

    pub fn movement(&self) -> Option<&dyn Movement> {
        self.movement.as_deref()
    }

    /// The attached movement, attaching a `StaticMovement` if there is none.
    pub fn movement_mut(&mut self) -> &mut dyn Movement {
        self.movement
            .get_or_insert_with(|| Box::new(StaticMovement) as Box<dyn Movement>)
            .as_mut()
    }

    pub fn set_movement(&mut self, movement: Box<dyn Movement>) {
        self.movement = Some(movement);
    }

    pub fn alterables(&self) -> Option<&Alterables> {
        self.alterables.as_ref()
    }

    pub fn create_alterables(&mut self) {
        self.alterables.get_or_insert_with(Alterables::new);
    }

    /// Alterables, allocating them on first access.
    pub fn alterables_mut(&mut self) -> &mut Alterables {
        self.alterables.get_or_insert_with(Alterables::new)
    }

    /// Numeric alterable `index`, or `default` when none are allocated.
    pub fn alterable_or(&self, index: usize, default: f64) -> f64 {
        self.alterables.as_ref().map_or(default, |a| a.value(index))
    }

    pub fn shader(&self) -> Option<&ShaderParameters> {
        self.shader.as_ref()
    }

    pub fn set_shader(&mut self, name: impl Into<String>) {
        self.shader.get_or_insert_with(ShaderParameters::default).shader = Some(name.into());
    }

    pub fn set_shader_parameter(&mut self, name: &str, value: f64) {
        self.shader.get_or_insert_with(ShaderParameters::default).set(name, value);
    }

    pub fn set_shader_parameter_color(&mut self, name: &str, color: Color) {
        self.shader.get_or_insert_with(ShaderParameters::default).set_color(name, color);
    }

    pub fn shader_parameter(&self, name: &str) -> f64 {
        self.shader.as_ref().map_or(0.0, |s| s.get(name))
    }

    // ── per-tick hooks ────────────────────────────────────────────────────

    pub(crate) fn update(&mut self, dt: f32) {
        if let InstanceKind::Active(active) = &mut self.kind {
            active.update(dt, &mut self.visible);
        }
    }

    pub(crate) fn update_movement(&mut self, dt: f32) {
        let Some(movement) = self.movement.as_mut() else {
            return;
        };
        let mut body = Body {
            x: self.x,
            y: self.y,
            direction: self.direction,
        };
        movement.update(&mut body, dt);

        self.x = body.x;
        self.y = body.y;
        if body.direction != self.direction {
            self.set_direction(body.direction as i32);
        }
    }

    /// Collision shape for the current state; `None` for kinds that never
    /// collide.
    pub fn collision(&self) -> Option<Shape<'_>> {
        match &self.kind {
            InstanceKind::Plain => None,
            InstanceKind::Active(active) => active.shape(self.position()),
            InstanceKind::Backdrop(b) => Some(Shape::Box(Rect::new(
                self.x,
                self.y,
                b.image.width(),
                b.image.height(),
            ))),
            InstanceKind::QuickBackdrop(q) => Some(Shape::Box(Rect::new(self.x, self.y, q.width, q.height))),
        }
    }

    pub fn draw(&self, backend: &mut dyn RenderBackend) {
        match &self.kind {
            InstanceKind::Plain => {}
            InstanceKind::Active(active) => {
                let Some(image) = active.current_image() else {
                    log::warn!("invalid image draw ({})", self.name);
                    return;
                };
                let mut draw = ImageDraw::at(self.position(), image.hotspot);
                draw.angle = active.angle();
                draw.scale = active.scale();
                draw.tint = self.blend_color;
                backend.draw_image(image, draw);
            }
            InstanceKind::Backdrop(b) => {
                let mut draw = ImageDraw::at(self.position(), Point::zero());
                draw.tint = self.blend_color;
                backend.draw_image(&b.image, draw);
            }
            InstanceKind::QuickBackdrop(q) => {
                let rect = Rect::new(self.x, self.y, q.width, q.height);
                backend.fill_rect(rect, q.color.with_alpha(self.blend_color.a));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationId, AnimationSetBuilder};
    use crate::render::{DrawCmd, Recorder};

    fn active_instance() -> Instance {
        let mut b = AnimationSetBuilder::new();
        for dir in [0, 16] {
            b.add_direction(AnimationId(0), dir, 0, 0, 0, 0).unwrap();
            let img = Image::filled(4, 4, Color::WHITE).with_hotspot(2, 2);
            b.add_frame(AnimationId(0), dir, Arc::new(img)).unwrap();
        }
        Instance::active("hero", ClassId(1), 10, 10, Active::new(b.build().unwrap()))
    }

    #[derive(Debug)]
    struct Walk;

    impl Movement for Walk {
        fn update(&mut self, body: &mut Body, _dt: f32) {
            body.x += 2;
            body.direction = 16;
        }
    }

    // ── state ─────────────────────────────────────────────────────────────

    #[test]
    fn blend_color_keeps_alpha() {
        let mut inst = Instance::plain("p", ClassId(0), 0, 0);
        inst.blend_color = Color::rgba(1, 2, 3, 40);
        inst.set_blend_color(0x102030);
        assert_eq!(inst.blend_color, Color::rgba(0x10, 0x20, 0x30, 40));
    }

    #[test]
    fn direction_wraps_and_reaches_the_animation() {
        let mut inst = active_instance();
        inst.set_direction(48);
        assert_eq!(inst.direction(), 16);
        assert_eq!(inst.as_active().unwrap().animation_direction(), 16);
        assert!(inst.test_direction(16));
        assert!(inst.test_directions(1 << 16));
        assert!(!inst.test_directions(1));
    }

    #[test]
    fn restored_direction_becomes_the_facing() {
        let mut inst = active_instance();
        inst.as_active_mut().unwrap().force_direction(16);
        assert_eq!(inst.direction(), 0);

        inst.restore_direction();
        assert_eq!(inst.direction(), 16);
        assert_eq!(inst.as_active().unwrap().animation_direction(), 16);
        assert!(inst.test_direction(16));
        assert!(inst.test_directions(1 << 16));
    }

    #[test]
    fn restore_without_forced_direction_keeps_facing() {
        let mut inst = active_instance();
        inst.set_direction(16);
        inst.restore_direction();
        assert_eq!(inst.direction(), 16);
        assert_eq!(inst.as_active().unwrap().animation_direction(), 16);
    }

    #[test]
    fn movement_sees_the_restored_direction() {
        #[derive(Debug)]
        struct Record(std::rc::Rc<std::cell::Cell<usize>>);

        impl Movement for Record {
            fn update(&mut self, body: &mut Body, _dt: f32) {
                self.0.set(body.direction);
            }
        }

        let seen = std::rc::Rc::new(std::cell::Cell::new(usize::MAX));
        let mut inst = active_instance();
        inst.set_movement(Box::new(Record(std::rc::Rc::clone(&seen))));
        inst.as_active_mut().unwrap().force_direction(16);
        inst.restore_direction();
        inst.update_movement(0.016);
        assert_eq!(seen.get(), 16);
    }

    // ── components ────────────────────────────────────────────────────────

    #[test]
    fn active_allocates_alterables_plain_does_not() {
        assert!(active_instance().alterables().is_some());
        let mut plain = Instance::plain("p", ClassId(0), 0, 0);
        assert!(plain.alterables().is_none());
        assert_eq!(plain.alterable_or(0, 7.0), 7.0);
        plain.alterables_mut().set_value(0, 3.0);
        assert_eq!(plain.alterable_or(0, 7.0), 3.0);
    }

    #[test]
    fn shader_bag_is_lazy() {
        let mut inst = Instance::plain("p", ClassId(0), 0, 0);
        assert!(inst.shader().is_none());
        assert_eq!(inst.shader_parameter("fade"), 0.0);
        inst.set_shader_parameter_color("tint", Color::rgb(0, 0, 255));
        assert_eq!(inst.shader_parameter("tint"), 255.0);
        assert_eq!(inst.shader_parameter("fade"), 0.0);
    }

    #[test]
    fn movement_is_created_on_demand() {
        let mut inst = Instance::plain("p", ClassId(0), 0, 0);
        assert!(inst.movement().is_none());
        let _ = inst.movement_mut();
        assert!(inst.movement().is_some());
    }

    #[test]
    fn movement_writes_back_position_and_direction() {
        let mut inst = active_instance();
        inst.set_movement(Box::new(Walk));
        inst.update_movement(0.016);
        assert_eq!(inst.position(), Point::new(12, 10));
        assert_eq!(inst.direction(), 16);
        assert_eq!(inst.as_active().unwrap().animation_direction(), 16);
    }

    // ── collision & draw ──────────────────────────────────────────────────

    #[test]
    fn plain_has_no_shape() {
        assert!(Instance::plain("p", ClassId(0), 0, 0).collision().is_none());
    }

    #[test]
    fn backdrop_box_starts_at_position() {
        let img = Arc::new(Image::filled(3, 5, Color::WHITE));
        let inst = Instance::backdrop("b", ClassId(2), 4, 4, img);
        assert_eq!(inst.collision().unwrap().bounds(), Rect::new(4, 4, 3, 5));
    }

    #[test]
    fn active_draws_at_hotspot_with_tint() {
        let mut inst = active_instance();
        inst.blend_color = Color::rgb(255, 0, 0);
        let mut rec = Recorder::new();
        inst.draw(&mut rec);
        let [DrawCmd::Image { draw, .. }] = rec.commands() else {
            panic!("expected one image draw, got {:?}", rec.commands());
        };
        assert_eq!(draw.position, Point::new(10, 10));
        assert_eq!(draw.anchor, Point::new(2, 2));
        assert_eq!(draw.tint, Color::rgb(255, 0, 0));
    }

    #[test]
    fn quick_backdrop_uses_tint_alpha() {
        let mut inst = Instance::quick_backdrop("q", ClassId(3), Rect::new(0, 0, 8, 2), Color::rgb(0, 255, 0));
        inst.blend_color = Color::WHITE.with_alpha(128);
        let mut rec = Recorder::new();
        inst.draw(&mut rec);
        assert_eq!(
            rec.commands(),
            &[DrawCmd::FillRect { rect: Rect::new(0, 0, 8, 2), color: Color::rgba(0, 255, 0, 128) }]
        );
    }
}
