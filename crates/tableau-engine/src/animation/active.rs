use std::sync::Arc;

use crate::collision::{self, Shape, SpriteShape};
use crate::coords::{Point, Rect, Vec2};
use crate::image::Image;

use super::set::{AnimationId, AnimationSet, Direction, DIRECTION_COUNT};

/// Accumulator units per frame advance.
pub const FRAME_THRESHOLD: i32 = 100;

#[derive(Debug, Copy, Clone, PartialEq)]
struct Flash {
    interval: f32,
    elapsed: f32,
}

/// Animation playback state of an animated instance.
///
/// The state is an `(animation, direction, frame)` triple. Speed, frame and
/// direction can each be overridden independently; an override wins over the
/// underlying field until it is restored.
#[derive(Debug, Clone)]
pub struct Active {
    animations: Arc<AnimationSet>,
    /// Owner name, for diagnostics.
    pub(crate) owner: Arc<str>,

    animation: AnimationId,
    frame: usize,
    counter: i32,
    direction: usize,

    forced_frame: Option<usize>,
    forced_speed: Option<i32>,
    forced_direction: Option<usize>,

    stopped: bool,
    flash: Option<Flash>,

    angle: f64,
    scale: Vec2,
    /// Hit-test against the image bounds instead of its pixel mask.
    pub collision_box: bool,
}

impl Active {
    /// Starts on the lowest declared animation, facing direction 0.
    pub fn new(animations: Arc<AnimationSet>) -> Self {
        let animation = animations.first().unwrap_or_default();
        Self::with_animation(animations, animation)
    }

    pub fn with_animation(animations: Arc<AnimationSet>, animation: AnimationId) -> Self {
        let mut active = Self {
            animations,
            owner: Arc::from(""),
            animation,
            frame: 0,
            counter: 0,
            direction: 0,
            forced_frame: None,
            forced_speed: None,
            forced_direction: None,
            stopped: false,
            flash: None,
            angle: 0.0,
            scale: Vec2::one(),
            collision_box: false,
        };
        active.update_frame();
        active
    }

    // ── queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn animations(&self) -> &Arc<AnimationSet> {
        &self.animations
    }

    #[inline]
    pub fn animation(&self) -> AnimationId {
        self.animation
    }

    /// Current frame index, honouring a forced frame.
    #[inline]
    pub fn frame(&self) -> usize {
        self.forced_frame.unwrap_or(self.frame)
    }

    /// Speed accumulator, in `FRAME_THRESHOLD` units per frame.
    #[inline]
    pub fn counter(&self) -> i32 {
        self.counter
    }

    /// Direction used for image lookup, honouring a forced direction.
    #[inline]
    pub fn animation_direction(&self) -> usize {
        self.forced_direction.unwrap_or(self.direction)
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    #[inline]
    pub fn is_flashing(&self) -> bool {
        self.flash.is_some()
    }

    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    #[inline]
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    #[inline]
    pub fn test_animation(&self, id: AnimationId) -> bool {
        self.animation == id
    }

    pub fn direction_data(&self) -> Option<&Direction> {
        self.animations.direction(self.animation, self.animation_direction())
    }

    /// Playback speed: the forced speed, else the direction's maximum.
    pub fn speed(&self) -> i32 {
        match self.forced_speed {
            Some(speed) => speed,
            None => self.direction_data().map_or(0, |d| d.max_speed),
        }
    }

    /// Image for the current state, if the animation/direction/frame exist.
    pub fn current_image(&self) -> Option<&Arc<Image>> {
        self.direction_data()?.frames.get(self.frame())
    }

    // ── animation ─────────────────────────────────────────────────────────

    /// Switches animation. The frame restarts at 0 unless a frame is forced.
    ///
    /// Undeclared animations are logged and ignored.
    pub fn force_animation(&mut self, id: AnimationId) {
        if id == self.animation {
            return;
        }
        if !self.animations.contains(id) {
            log::warn!("invalid animation: {} ({})", id, self.owner);
            return;
        }
        self.animation = id;
        if self.forced_frame.is_none() {
            self.frame = 0;
        }
        self.update_frame();
    }

    pub fn stop_animation(&mut self) {
        self.stopped = true;
    }

    pub fn start_animation(&mut self) {
        self.stopped = false;
    }

    // ── overrides ─────────────────────────────────────────────────────────

    pub fn force_frame(&mut self, frame: usize) {
        self.forced_frame = Some(frame);
        self.update_frame();
    }

    /// Clears the forced frame, keeping it as the current frame.
    pub fn restore_frame(&mut self) {
        if let Some(frame) = self.forced_frame.take() {
            self.frame = frame;
        }
        self.update_frame();
    }

    /// Overrides the playback speed. Negative speeds are treated as `0`.
    pub fn force_speed(&mut self, speed: i32) {
        self.forced_speed = Some(speed.max(0));
    }

    pub fn restore_speed(&mut self) {
        self.forced_speed = None;
    }

    /// Forces the lookup direction (`value & 31`).
    pub fn force_direction(&mut self, value: i32) {
        self.forced_direction = Some(wrap_direction(value));
        self.update_frame();
    }

    /// Clears the forced direction, keeping it as the current direction,
    /// and returns it. The owning instance adopts the returned facing, see
    /// `Instance::restore_direction`.
    pub(crate) fn restore_direction(&mut self) -> Option<usize> {
        let restored = self.forced_direction.take();
        if let Some(dir) = restored {
            self.direction = dir;
        }
        self.update_frame();
        restored
    }

    pub(crate) fn set_direction(&mut self, dir: usize) {
        self.direction = dir % DIRECTION_COUNT;
        self.update_frame();
    }

    // ── flashing ──────────────────────────────────────────────────────────

    /// Toggles visibility every `interval` seconds. `0` (or less) stops
    /// flashing without touching visibility.
    pub fn flash(&mut self, interval: f32) {
        self.flash = (interval > 0.0).then_some(Flash { interval, elapsed: 0.0 });
    }

    // ── transform ─────────────────────────────────────────────────────────

    /// Sets the rotation in degrees, normalised to `[0, 360)`.
    pub fn set_angle(&mut self, angle: f64) {
        self.angle = angle.rem_euclid(360.0);
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = Vec2::splat(scale);
    }

    pub fn set_x_scale(&mut self, value: f32) {
        self.scale.x = value;
    }

    pub fn set_y_scale(&mut self, value: f32) {
        self.scale.y = value;
    }

    /// Scene position of the current image's action point for an instance
    /// at `origin`.
    pub fn action_point(&self, origin: Point) -> Point {
        let Some(img) = self.current_image() else {
            return origin;
        };
        let (sin, cos) = self.angle.to_radians().sin_cos();
        let lx = (img.action.x - img.hotspot.x) as f64 * self.scale.x as f64;
        let ly = (img.action.y - img.hotspot.y) as f64 * self.scale.y as f64;
        let rx = lx * cos + ly * sin;
        let ry = -lx * sin + ly * cos;
        origin.offset(rx.round() as i32, ry.round() as i32)
    }

    /// Collision shape for an instance at `origin`.
    ///
    /// Rotated sprites use their rotated bounding box without a mask.
    pub fn shape(&self, origin: Point) -> Option<Shape<'_>> {
        let image = self.current_image()?;
        let rotated = self.angle != 0.0;
        let rect = if rotated {
            collision::transformed_bounds(origin, image.hotspot, image.width(), image.height(), self.scale, self.angle)
        } else {
            scaled_rect(origin, image, self.scale)
        };

        Some(Shape::Sprite(SpriteShape {
            image,
            rect,
            source: Point::zero(),
            scale: self.scale,
            use_mask: !rotated && !self.collision_box,
        }))
    }

    // ── playback ──────────────────────────────────────────────────────────

    /// Advances flashing and frame playback by one tick.
    pub(crate) fn update(&mut self, dt: f32, visible: &mut bool) {
        if let Some(flash) = &mut self.flash {
            flash.elapsed += dt;
            if flash.elapsed >= flash.interval {
                flash.elapsed = 0.0;
                *visible = !*visible;
            }
        }

        if self.forced_frame.is_some() || self.stopped {
            return;
        }
        let Some((count, loop_count, back_to)) = self
            .direction_data()
            .map(|d| (d.frame_count(), d.loop_count, d.back_to))
        else {
            return;
        };

        self.counter = self.counter.saturating_add(self.speed().max(0));
        let steps = (self.counter / FRAME_THRESHOLD) as usize;
        if steps == 0 {
            return;
        }
        self.counter %= FRAME_THRESHOLD;

        let old_frame = self.frame;
        self.frame = advance(self.frame, steps, count, loop_count, back_to);
        if self.frame != old_frame {
            self.update_frame();
        }
    }

    /// Clamps the effective frame into the current direction's frame list.
    fn update_frame(&mut self) {
        let count = self.direction_data().map_or(0, Direction::frame_count);
        let last = count.saturating_sub(1);
        match &mut self.forced_frame {
            Some(frame) => *frame = (*frame).min(last),
            None => self.frame = self.frame.min(last),
        }
    }
}

/// Frame reached after `steps` single-frame advances through `count`
/// frames. Past the end, a nonzero `loop_count` holds the last frame and
/// `0` continues from `back_to`.
fn advance(frame: usize, steps: usize, count: usize, loop_count: i32, back_to: usize) -> usize {
    if count == 0 {
        return frame;
    }
    let last = count - 1;
    let to_end = last.saturating_sub(frame);
    if steps <= to_end {
        return frame + steps;
    }
    if loop_count != 0 {
        return last;
    }

    // The first advance past the end lands on `back_to`; later ones cycle
    // through `back_to..count`, stepping from `last` back onto `back_to`.
    let back_to = back_to.min(last);
    let period = count - back_to;
    back_to + (steps - to_end - 1) % period
}

#[inline]
pub(crate) fn wrap_direction(value: i32) -> usize {
    (value & (DIRECTION_COUNT as i32 - 1)) as usize
}

fn scaled_rect(origin: Point, image: &Image, scale: Vec2) -> Rect {
    let w = (image.width() as f32 * scale.x.abs()).round() as i32;
    let h = (image.height() as f32 * scale.y.abs()).round() as i32;
    let hx = (image.hotspot.x as f32 * scale.x.abs()).round() as i32;
    let hy = (image.hotspot.y as f32 * scale.y.abs()).round() as i32;
    let x = if scale.x < 0.0 { origin.x - (w - hx) } else { origin.x - hx };
    let y = if scale.y < 0.0 { origin.y - (h - hy) } else { origin.y - hy };
    Rect::new(x, y, w, h)
}
