use std::fmt;

/// The part of an instance a movement may change.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Body {
    pub x: i32,
    pub y: i32,
    /// Facing direction, `0..32`.
    pub direction: usize,
}

/// Behaviour attached to an instance and advanced once per tick, after the
/// instance's own update.
pub trait Movement: fmt::Debug {
    fn update(&mut self, body: &mut Body, dt: f32);
}

/// Movement that never moves.
#[derive(Debug, Copy, Clone, Default)]
pub struct StaticMovement;

impl Movement for StaticMovement {
    fn update(&mut self, _body: &mut Body, _dt: f32) {}
}
