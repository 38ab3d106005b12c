use crate::coords::Point;
use crate::input::{Key, MouseButton};

use super::Scene;

/// Edges fed here are visible until the end of the current tick.
impl Scene {
    pub fn on_key(&mut self, key: Key, pressed: bool) {
        self.input.apply_key(&mut self.edges, key, pressed);
    }

    pub fn on_mouse(&mut self, button: MouseButton, pressed: bool) {
        self.input.apply_button(&mut self.edges, button, pressed);
    }

    /// Pointer position in window pixels.
    pub fn set_mouse_position(&mut self, x: i32, y: i32) {
        self.input.pointer = Point::new(x, y);
    }

    /// Pointer position in scene space.
    pub fn mouse_position(&self) -> Point {
        self.input.pointer + self.offset()
    }

    pub fn is_key_pressed_once(&self, key: Key) -> bool {
        self.edges.keys_pressed.contains(&key)
    }

    pub fn is_key_released_once(&self, key: Key) -> bool {
        self.edges.keys_released.contains(&key)
    }

    pub fn is_mouse_pressed_once(&self, button: MouseButton) -> bool {
        self.edges.buttons_pressed.contains(&button)
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.input.key_down(key)
    }

    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        self.input.button_down(button)
    }

    /// Most recent key pressed during this tick.
    pub fn last_key(&self) -> Option<Key> {
        self.edges.last_key
    }
}
