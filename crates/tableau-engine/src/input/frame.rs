use std::collections::HashSet;

use super::types::{Key, MouseButton};

/// Input edges for the current tick.
///
/// `InputState` holds what is currently down; `InputFrame` holds what
/// changed since the last tick. The scene clears it after every tick.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Keys pressed this tick.
    pub keys_pressed: HashSet<Key>,

    /// Keys released this tick.
    pub keys_released: HashSet<Key>,

    /// Mouse buttons pressed this tick.
    pub buttons_pressed: HashSet<MouseButton>,

    /// Most recent key press this tick.
    pub last_key: Option<Key>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.last_key = None;
    }

    pub fn is_empty(&self) -> bool {
        self.keys_pressed.is_empty()
            && self.keys_released.is_empty()
            && self.buttons_pressed.is_empty()
            && self.last_key.is_none()
    }
}
