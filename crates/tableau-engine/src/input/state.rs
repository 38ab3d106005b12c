use std::collections::HashSet;

use crate::coords::Point;

use super::frame::InputFrame;
use super::types::{Key, MouseButton};

/// Held keys and buttons plus the pointer position in window pixels.
///
/// Transitions are written into an `InputFrame` as they are applied.
#[derive(Debug, Default)]
pub struct InputState {
    /// Pointer position in window pixels.
    pub pointer: Point,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,

    /// Set of currently held mouse buttons.
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Every press and every release is an edge, key repeats included; the
    /// last press wins `last_key`. A release is recorded even when the key
    /// went down before this state existed.
    pub fn apply_key(&mut self, frame: &mut InputFrame, key: Key, pressed: bool) {
        if pressed {
            self.keys_down.insert(key);
            frame.keys_pressed.insert(key);
            frame.last_key = Some(key);
        } else {
            self.keys_down.remove(&key);
            frame.keys_released.insert(key);
        }
    }

    pub fn apply_button(&mut self, frame: &mut InputFrame, button: MouseButton, pressed: bool) {
        if pressed {
            self.buttons_down.insert(button);
            frame.buttons_pressed.insert(button);
        } else {
            self.buttons_down.remove(&button);
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_edges() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_key(&mut frame, Key::A, true);
        state.apply_key(&mut frame, Key::B, true);
        assert!(frame.keys_pressed.contains(&Key::A));
        assert_eq!(frame.last_key, Some(Key::B));
        assert!(state.key_down(Key::A));

        frame.clear();
        state.apply_key(&mut frame, Key::A, false);
        assert!(frame.keys_released.contains(&Key::A));
        assert!(frame.keys_pressed.is_empty());
        assert!(!state.key_down(Key::A));
    }

    #[test]
    fn release_of_unseen_key_is_still_an_edge() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_key(&mut frame, Key::Space, false);
        assert!(frame.keys_released.contains(&Key::Space));
        assert!(!state.key_down(Key::Space));
    }

    #[test]
    fn buttons_track_presses() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_button(&mut frame, MouseButton::Left, true);
        assert!(frame.buttons_pressed.contains(&MouseButton::Left));
        assert!(state.button_down(MouseButton::Left));
        state.apply_button(&mut frame, MouseButton::Left, false);
        assert!(!state.button_down(MouseButton::Left));
    }
}
