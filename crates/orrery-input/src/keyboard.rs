//! Frame-coherent keyboard state tracker.
//!
//! [`KeyboardState`] accumulates winit key events between frames and answers,
//! for any physical key, whether it is held and whether it went down or up
//! since the last [`clear_transients`](KeyboardState::clear_transients).
//!
//! Physical key codes are used so the scene bindings (`=`, `-`, W/X/A/D, U/P)
//! stay on the same keys regardless of keyboard layout.

use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::PhysicalKey;

/// Minimal description of a key event for processing.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    /// The physical key involved.
    pub key: PhysicalKey,
    /// Whether the key was pressed or released.
    pub state: ElementState,
    /// Whether this is a repeat event.
    pub repeat: bool,
}

/// Tracks per-frame keyboard state using physical (scan-code) keys.
///
/// Forward every [`KeyEvent`] to [`process_event`](Self::process_event), read
/// state during the frame, then call [`clear_transients`](Self::clear_transients).
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pressed: HashSet<PhysicalKey>,
    just_pressed: HashSet<PhysicalKey>,
    just_released: HashSet<PhysicalKey>,
}

impl KeyboardState {
    /// Creates a new `KeyboardState` with no keys pressed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes a winit [`KeyEvent`], updating internal state.
    pub fn process_event(&mut self, event: &KeyEvent) {
        self.process_raw(RawKeyEvent {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        });
    }

    /// Processes a [`RawKeyEvent`]. Repeat events are ignored.
    pub fn process_raw(&mut self, event: RawKeyEvent) {
        if event.repeat {
            return;
        }
        match event.state {
            ElementState::Pressed => {
                if self.pressed.insert(event.key) {
                    self.just_pressed.insert(event.key);
                }
            }
            ElementState::Released => {
                if self.pressed.remove(&event.key) {
                    self.just_released.insert(event.key);
                }
            }
        }
    }

    /// Release every held key.
    ///
    /// Called when the window loses focus: the matching release events are
    /// delivered to whichever window gained focus, so without this a movement
    /// key would stay held forever.
    pub fn release_all(&mut self) {
        self.just_released.extend(self.pressed.drain());
    }

    /// Returns `true` while the key is held down.
    #[must_use]
    pub fn is_pressed(&self, key: PhysicalKey) -> bool {
        self.pressed.contains(&key)
    }

    /// Returns `true` only during the frame the key transitioned to pressed.
    #[must_use]
    pub fn just_pressed(&self, key: PhysicalKey) -> bool {
        self.just_pressed.contains(&key)
    }

    /// Returns `true` only during the frame the key transitioned to released.
    #[must_use]
    pub fn just_released(&self, key: PhysicalKey) -> bool {
        self.just_released.contains(&key)
    }

    /// Number of keys currently held.
    #[must_use]
    pub fn held_count(&self) -> usize {
        self.pressed.len()
    }

    /// Clears `just_pressed` and `just_released` sets. Call at end of frame.
    pub fn clear_transients(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    fn raw(code: KeyCode, state: ElementState, repeat: bool) -> RawKeyEvent {
        RawKeyEvent {
            key: PhysicalKey::Code(code),
            state,
            repeat,
        }
    }

    #[test]
    fn test_initial_state_no_keys_pressed() {
        let kb = KeyboardState::new();
        for k in [KeyCode::Equal, KeyCode::Minus, KeyCode::Space, KeyCode::KeyQ] {
            let pk = PhysicalKey::Code(k);
            assert!(!kb.is_pressed(pk));
            assert!(!kb.just_pressed(pk));
            assert!(!kb.just_released(pk));
        }
        assert_eq!(kb.held_count(), 0);
    }

    #[test]
    fn test_press_then_release() {
        let mut kb = KeyboardState::new();
        let pk = PhysicalKey::Code(KeyCode::Equal);
        kb.process_raw(raw(KeyCode::Equal, ElementState::Pressed, false));
        assert!(kb.is_pressed(pk));
        assert!(kb.just_pressed(pk));

        kb.process_raw(raw(KeyCode::Equal, ElementState::Released, false));
        assert!(!kb.is_pressed(pk));
        assert!(kb.just_released(pk));
    }

    #[test]
    fn test_transients_last_one_frame() {
        let mut kb = KeyboardState::new();
        let pk = PhysicalKey::Code(KeyCode::Space);
        kb.process_raw(raw(KeyCode::Space, ElementState::Pressed, false));
        kb.clear_transients();
        assert!(!kb.just_pressed(pk));
        assert!(kb.is_pressed(pk));

        kb.process_raw(raw(KeyCode::Space, ElementState::Released, false));
        kb.clear_transients();
        assert!(!kb.just_released(pk));
    }

    #[test]
    fn test_simultaneous_keys_tracked_independently() {
        let mut kb = KeyboardState::new();
        kb.process_raw(raw(KeyCode::KeyW, ElementState::Pressed, false));
        kb.process_raw(raw(KeyCode::KeyD, ElementState::Pressed, false));
        kb.process_raw(raw(KeyCode::KeyW, ElementState::Released, false));

        assert!(!kb.is_pressed(PhysicalKey::Code(KeyCode::KeyW)));
        assert!(kb.is_pressed(PhysicalKey::Code(KeyCode::KeyD)));
        assert_eq!(kb.held_count(), 1);
    }

    #[test]
    fn test_repeat_events_ignored() {
        let mut kb = KeyboardState::new();
        kb.process_raw(raw(KeyCode::KeyP, ElementState::Pressed, false));
        kb.clear_transients();
        kb.process_raw(raw(KeyCode::KeyP, ElementState::Pressed, true));
        let pk = PhysicalKey::Code(KeyCode::KeyP);
        assert!(kb.is_pressed(pk));
        assert!(!kb.just_pressed(pk));
    }

    #[test]
    fn test_release_without_press_is_not_an_edge() {
        let mut kb = KeyboardState::new();
        kb.process_raw(raw(KeyCode::KeyU, ElementState::Released, false));
        assert!(!kb.just_released(PhysicalKey::Code(KeyCode::KeyU)));
    }

    #[test]
    fn test_release_all_on_focus_loss() {
        let mut kb = KeyboardState::new();
        kb.process_raw(raw(KeyCode::Equal, ElementState::Pressed, false));
        kb.process_raw(raw(KeyCode::KeyU, ElementState::Pressed, false));
        kb.clear_transients();

        kb.release_all();
        assert_eq!(kb.held_count(), 0);
        assert!(kb.just_released(PhysicalKey::Code(KeyCode::Equal)));
        assert!(kb.just_released(PhysicalKey::Code(KeyCode::KeyU)));
    }
}
