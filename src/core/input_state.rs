//=========================================================================
// Input State
//=========================================================================
//
// Message-driven input snapshot a StateMachine can embed.
//
// Architecture:
//   Input message → apply() → HashSet (keys/buttons held) → query
//
// Frame lifecycle: begin_frame() → apply()* → query
//
// Persistent state (held keys, pointer, modifiers) survives frames; the
// pressed/released deltas are reset by begin_frame().
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use super::message::{Action, Input, InputCode, KeyCode, Modifiers, MouseButton};

//=== InputState ==========================================================

/// Tracks held keys/buttons, pointer position and modifiers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputState {
    //--- Persistent State ------------------------------------------------
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
    pointer: Option<(f32, f32)>,
    modifiers: Modifiers,

    //--- Frame Deltas ----------------------------------------------------
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_released: HashSet<MouseButton>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Frame Processing -------------------------------------------------

    /// Clears per-frame deltas (pressed/released).
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
    }

    /// Folds one Input message into the state.
    pub fn apply(&mut self, input: &Input) {
        self.modifiers = input.modifiers;
        if let Some(position) = input.position {
            self.pointer = Some(position);
        }

        match (input.code, input.action) {
            (InputCode::Key(key), Action::Pressed) => {
                // Only mark as pressed if it wasn't already down
                if self.keys_down.insert(key) {
                    self.keys_pressed.insert(key);
                }
            }
            (InputCode::Key(key), Action::Released) => {
                if self.keys_down.remove(&key) {
                    self.keys_released.insert(key);
                }
            }
            (InputCode::Key(key), Action::Repeated) => {
                self.keys_down.insert(key);
            }
            (InputCode::Button(button), Action::Pressed) => {
                if self.buttons_down.insert(button) {
                    self.buttons_pressed.insert(button);
                }
            }
            (InputCode::Button(button), Action::Released) => {
                if self.buttons_down.remove(&button) {
                    self.buttons_released.insert(button);
                }
            }
            // Pointer motion only updates position; other combinations
            // carry no state.
            _ => {}
        }
    }

    //=====================================================================
    // Query API - Keyboard
    //=====================================================================

    /// Returns `true` if the key went down this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Returns `true` while the key is held.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns `true` if the key went up this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    pub fn keys_down(&self) -> impl Iterator<Item = &KeyCode> {
        self.keys_down.iter()
    }

    //=====================================================================
    // Query API - Mouse
    //=====================================================================

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    pub fn is_button_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    /// Last known pointer position in window pixels.
    pub fn pointer(&self) -> Option<(f32, f32)> {
        self.pointer
    }

    //=====================================================================
    // Query API - Modifiers
    //=====================================================================

    /// Modifier state carried by the most recent Input message.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Test Helpers -----------------------------------------------------

    fn key(key: KeyCode, action: Action) -> Input {
        Input {
            code: InputCode::Key(key),
            action,
            modifiers: Modifiers::empty(),
            position: None,
        }
    }

    fn button(button: MouseButton, action: Action) -> Input {
        Input {
            code: InputCode::Button(button),
            action,
            modifiers: Modifiers::empty(),
            position: Some((5.0, 6.0)),
        }
    }

    //=====================================================================
    // Keyboard Tests
    //=====================================================================

    #[test]
    fn key_pressed_only_on_transition_frame() {
        let mut state = InputState::new();

        state.begin_frame();
        state.apply(&key(KeyCode::KeyA, Action::Pressed));
        assert!(state.is_key_pressed(KeyCode::KeyA));
        assert!(state.is_key_down(KeyCode::KeyA));

        state.begin_frame();
        assert!(!state.is_key_pressed(KeyCode::KeyA));
        assert!(state.is_key_down(KeyCode::KeyA), "Key should remain down");

        state.begin_frame();
        state.apply(&key(KeyCode::KeyA, Action::Released));
        assert!(!state.is_key_down(KeyCode::KeyA));
        assert!(state.is_key_released(KeyCode::KeyA));
    }

    #[test]
    fn fast_tap_both_transitions_captured() {
        let mut state = InputState::new();

        state.apply(&key(KeyCode::Space, Action::Pressed));
        state.apply(&key(KeyCode::Space, Action::Released));

        assert!(state.is_key_pressed(KeyCode::Space), "Should register press");
        assert!(state.is_key_released(KeyCode::Space), "Should register release");
        assert!(!state.is_key_down(KeyCode::Space), "Should end up not down");
    }

    #[test]
    fn repeat_keeps_key_down_without_new_press() {
        let mut state = InputState::new();
        state.apply(&key(KeyCode::KeyW, Action::Pressed));
        state.begin_frame();
        state.apply(&key(KeyCode::KeyW, Action::Repeated));

        assert!(state.is_key_down(KeyCode::KeyW));
        assert!(!state.is_key_pressed(KeyCode::KeyW), "Repeat is not a new press");
    }

    #[test]
    fn spurious_release_ignored() {
        let mut state = InputState::new();
        state.apply(&key(KeyCode::KeyZ, Action::Released));
        assert!(!state.is_key_released(KeyCode::KeyZ));
    }

    //=====================================================================
    // Mouse Tests
    //=====================================================================

    #[test]
    fn button_press_updates_pointer() {
        let mut state = InputState::new();
        state.apply(&button(MouseButton::Left, Action::Pressed));

        assert!(state.is_button_pressed(MouseButton::Left));
        assert!(state.is_button_down(MouseButton::Left));
        assert_eq!(state.pointer(), Some((5.0, 6.0)));
    }

    #[test]
    fn button_release_clears_down() {
        let mut state = InputState::new();
        state.apply(&button(MouseButton::Right, Action::Pressed));
        state.begin_frame();
        state.apply(&button(MouseButton::Right, Action::Released));

        assert!(state.is_button_released(MouseButton::Right));
        assert!(!state.is_button_down(MouseButton::Right));
    }

    #[test]
    fn pointer_motion_tracks_last_position() {
        let mut state = InputState::new();
        for (x, y) in [(1.0, 2.0), (3.0, 4.0), (30.0, 40.0)] {
            state.apply(&Input {
                code: InputCode::Pointer,
                action: Action::Moved,
                modifiers: Modifiers::empty(),
                position: Some((x, y)),
            });
        }
        assert_eq!(state.pointer(), Some((30.0, 40.0)));
    }

    #[test]
    fn modifiers_follow_latest_input() {
        let mut state = InputState::new();
        let mut input = key(KeyCode::KeyS, Action::Pressed);
        input.modifiers = Modifiers::CTRL;
        state.apply(&input);
        assert_eq!(state.modifiers(), Modifiers::CTRL);

        state.apply(&key(KeyCode::KeyS, Action::Released));
        assert!(state.modifiers().is_empty());
    }
}
