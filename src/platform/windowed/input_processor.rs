//=========================================================================
// Input Processor
//=========================================================================
//
// Converts winit window input into engine Input messages.
//
// Architecture:
//   WindowEvent → InputProcessor → Message (Input kind) → pending batch
//
// Stateful tracking: modifier state is cached from ModifiersChanged and
// the pointer position from CursorMoved; both are attached to every
// later key and button message. Unmapped keys (F13-F24, numpad, media
// keys) are filtered.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, MouseButton as WinitMouseButton},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::message::{Action, KeyCode, Message, Modifiers, MouseButton};

//=== InputProcessor ======================================================

/// Converts winit input to engine messages with sticky modifier and
/// pointer state.
#[derive(Debug, Default)]
pub(crate) struct InputProcessor {
    current_modifiers: Modifiers,
    pointer: (f32, f32),
}

impl InputProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self::default()
    }

    //--- State Management -------------------------------------------------

    /// Updates cached modifier state (applied to subsequent messages).
    pub(crate) fn update_modifiers(&mut self, modifiers_state: ModifiersState) {
        self.current_modifiers = Modifiers::from(modifiers_state);
    }

    pub(crate) fn current_modifiers(&self) -> Modifiers {
        self.current_modifiers
    }

    pub(crate) fn pointer(&self) -> (f32, f32) {
        self.pointer
    }

    //--- Event Processing -------------------------------------------------

    /// Converts a physical key transition (filters unmapped keys).
    pub(crate) fn process_key(
        &self,
        physical_key: PhysicalKey,
        state: ElementState,
        repeat: bool,
    ) -> Option<Message> {
        let key = match physical_key {
            PhysicalKey::Code(code) => KeyCode::from(code),
            PhysicalKey::Unidentified(_) => return None,
        };

        if key == KeyCode::Unidentified {
            return None;
        }

        let action = match (state, repeat) {
            (ElementState::Pressed, false) => Action::Pressed,
            (ElementState::Pressed, true) => Action::Repeated,
            (ElementState::Released, _) => Action::Released,
        };

        Some(Message::key(key, action, self.current_modifiers))
    }

    /// Converts a mouse button transition at the last pointer position.
    pub(crate) fn process_mouse_button(
        &self,
        button: WinitMouseButton,
        state: ElementState,
    ) -> Message {
        let action = match state {
            ElementState::Pressed => Action::Pressed,
            ElementState::Released => Action::Released,
        };

        Message::button(
            MouseButton::from(button),
            action,
            self.current_modifiers,
            self.pointer,
        )
    }

    /// Records the pointer position and converts it to a motion message.
    pub(crate) fn process_mouse_move(&mut self, x: f32, y: f32) -> Message {
        self.pointer = (x, y);
        Message::pointer_moved(x, y, self.current_modifiers)
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Winit normalizes platform keys (macOS Option → Alt, Cmd → Super).
impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        let mut modifiers = Modifiers::empty();
        modifiers.set(Modifiers::SHIFT, state.shift_key());
        modifiers.set(Modifiers::CTRL, state.control_key());
        modifiers.set(Modifiers::ALT, state.alt_key());
        modifiers.set(Modifiers::SUPER, state.super_key());
        modifiers
    }
}

/// Converts winit physical key codes to engine key codes.
///
/// Unmapped keys return `KeyCode::Unidentified`.
impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode::*;
        match code {
            //--- Digits -------------------------------------------------------

            Digit0 => KeyCode::Digit0,
            Digit1 => KeyCode::Digit1,
            Digit2 => KeyCode::Digit2,
            Digit3 => KeyCode::Digit3,
            Digit4 => KeyCode::Digit4,
            Digit5 => KeyCode::Digit5,
            Digit6 => KeyCode::Digit6,
            Digit7 => KeyCode::Digit7,
            Digit8 => KeyCode::Digit8,
            Digit9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------

            KeyA => KeyCode::KeyA,
            KeyB => KeyCode::KeyB,
            KeyC => KeyCode::KeyC,
            KeyD => KeyCode::KeyD,
            KeyE => KeyCode::KeyE,
            KeyF => KeyCode::KeyF,
            KeyG => KeyCode::KeyG,
            KeyH => KeyCode::KeyH,
            KeyI => KeyCode::KeyI,
            KeyJ => KeyCode::KeyJ,
            KeyK => KeyCode::KeyK,
            KeyL => KeyCode::KeyL,
            KeyM => KeyCode::KeyM,
            KeyN => KeyCode::KeyN,
            KeyO => KeyCode::KeyO,
            KeyP => KeyCode::KeyP,
            KeyQ => KeyCode::KeyQ,
            KeyR => KeyCode::KeyR,
            KeyS => KeyCode::KeyS,
            KeyT => KeyCode::KeyT,
            KeyU => KeyCode::KeyU,
            KeyV => KeyCode::KeyV,
            KeyW => KeyCode::KeyW,
            KeyX => KeyCode::KeyX,
            KeyY => KeyCode::KeyY,
            KeyZ => KeyCode::KeyZ,

            //--- Function -----------------------------------------------------

            F1 => KeyCode::F1,
            F2 => KeyCode::F2,
            F3 => KeyCode::F3,
            F4 => KeyCode::F4,
            F5 => KeyCode::F5,
            F6 => KeyCode::F6,
            F7 => KeyCode::F7,
            F8 => KeyCode::F8,
            F9 => KeyCode::F9,
            F10 => KeyCode::F10,
            F11 => KeyCode::F11,
            F12 => KeyCode::F12,

            //--- Arrows -------------------------------------------------------

            ArrowUp => KeyCode::ArrowUp,
            ArrowDown => KeyCode::ArrowDown,
            ArrowLeft => KeyCode::ArrowLeft,
            ArrowRight => KeyCode::ArrowRight,

            //--- Modifiers ----------------------------------------------------

            ShiftLeft => KeyCode::ShiftLeft,
            ShiftRight => KeyCode::ShiftRight,
            ControlLeft => KeyCode::ControlLeft,
            ControlRight => KeyCode::ControlRight,
            AltLeft => KeyCode::AltLeft,
            AltRight => KeyCode::AltRight,
            SuperLeft => KeyCode::SuperLeft,
            SuperRight => KeyCode::SuperRight,

            //--- Special ------------------------------------------------------

            Space => KeyCode::Space,
            Enter => KeyCode::Enter,
            Escape => KeyCode::Escape,
            Tab => KeyCode::Tab,
            Backspace => KeyCode::Backspace,
            Delete => KeyCode::Delete,

            _ => KeyCode::Unidentified,
        }
    }
}

/// Left/Right/Middle map directly; Back/Forward/Other → Other.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::{Input, InputCode};
    use winit::keyboard::NativeKeyCode;

    fn make_modifiers(shift: bool, ctrl: bool, alt: bool) -> ModifiersState {
        let mut state = ModifiersState::empty();
        if shift { state.insert(ModifiersState::SHIFT); }
        if ctrl { state.insert(ModifiersState::CONTROL); }
        if alt { state.insert(ModifiersState::ALT); }
        state
    }

    fn input_of(message: &Message) -> Input {
        *message.as_input().expect("Expected an Input message")
    }

    #[test]
    fn starts_with_no_modifiers() {
        let processor = InputProcessor::new();
        assert!(processor.current_modifiers().is_empty());
    }

    #[test]
    fn update_modifiers_works() {
        let mut processor = InputProcessor::new();
        processor.update_modifiers(make_modifiers(true, false, true));

        assert_eq!(processor.current_modifiers(), Modifiers::SHIFT | Modifiers::ALT);
    }

    #[test]
    fn key_press_carries_modifiers() {
        let mut processor = InputProcessor::new();
        processor.update_modifiers(make_modifiers(false, true, false));

        let message = processor
            .process_key(PhysicalKey::Code(WinitKeyCode::KeyS), ElementState::Pressed, false)
            .unwrap();
        let input = input_of(&message);

        assert_eq!(input.code, InputCode::Key(KeyCode::KeyS));
        assert_eq!(input.action, Action::Pressed);
        assert_eq!(input.modifiers, Modifiers::CTRL);
    }

    #[test]
    fn held_key_becomes_repeated() {
        let processor = InputProcessor::new();
        let message = processor
            .process_key(PhysicalKey::Code(WinitKeyCode::KeyA), ElementState::Pressed, true)
            .unwrap();
        assert_eq!(input_of(&message).action, Action::Repeated);
    }

    #[test]
    fn key_release_maps_to_released() {
        let processor = InputProcessor::new();
        let message = processor
            .process_key(PhysicalKey::Code(WinitKeyCode::Escape), ElementState::Released, false)
            .unwrap();
        let input = input_of(&message);

        assert_eq!(input.code, InputCode::Key(KeyCode::Escape));
        assert_eq!(input.action, Action::Released);
    }

    #[test]
    fn unmapped_keys_filtered() {
        let processor = InputProcessor::new();
        assert!(processor
            .process_key(PhysicalKey::Code(WinitKeyCode::F13), ElementState::Pressed, false)
            .is_none());
        assert!(processor
            .process_key(
                PhysicalKey::Unidentified(NativeKeyCode::Unidentified),
                ElementState::Pressed,
                false
            )
            .is_none());
    }

    #[test]
    fn mouse_button_uses_last_pointer_position() {
        let mut processor = InputProcessor::new();
        processor.update_modifiers(make_modifiers(false, false, true));
        processor.process_mouse_move(12.0, 34.0);

        let message = processor.process_mouse_button(WinitMouseButton::Left, ElementState::Pressed);
        let input = input_of(&message);

        assert_eq!(input.code, InputCode::Button(MouseButton::Left));
        assert_eq!(input.position, Some((12.0, 34.0)));
        assert_eq!(input.modifiers, Modifiers::ALT);
    }

    #[test]
    fn mouse_move_correct() {
        let mut processor = InputProcessor::new();
        let input = input_of(&processor.process_mouse_move(123.5, 456.7));

        assert_eq!(input.code, InputCode::Pointer);
        assert_eq!(input.action, Action::Moved);
        assert_eq!(input.position, Some((123.5, 456.7)));
        assert_eq!(processor.pointer(), (123.5, 456.7));
    }

    #[test]
    fn modifiers_persist_across_events() {
        let mut processor = InputProcessor::new();
        processor.update_modifiers(make_modifiers(true, false, false));

        let button = processor.process_mouse_button(WinitMouseButton::Left, ElementState::Pressed);
        let key = processor
            .process_key(PhysicalKey::Code(WinitKeyCode::Space), ElementState::Pressed, false)
            .unwrap();

        assert!(input_of(&button).modifiers.contains(Modifiers::SHIFT));
        assert!(input_of(&key).modifiers.contains(Modifiers::SHIFT));
    }

    #[test]
    fn super_modifier_mapped() {
        assert_eq!(Modifiers::from(ModifiersState::SUPER), Modifiers::SUPER);
    }

    #[test]
    fn keycode_conversion() {
        assert_eq!(KeyCode::from(WinitKeyCode::KeyA), KeyCode::KeyA);
        assert_eq!(KeyCode::from(WinitKeyCode::KeyZ), KeyCode::KeyZ);
        assert_eq!(KeyCode::from(WinitKeyCode::F12), KeyCode::F12);
        assert_eq!(KeyCode::from(WinitKeyCode::ShiftRight), KeyCode::ShiftRight);
        assert_eq!(KeyCode::from(WinitKeyCode::Enter), KeyCode::Enter);
    }

    #[test]
    fn mouse_button_conversion() {
        assert_eq!(MouseButton::from(WinitMouseButton::Left), MouseButton::Left);
        assert_eq!(MouseButton::from(WinitMouseButton::Right), MouseButton::Right);
        assert_eq!(MouseButton::from(WinitMouseButton::Middle), MouseButton::Middle);
        assert_eq!(MouseButton::from(WinitMouseButton::Back), MouseButton::Other);
    }
}
