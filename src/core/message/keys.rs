//=========================================================================
// Logical Input Codes
//=========================================================================
//
// Platform-independent key, button and modifier vocabulary.
//
// Backends translate their native codes (winit key codes, evdev key
// numbers, ...) into these types before a Message is built. The core and
// every StateMachine only ever see the logical form.
//
//=========================================================================

//=== External Dependencies ===============================================

use bitflags::bitflags;

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// The `Other` variant covers side buttons, thumb buttons and anything
/// the platform reports beyond the three standard buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Any other button.
    Other,
}

//=== KeyCode =============================================================

/// Logical keyboard key identifier.
///
/// Represents the physical key location, not the character produced:
/// `KeyA` is the same key on QWERTY and AZERTY layouts.
///
/// New keys can be added without breaking existing state machines, which
/// match on the keys they care about and ignore the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Function Keys ----------------------------------------------------

    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Modifier Keys ----------------------------------------------------

    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    AltLeft,
    AltRight,
    SuperLeft,
    SuperRight,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// Fallback for keys the backend could not map.
    Unidentified,
}

impl KeyCode {
    /// Returns the modifier flag this key controls, if it is a modifier key.
    pub fn modifier(self) -> Option<Modifiers> {
        match self {
            Self::ShiftLeft | Self::ShiftRight => Some(Modifiers::SHIFT),
            Self::ControlLeft | Self::ControlRight => Some(Modifiers::CTRL),
            Self::AltLeft | Self::AltRight => Some(Modifiers::ALT),
            Self::SuperLeft | Self::SuperRight => Some(Modifiers::SUPER),
            _ => None,
        }
    }
}

//=== Modifiers ===========================================================

bitflags! {
    /// Modifier key state carried by every Input message.
    ///
    /// Left and right variants of a modifier are not distinguished.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Either Shift key.
        const SHIFT = 0b0001;
        /// Either Ctrl key.
        const CTRL = 0b0010;
        /// Either Alt key (Option on macOS).
        const ALT = 0b0100;
        /// Either Super key (Windows / Command).
        const SUPER = 0b1000;
    }
}

//=== Action ==============================================================

/// What happened to the input identified by an [`InputCode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Transitioned up → down.
    Pressed,

    /// Transitioned down → up.
    Released,

    /// Auto-repeat while held.
    Repeated,

    /// Pointer changed position (only used with [`InputCode::Pointer`]).
    Moved,
}

//=== InputCode ===========================================================

/// Logical source of an Input message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputCode {
    /// A keyboard key.
    Key(KeyCode),

    /// A mouse button.
    Button(MouseButton),

    /// The pointer itself (motion).
    Pointer,
}

//=========================================================================
// Unit Tests
//=========================================================================
