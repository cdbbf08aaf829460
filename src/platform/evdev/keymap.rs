//=========================================================================
// Evdev Key Map
//=========================================================================
//
// Linux input-event-codes → engine key codes.
//
// Values follow <linux/input-event-codes.h>; only the codes the engine
// has a KeyCode for are listed.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::message::{KeyCode, MouseButton};

//=== Event Types =========================================================

pub(crate) const EV_SYN: u16 = 0x00;
pub(crate) const EV_KEY: u16 = 0x01;
pub(crate) const EV_REL: u16 = 0x02;

pub(crate) const REL_X: u16 = 0x00;
pub(crate) const REL_Y: u16 = 0x01;

//=== Button Codes ========================================================

const BTN_LEFT: u16 = 0x110;
const BTN_RIGHT: u16 = 0x111;
const BTN_MIDDLE: u16 = 0x112;
const BTN_TASK: u16 = 0x117;

//=== Translation =========================================================

/// Maps an `EV_KEY` code in the mouse button range.
pub(crate) fn mouse_button(code: u16) -> Option<MouseButton> {
    match code {
        BTN_LEFT => Some(MouseButton::Left),
        BTN_RIGHT => Some(MouseButton::Right),
        BTN_MIDDLE => Some(MouseButton::Middle),
        c if (BTN_MIDDLE + 1..=BTN_TASK).contains(&c) => Some(MouseButton::Other),
        _ => None,
    }
}

/// Maps an `EV_KEY` keyboard code; unknown codes are `Unidentified`.
pub(crate) fn key_code(code: u16) -> KeyCode {
    use KeyCode::*;
    match code {
        //--- Digits -----------------------------------------------------------

        2 => Digit1,
        3 => Digit2,
        4 => Digit3,
        5 => Digit4,
        6 => Digit5,
        7 => Digit6,
        8 => Digit7,
        9 => Digit8,
        10 => Digit9,
        11 => Digit0,

        //--- Letters (rows top to bottom) -------------------------------------

        16 => KeyQ,
        17 => KeyW,
        18 => KeyE,
        19 => KeyR,
        20 => KeyT,
        21 => KeyY,
        22 => KeyU,
        23 => KeyI,
        24 => KeyO,
        25 => KeyP,
        30 => KeyA,
        31 => KeyS,
        32 => KeyD,
        33 => KeyF,
        34 => KeyG,
        35 => KeyH,
        36 => KeyJ,
        37 => KeyK,
        38 => KeyL,
        44 => KeyZ,
        45 => KeyX,
        46 => KeyC,
        47 => KeyV,
        48 => KeyB,
        49 => KeyN,
        50 => KeyM,

        //--- Function ---------------------------------------------------------

        59 => F1,
        60 => F2,
        61 => F3,
        62 => F4,
        63 => F5,
        64 => F6,
        65 => F7,
        66 => F8,
        67 => F9,
        68 => F10,
        87 => F11,
        88 => F12,

        //--- Arrows -----------------------------------------------------------

        103 => ArrowUp,
        105 => ArrowLeft,
        106 => ArrowRight,
        108 => ArrowDown,

        //--- Modifiers --------------------------------------------------------

        42 => ShiftLeft,
        54 => ShiftRight,
        29 => ControlLeft,
        97 => ControlRight,
        56 => AltLeft,
        100 => AltRight,
        125 => SuperLeft,
        126 => SuperRight,

        //--- Special ----------------------------------------------------------

        1 => Escape,
        14 => Backspace,
        15 => Tab,
        28 | 96 => Enter, // main and keypad
        57 => Space,
        111 => Delete,

        _ => Unidentified,
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_follow_physical_rows() {
        assert_eq!(key_code(16), KeyCode::KeyQ);
        assert_eq!(key_code(30), KeyCode::KeyA);
        assert_eq!(key_code(44), KeyCode::KeyZ);
        assert_eq!(key_code(50), KeyCode::KeyM);
    }

    #[test]
    fn digit_row_ends_with_zero() {
        assert_eq!(key_code(2), KeyCode::Digit1);
        assert_eq!(key_code(11), KeyCode::Digit0);
    }

    #[test]
    fn special_keys() {
        assert_eq!(key_code(1), KeyCode::Escape);
        assert_eq!(key_code(28), KeyCode::Enter);
        assert_eq!(key_code(96), KeyCode::Enter);
        assert_eq!(key_code(57), KeyCode::Space);
        assert_eq!(key_code(88), KeyCode::F12);
    }

    #[test]
    fn modifiers_map_to_modifier_keys() {
        for code in [42, 54, 29, 97, 56, 100, 125, 126] {
            assert!(key_code(code).modifier().is_some(), "code {} should be a modifier", code);
        }
    }

    #[test]
    fn unknown_codes_unidentified() {
        assert_eq!(key_code(0), KeyCode::Unidentified);
        assert_eq!(key_code(183), KeyCode::Unidentified); // KEY_F13
    }

    #[test]
    fn button_range() {
        assert_eq!(mouse_button(0x110), Some(MouseButton::Left));
        assert_eq!(mouse_button(0x111), Some(MouseButton::Right));
        assert_eq!(mouse_button(0x112), Some(MouseButton::Middle));
        assert_eq!(mouse_button(0x113), Some(MouseButton::Other));
        assert_eq!(mouse_button(30), None);
    }
}
