//=========================================================================
// State Machine Contract
//=========================================================================
//
// The polymorphic boundary every game implements.
//
// Per frame the main loop calls, on its own thread only:
//   on_message()* → update(dt) → render(renderer) → is_terminal()?
//
// Dispatch order equals queue order. Games ignore message kinds they do
// not understand; that is required for forward compatibility, not an
// error.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use super::backend::Renderer;
use super::message::Message;
use crate::error::RenderError;

//=== StateMachine Trait ==================================================

/// Game logic driven by the engine's main loop.
///
/// Only `on_message` and `render` are required:
///
/// ```rust
/// # use cinder_engine::prelude::*;
/// struct Idle;
///
/// impl StateMachine for Idle {
///     fn on_message(&mut self, _message: Message) {}
///
///     fn render(&self, renderer: &mut dyn Renderer) -> Result<(), RenderError> {
///         renderer.submit(&SceneData::default())
///     }
/// }
/// ```
pub trait StateMachine {
    /// Handles one dispatched message.
    ///
    /// Must not block: it runs inside the frame budget.
    fn on_message(&mut self, message: Message);

    /// Advances time-based state after all of the frame's messages were
    /// dispatched.
    ///
    /// Default implementation does nothing.
    fn update(&mut self, _delta: Duration) {}

    /// Builds this frame's scene and submits it.
    ///
    /// Takes `&self`: presentation cannot change game state.
    fn render(&self, renderer: &mut dyn Renderer) -> Result<(), RenderError>;

    /// When `true`, the main loop finishes after the current frame.
    ///
    /// Default implementation never terminates.
    fn is_terminal(&self) -> bool {
        false
    }
}

impl<T: StateMachine + ?Sized> StateMachine for Box<T> {
    fn on_message(&mut self, message: Message) {
        (**self).on_message(message)
    }

    fn update(&mut self, delta: Duration) {
        (**self).update(delta)
    }

    fn render(&self, renderer: &mut dyn Renderer) -> Result<(), RenderError> {
        (**self).render(renderer)
    }

    fn is_terminal(&self) -> bool {
        (**self).is_terminal()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input_state::InputState;
    use crate::core::message::{
        Action, InfoValue, KeyCode, Modifiers, MouseButton, Payload, SystemEvent,
    };
    use crate::core::scene::SceneData;
    use crate::platform::headless::HeadlessRenderer;

    //--- Test Machine -----------------------------------------------------

    /// Tracks pressed keys and nothing else.
    #[derive(Default)]
    struct KeyTracker {
        keys: InputState,
        updates: u32,
    }

    impl StateMachine for KeyTracker {
        fn on_message(&mut self, message: Message) {
            if let Payload::Input(input) = message.payload() {
                self.keys.apply(input);
            }
        }

        fn update(&mut self, _delta: Duration) {
            self.updates += 1;
        }

        fn render(&self, renderer: &mut dyn Renderer) -> Result<(), RenderError> {
            renderer.submit(&SceneData::default())
        }
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn pressed_then_released_round_trip() {
        let mut machine = KeyTracker::default();

        machine.on_message(Message::key(KeyCode::KeyK, Action::Pressed, Modifiers::empty()));
        assert!(machine.keys.is_key_down(KeyCode::KeyK), "K should be in the pressed set");

        machine.on_message(Message::key(KeyCode::KeyK, Action::Released, Modifiers::empty()));
        assert!(!machine.keys.is_key_down(KeyCode::KeyK), "K should be removed on release");
    }

    #[test]
    fn unhandled_kinds_leave_state_unchanged() {
        let mut machine = KeyTracker::default();
        machine.on_message(Message::key(KeyCode::KeyA, Action::Pressed, Modifiers::empty()));
        let before = machine.keys.clone();

        machine.on_message(Message::info("unknown.key", InfoValue::Text("?".into())));
        machine.on_message(Message::system(SystemEvent::FocusLost));
        machine.on_message(Message::system(SystemEvent::Resized { width: 1, height: 1 }));

        assert_eq!(machine.keys, before);
        assert!(!machine.is_terminal());
    }

    #[test]
    fn boxed_machine_forwards_calls() {
        let mut machine: Box<dyn StateMachine> = Box::new(KeyTracker::default());
        let mut renderer = HeadlessRenderer::new();

        machine.on_message(Message::button(
            MouseButton::Left,
            Action::Pressed,
            Modifiers::empty(),
            (1.0, 1.0),
        ));
        machine.update(Duration::from_millis(16));

        renderer.begin_frame().unwrap();
        machine.render(&mut renderer).unwrap();
        renderer.end_frame().unwrap();

        assert_eq!(renderer.frames_presented(), 1);
        assert!(!machine.is_terminal());
    }
}
