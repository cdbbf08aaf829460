//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use cinder_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::config::{EngineConfig, WindowConfig};
pub use crate::engine::{Engine, EngineBuilder, ExitReason, FrameStatus, RunSummary};
pub use crate::error::{EngineError, EngineResult, PlatformError, RenderError};

// Messages
pub use crate::core::message::{
    Action, Info, InfoValue, Input, InputCode, KeyCode, Message, MessageKind, Modifiers,
    MouseButton, Payload, SystemEvent,
};

// Contracts
pub use crate::core::backend::{Display, Input as InputBackend, Renderer};
pub use crate::core::event_queue::{EventQueue, EventSender};
pub use crate::core::input_state::InputState;
pub use crate::core::scene::{Color, Label, Quad, SceneData, TextureId};
pub use crate::core::state_machine::StateMachine;
