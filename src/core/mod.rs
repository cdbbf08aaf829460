//=========================================================================
// Engine Core
//=========================================================================
//
// Platform-independent dispatch core.
//
// Architecture:
//   Backends ──push──> EventQueue ──drain──> StateMachine::on_message()
//                                                  │
//   Renderer <──submit(SceneData)── StateMachine::render()
//
// Components:
// - `message`: the closed Message taxonomy (Info / Input / System)
// - `event_queue`: ordered multi-producer / single-consumer hand-off
// - `state_machine`: the contract every game implements
// - `backend`: Display / Input / Renderer capability traits
// - `scene`: opaque per-frame scene snapshot
// - `input_state`: optional helper for tracking held keys and pointer
//
// Nothing in here knows about a concrete platform.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod backend;
pub mod event_queue;
pub mod input_state;
pub mod message;
pub mod scene;
pub mod state_machine;

//=== Public API ==========================================================

pub use backend::{Display, Input, Renderer};
pub use event_queue::{EventQueue, EventSender};
pub use input_state::InputState;
pub use message::{Message, MessageKind, Payload, SystemEvent};
pub use scene::SceneData;
pub use state_machine::StateMachine;
