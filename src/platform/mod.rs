//=========================================================================
// Platform Subsystem
//
// Concrete Display / Input backends, selected at build time.
//
// Backends:
// ```text
//  windowed  winit window; delivers system + window input   (desktop)
//  evdev     raw input_event records from a device or stream
//  headless  no window; injected events, scripted input     (all targets)
// ```
//
// Every backend translates native events into engine Messages and pushes
// them through an EventSender. None of them reach into the StateMachine.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod evdev;
pub mod headless;

#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
pub mod windowed;

//=== Public API ==========================================================

pub use evdev::EvdevInput;
pub use headless::{HeadlessDisplay, HeadlessRenderer, NullInput, ScriptedInput};

#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
pub use windowed::WindowedDisplay;
