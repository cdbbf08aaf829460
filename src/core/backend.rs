//=========================================================================
// Backend Interfaces
//=========================================================================
//
// Capability sets implemented once per platform. The engine core calls
// into these; backends never call into the core except by pushing
// messages through an EventSender.
//
// Backends are selected at build time (target cfg) and held by the
// engine as generic parameters, never downcast.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::event_queue::EventSender;
use super::scene::{SceneData, TextureId};
use crate::config::WindowConfig;
use crate::error::{PlatformError, RenderError};
use crate::loaders::ImageData;

//=== Display =============================================================

/// Window (or screen) owned by a platform backend.
///
/// A display translates its native system events (resize, focus, close)
/// into System messages. Windowed displays also translate the keyboard
/// and pointer input the OS delivers to their window, since that input
/// arrives on the same native event stream.
pub trait Display {
    /// Creates the display from configuration.
    fn create(config: &WindowConfig) -> Result<Self, PlatformError>
    where
        Self: Sized;

    /// Processes pending native events, pushing translated messages.
    ///
    /// An external close (window X button, OS shutdown) must produce a
    /// System close-request message. Must not block.
    fn pump_events(&mut self, events: &EventSender) -> Result<(), PlatformError>;

    /// Requests a new drawable size in pixels.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), PlatformError>;

    /// Current drawable size in pixels.
    fn size(&self) -> (u32, u32);

    /// Shows the frame the renderer just finished.
    fn present(&mut self) -> Result<(), PlatformError>;

    /// Destroys the native window. Idempotent.
    fn close(&mut self);

    fn is_open(&self) -> bool;
}

//=== Input ===============================================================

/// Input device backend (keyboard, mouse, evdev node, ...).
///
/// Normalizes native codes to logical [`crate::core::message::KeyCode`]s
/// and pushes Input messages. Owns no game state.
pub trait Input {
    /// Processes pending native input, pushing translated messages.
    /// Must not block.
    fn pump_events(&mut self, events: &EventSender) -> Result<(), PlatformError>;
}

//=== Renderer ============================================================

/// Graphics backend consuming [`SceneData`].
///
/// Per frame: `begin_frame` → `submit`* → `end_frame`. Never reads the
/// event queue or the state machine.
pub trait Renderer {
    fn begin_frame(&mut self) -> Result<(), RenderError>;

    /// Draws one scene snapshot into the current frame.
    fn submit(&mut self, scene: &SceneData) -> Result<(), RenderError>;

    /// Finishes and presents the current frame.
    fn end_frame(&mut self) -> Result<(), RenderError>;

    /// Uploads a decoded image, returning a handle usable in [`SceneData`].
    fn load_texture(&mut self, image: &ImageData) -> Result<TextureId, RenderError>;
}
