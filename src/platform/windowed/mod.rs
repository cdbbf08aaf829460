//=========================================================================
// Windowed Display
//
// Desktop Display backend over winit, driven by pumping instead of
// handing control to the event loop.
//
// Architecture:
// ```text
//  Main Thread (engine loop):
//  ┌─────────────────────────────────────────────┐
//  │  WindowedDisplay::pump_events()             │
//  │   ↓                                         │
//  │  EventLoop::pump_app_events(timeout = 0)    │
//  │   ↓                                         │
//  │  WindowHandler (ApplicationHandler)         │
//  │   ├─ System events → Message::system        │
//  │   └─ Input events  → InputProcessor         │
//  │   ↓                                         │
//  │  pending: Vec<Message> (native order)       │
//  │   ↓ (flush)                                 │
//  │  EventSender → EventQueue                   │
//  └─────────────────────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **Pumped, not run**: `run_app` never returns, so the engine keeps
//   ownership of the frame loop and calls `pump_app_events` once per
//   frame with a zero timeout.
// - **One stream**: the OS delivers keyboard and mouse input to the
//   window, so system and input messages are translated together and
//   keep their native order. Pair this display with `NullInput`.
// - **Close is a request**: CloseRequested is forwarded as a message;
//   the window is only destroyed by `close()`.
// - **Main thread requirement**: winit mandates the main thread on
//   macOS, so create and pump this display where `main` runs.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_processor;

//=== External Crates =====================================================

use std::time::Duration;

use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowId},
};

//=== Internal Imports ====================================================

use crate::config::WindowConfig;
use crate::core::backend::Display;
use crate::core::event_queue::EventSender;
use crate::core::message::{Message, SystemEvent};
use crate::error::PlatformError;
use input_processor::InputProcessor;

//=== Constants ===========================================================

/// Pumps allowed for the platform to deliver `resumed` at startup.
const STARTUP_PUMPS: usize = 100;

/// Wait per startup pump.
const STARTUP_PUMP_TIMEOUT: Duration = Duration::from_millis(10);

//=== WindowHandler =======================================================

/// Receives winit callbacks during a pump and buffers translated
/// messages until the display flushes them.
struct WindowHandler {
    config: WindowConfig,

    /// OS window handle (None until `resumed()` or after `close()`).
    window: Option<Window>,

    /// Last size reported by the OS.
    size: (u32, u32),

    input_processor: InputProcessor,

    /// Messages translated during the current pump, in native order.
    pending: Vec<Message>,

    /// Set when `resumed()` failed to create the window.
    creation_error: Option<String>,
}

impl WindowHandler {
    fn new(config: WindowConfig) -> Self {
        Self {
            size: (config.width, config.height),
            config,
            window: None,
            input_processor: InputProcessor::new(),
            pending: Vec::with_capacity(64),
            creation_error: None,
        }
    }

    /// Pushes buffered messages to the queue, preserving their order.
    fn flush(&mut self, events: &EventSender) {
        if self.pending.is_empty() {
            return;
        }
        trace!(target: "platform::input", "Flushing {} window messages", self.pending.len());
        for message in self.pending.drain(..) {
            events.push(message);
        }
    }
}

impl ApplicationHandler for WindowHandler {
    /// Called when the app becomes active (startup, or resume on mobile).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (resume)");
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height))
            .with_resizable(self.config.resizable);

        match event_loop.create_window(attributes) {
            Ok(window) => {
                let size = window.inner_size();
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    size.width,
                    size.height,
                    window.scale_factor()
                );
                self.size = (size.width, size.height);
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.creation_error = Some(e.to_string());
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            //--- System -------------------------------------------------------

            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.pending.push(Message::system(SystemEvent::CloseRequested));
            }

            WindowEvent::Resized(size) => {
                debug!(target: "platform", "Window resized to {}x{}", size.width, size.height);
                self.size = (size.width, size.height);
                self.pending.push(Message::system(SystemEvent::Resized {
                    width: size.width,
                    height: size.height,
                }));
            }

            WindowEvent::Focused(focused) => {
                let event = if focused {
                    SystemEvent::FocusGained
                } else {
                    SystemEvent::FocusLost
                };
                self.pending.push(Message::system(event));
            }

            //--- Input --------------------------------------------------------

            WindowEvent::ModifiersChanged(modifiers) => {
                trace!(target: "platform::input", "Modifiers changed: {:?}", modifiers);
                self.input_processor.update_modifiers(modifiers.state());
            }

            WindowEvent::KeyboardInput { event, .. } => {
                match self.input_processor.process_key(event.physical_key, event.state, event.repeat) {
                    Some(message) => self.pending.push(message),
                    None => trace!(target: "platform::input", "Unmapped key ignored"),
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let message = self
                    .input_processor
                    .process_mouse_move(position.x as f32, position.y as f32);
                self.pending.push(message);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let message = self.input_processor.process_mouse_button(button, state);
                self.pending.push(message);
            }

            _ => {
                // Ignore: redraws, scale changes, IME, touch
            }
        }
    }
}

//=== WindowedDisplay =====================================================

/// Native desktop window.
///
/// # Lifecycle
///
/// 1. **Creation**: `Display::create` builds the event loop and pumps
///    until the window exists
/// 2. **Frames**: `pump_events` translates pending OS events
/// 3. **Shutdown**: `close()` destroys the window; later pumps are no-ops
///
/// This type is NOT Send - it must stay on the thread that created it.
pub struct WindowedDisplay {
    event_loop: EventLoop<()>,
    handler: WindowHandler,
    open: bool,
}

impl Display for WindowedDisplay {
    fn create(config: &WindowConfig) -> Result<Self, PlatformError> {
        debug!(target: "platform", "Creating winit event loop");

        let mut event_loop =
            EventLoop::new().map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;
        let mut handler = WindowHandler::new(config.clone());

        for _ in 0..STARTUP_PUMPS {
            let status = event_loop.pump_app_events(Some(STARTUP_PUMP_TIMEOUT), &mut handler);

            if let Some(reason) = handler.creation_error.take() {
                return Err(PlatformError::WindowCreation(reason));
            }
            if let PumpStatus::Exit(code) = status {
                return Err(PlatformError::EventLoopExecution(format!(
                    "event loop exited during startup with code {}",
                    code
                )));
            }
            if handler.window.is_some() {
                return Ok(Self {
                    event_loop,
                    handler,
                    open: true,
                });
            }
        }

        Err(PlatformError::WindowCreation(
            "platform never resumed the application".into(),
        ))
    }

    fn pump_events(&mut self, events: &EventSender) -> Result<(), PlatformError> {
        if !self.open {
            return Ok(());
        }

        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.handler);
        self.handler.flush(events);

        if let PumpStatus::Exit(code) = status {
            warn!(target: "platform", "Event loop exited (code {}), requesting close", code);
            events.push(Message::system(SystemEvent::CloseRequested));
            self.close();
        }
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), PlatformError> {
        let Some(window) = &self.handler.window else {
            return Ok(());
        };
        // Some platforms apply the size immediately, others report it
        // later through a Resized event.
        if let Some(size) = window.request_inner_size(PhysicalSize::new(width, height)) {
            self.handler.size = (size.width, size.height);
        }
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        self.handler.size
    }

    fn present(&mut self) -> Result<(), PlatformError> {
        if let Some(window) = &self.handler.window {
            window.pre_present_notify();
            window.request_redraw();
        }
        Ok(())
    }

    fn close(&mut self) {
        if !self.open {
            return;
        }
        info!(target: "platform", "Closing window");
        self.handler.window = None;
        self.handler.pending.clear();
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
