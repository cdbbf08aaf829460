//=========================================================================
// Headless Backends
//=========================================================================
//
// Window-less Display, Input and Renderer implementations.
//
// Used by tests to drive the full main loop deterministically, and by
// tools that run a state machine without a screen.
//
//   HeadlessDisplay  → injected System events, counts presents
//   NullInput        → never produces input
//   ScriptedInput    → replays one scripted batch of messages per frame
//   HeadlessRenderer → validates frame protocol, records scenes
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use crate::config::WindowConfig;
use crate::core::backend::{Display, Input, Renderer};
use crate::core::event_queue::EventSender;
use crate::core::message::{Message, SystemEvent};
use crate::core::scene::{SceneData, TextureId};
use crate::error::{PlatformError, RenderError};
use crate::loaders::ImageData;

//=== HeadlessDisplay =====================================================

/// Display without a native window.
///
/// System events are injected by the owner and delivered on the next
/// `pump_events`, the same way a native window reports them.
#[derive(Debug)]
pub struct HeadlessDisplay {
    title: String,
    size: (u32, u32),
    open: bool,
    pending: VecDeque<SystemEvent>,
    presented: u64,
}

impl HeadlessDisplay {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            title: String::new(),
            size: (width, height),
            open: true,
            pending: VecDeque::new(),
            presented: 0,
        }
    }

    //--- Injection --------------------------------------------------------

    /// Queues a System event for the next pump.
    pub fn inject(&mut self, event: SystemEvent) {
        self.pending.push_back(event);
    }

    /// Simulates the user closing the window.
    pub fn request_close(&mut self) {
        self.inject(SystemEvent::CloseRequested);
    }

    //--- Accessors --------------------------------------------------------

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn frames_presented(&self) -> u64 {
        self.presented
    }
}

impl Display for HeadlessDisplay {
    fn create(config: &WindowConfig) -> Result<Self, PlatformError> {
        debug!(
            target: "platform",
            "Headless display created: {:?} {}x{}",
            config.title, config.width, config.height
        );
        let mut display = Self::new(config.width, config.height);
        display.title = config.title.clone();
        Ok(display)
    }

    fn pump_events(&mut self, events: &EventSender) -> Result<(), PlatformError> {
        if !self.open {
            self.pending.clear();
            return Ok(());
        }
        for event in self.pending.drain(..) {
            trace!(target: "platform", "Headless event: {:?}", event);
            events.push(Message::system(event));
        }
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), PlatformError> {
        if (width, height) != self.size {
            self.size = (width, height);
            self.inject(SystemEvent::Resized { width, height });
        }
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn present(&mut self) -> Result<(), PlatformError> {
        if self.open {
            self.presented += 1;
        }
        Ok(())
    }

    fn close(&mut self) {
        if self.open {
            debug!(target: "platform", "Headless display closed");
            self.open = false;
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

//=== NullInput ===========================================================

/// Input backend with no device attached.
///
/// Paired with displays that already deliver their window's input.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullInput;

impl Input for NullInput {
    fn pump_events(&mut self, _events: &EventSender) -> Result<(), PlatformError> {
        Ok(())
    }
}

//=== ScriptedInput =======================================================

/// Replays a fixed script, one batch of messages per pump.
///
/// Once the script runs out every further pump is empty.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    frames: VecDeque<Vec<Message>>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the batch pushed by the next unscripted pump.
    pub fn frame(mut self, messages: impl IntoIterator<Item = Message>) -> Self {
        self.push_frame(messages);
        self
    }

    /// Appends an empty batch.
    pub fn idle(self) -> Self {
        self.frame(Vec::new())
    }

    pub fn push_frame(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.frames.push_back(messages.into_iter().collect());
    }

    /// Batches not yet replayed.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl Input for ScriptedInput {
    fn pump_events(&mut self, events: &EventSender) -> Result<(), PlatformError> {
        if let Some(batch) = self.frames.pop_front() {
            trace!(target: "platform::input", "Replaying {} scripted messages", batch.len());
            for message in batch {
                events.push(message);
            }
        }
        Ok(())
    }
}

//=== HeadlessRenderer ====================================================

/// Renderer that draws nothing but enforces the frame protocol.
///
/// Keeps the scene of the last completed frame and the sizes of uploaded
/// textures, so tests can assert on what would have been drawn.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    in_frame: bool,
    frames: u64,
    current: Option<SceneData>,
    last_scene: Option<SceneData>,
    textures: Vec<(u32, u32)>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    /// Scene submitted during the last completed frame, if any.
    pub fn last_scene(&self) -> Option<&SceneData> {
        self.last_scene.as_ref()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn texture_size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.textures.get(id.0 as usize).copied()
    }
}

impl Renderer for HeadlessRenderer {
    fn begin_frame(&mut self) -> Result<(), RenderError> {
        if self.in_frame {
            return Err(RenderError::FrameInProgress);
        }
        self.in_frame = true;
        self.current = None;
        Ok(())
    }

    fn submit(&mut self, scene: &SceneData) -> Result<(), RenderError> {
        if !self.in_frame {
            return Err(RenderError::NoFrameInProgress("submit"));
        }
        // Later submissions within a frame draw over earlier ones.
        match &mut self.current {
            Some(current) => {
                current.clear_color = scene.clear_color;
                current.quads.extend(scene.quads.iter().cloned());
                current.labels.extend(scene.labels.iter().cloned());
            }
            None => self.current = Some(scene.clone()),
        }
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        if !self.in_frame {
            return Err(RenderError::NoFrameInProgress("end_frame"));
        }
        self.in_frame = false;
        self.frames += 1;
        if let Some(scene) = self.current.take() {
            self.last_scene = Some(scene);
        }
        Ok(())
    }

    fn load_texture(&mut self, image: &ImageData) -> Result<TextureId, RenderError> {
        let expected = image.stride() * image.height as usize;
        if image.width == 0 || image.height == 0 || image.pixels.len() != expected {
            return Err(RenderError::Texture(format!(
                "{}x{} image with {} bytes of pixels",
                image.width,
                image.height,
                image.pixels.len()
            )));
        }
        let id = TextureId(self.textures.len() as u32);
        self.textures.push((image.width, image.height));
        Ok(id)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
