//=========================================================================
// Evdev Input
//=========================================================================
//
// Input backend reading Linux evdev `input_event` records, for devices
// that do not deliver input through a window (consoles, kiosks, raw
// /dev/input nodes).
//
// Architecture:
// ```text
//  Capture Thread:                  Main Thread:
//  ┌──────────────────────┐        ┌──────────────────────────────┐
//  │  read_exact(record)  │        │  EvdevInput::pump_events()   │
//  │   ↓                  │        │   ├─ try_recv (bounded)      │
//  │  RawEvent::parse     │        │   ├─ keymap → KeyCode        │
//  │   ↓                  │        │   ├─ modifier tracking       │
//  │  Sender<RawEvent> ───┼───────>│   └─ EventSender::push       │
//  └──────────────────────┘        └──────────────────────────────┘
// ```
//
// The capture thread only reads and forwards raw records; translation
// and modifier state live on the main thread. When the reader ends the
// channel disconnects and one `input.device_lost` Info message is
// pushed.
//
// Modifier flags on a message reflect the state after the event is
// applied: a Shift press carries SHIFT, its release does not.
//
//=========================================================================

//=== Submodules ==========================================================

mod keymap;

//=== External Dependencies ===============================================

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::backend::Input;
use crate::core::event_queue::EventSender;
use crate::core::message::{
    Action, InfoValue, KeyCode, Message, Modifiers, INFO_DEVICE_LOST,
};
use crate::error::PlatformError;
use keymap::{EV_KEY, EV_REL, EV_SYN, REL_X, REL_Y};

//=== Constants ===========================================================

/// `struct timeval` is two C longs, which follow the pointer width on Linux.
const TIMEVAL_SIZE: usize = 2 * std::mem::size_of::<usize>();

/// Size of `struct input_event`: 24 bytes on 64-bit targets, 16 on 32-bit.
const RECORD_SIZE: usize = TIMEVAL_SIZE + 8;

/// Records translated per pump; the rest wait for the next frame.
const MAX_EVENTS_PER_FRAME: usize = 100;

/// Records buffered between the capture thread and the main thread.
const CHANNEL_CAPACITY: usize = 256;

//=== RawEvent ============================================================

/// One `input_event` record, without its kernel timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RawEvent {
    kind: u16,
    code: u16,
    value: i32,
}

impl RawEvent {
    fn parse(record: &[u8; RECORD_SIZE]) -> Self {
        Self::parse_after(record, TIMEVAL_SIZE)
    }

    /// Layout: `timeval` (`timeval` bytes), `type` u16, `code` u16, `value` i32.
    ///
    /// `record` must hold at least `timeval + 8` bytes.
    fn parse_after(record: &[u8], timeval: usize) -> Self {
        let f = &record[timeval..timeval + 8];
        Self {
            kind: u16::from_ne_bytes([f[0], f[1]]),
            code: u16::from_ne_bytes([f[2], f[3]]),
            value: i32::from_ne_bytes([f[4], f[5], f[6], f[7]]),
        }
    }
}

//=== Capture Thread ======================================================

fn capture<R: Read>(mut reader: R, sender: Sender<RawEvent>, name: &str) {
    let mut record = [0u8; RECORD_SIZE];

    loop {
        match reader.read_exact(&mut record) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                info!(target: "platform::input", "Input device {} closed", name);
                return;
            }
            Err(e) => {
                warn!(target: "platform::input", "Input device {} read failed: {}", name, e);
                return;
            }
        }

        if sender.send(RawEvent::parse(&record)).is_err() {
            debug!(target: "platform::input", "Capture for {} stopped, receiver dropped", name);
            return;
        }
    }
}

//=== EvdevInput ==========================================================

/// Input backend fed by a stream of evdev records.
pub struct EvdevInput {
    name: String,
    receiver: Receiver<RawEvent>,
    connected: bool,

    //--- Translation State ------------------------------------------------
    held_modifiers: HashSet<KeyCode>,
    modifiers: Modifiers,
    pointer: (f32, f32),
    pointer_dirty: bool,
}

impl EvdevInput {
    //--- Construction -----------------------------------------------------

    /// Opens a device node such as `/dev/input/event3`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PlatformError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            PlatformError::DeviceUnavailable(format!("{}: {}", path.display(), e))
        })?;
        Self::from_reader(path.display().to_string(), file)
    }

    /// Starts capturing from any byte stream of `input_event` records.
    pub fn from_reader<R>(name: impl Into<String>, reader: R) -> Result<Self, PlatformError>
    where
        R: Read + Send + 'static,
    {
        let name = name.into();
        let (sender, receiver) = bounded(CHANNEL_CAPACITY);

        let thread_name = name.clone();
        thread::Builder::new()
            .name("evdev-capture".into())
            .spawn(move || capture(reader, sender, &thread_name))
            .map_err(|e| PlatformError::DeviceUnavailable(format!("{}: {}", name, e)))?;

        info!(target: "platform::input", "Capturing input from {}", name);

        Ok(Self {
            name,
            receiver,
            connected: true,
            held_modifiers: HashSet::new(),
            modifiers: Modifiers::empty(),
            pointer: (0.0, 0.0),
            pointer_dirty: false,
        })
    }

    //--- Accessors --------------------------------------------------------

    /// `false` once the device was reported lost.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    //--- Translation ------------------------------------------------------

    fn translate(&mut self, event: RawEvent) -> Option<Message> {
        match event.kind {
            EV_KEY => self.translate_key(event.code, event.value),
            EV_REL => {
                match event.code {
                    REL_X => self.pointer.0 = (self.pointer.0 + event.value as f32).max(0.0),
                    REL_Y => self.pointer.1 = (self.pointer.1 + event.value as f32).max(0.0),
                    _ => return None,
                }
                self.pointer_dirty = true;
                None
            }
            // Motion is reported once per device report.
            EV_SYN if self.pointer_dirty => {
                self.pointer_dirty = false;
                let (x, y) = self.pointer;
                Some(Message::pointer_moved(x, y, self.modifiers))
            }
            _ => None,
        }
    }

    fn translate_key(&mut self, code: u16, value: i32) -> Option<Message> {
        let action = match value {
            0 => Action::Released,
            1 => Action::Pressed,
            2 => Action::Repeated,
            _ => return None,
        };

        if let Some(button) = keymap::mouse_button(code) {
            return Some(Message::button(button, action, self.modifiers, self.pointer));
        }

        let key = keymap::key_code(code);
        if key == KeyCode::Unidentified {
            trace!(target: "platform::input", "Unmapped evdev key code {}", code);
            return None;
        }

        if key.modifier().is_some() {
            self.track_modifier(key, action);
        }

        Some(Message::key(key, action, self.modifiers))
    }

    /// Left and right keys are held separately; the flag clears only when
    /// neither is down.
    fn track_modifier(&mut self, key: KeyCode, action: Action) {
        match action {
            Action::Pressed | Action::Repeated => {
                self.held_modifiers.insert(key);
            }
            Action::Released => {
                self.held_modifiers.remove(&key);
            }
            Action::Moved => {}
        }

        self.modifiers = self
            .held_modifiers
            .iter()
            .filter_map(|held| held.modifier())
            .fold(Modifiers::empty(), |acc, flag| acc | flag);
    }
}

impl Input for EvdevInput {
    fn pump_events(&mut self, events: &EventSender) -> Result<(), PlatformError> {
        if !self.connected {
            return Ok(());
        }

        let mut drained = 0;
        while drained < MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(raw) => {
                    drained += 1;
                    if let Some(message) = self.translate(raw) {
                        events.push(message);
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!(target: "platform::input", "Input device {} lost", self.name);
                    self.connected = false;
                    events.push(Message::info(
                        INFO_DEVICE_LOST,
                        InfoValue::Text(self.name.clone()),
                    ));
                    break;
                }
            }
        }

        if drained >= MAX_EVENTS_PER_FRAME {
            warn!(target: "platform::input", "Evdev backlog: drained {} records this frame", drained);
        }

        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
