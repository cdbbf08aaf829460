//=========================================================================
// Message Taxonomy
//=========================================================================
//
// The atomic unit of communication between producers (platform backends,
// engine timers) and the single consumer (the state machine).
//
// Architecture:
//   Backend → Message::{info,input,system}() → EventSender::push()
//                       or MessageBuilder::build()?
//
// Messages are immutable once built. The kind tag is derived from the
// payload variant, so a message without a kind cannot exist: the only
// fallible path (the builder) rejects it before it can reach the queue.
//
//=========================================================================

//=== Module Declarations =================================================

mod keys;

//=== Public API ==========================================================

pub use keys::{Action, InputCode, KeyCode, Modifiers, MouseButton};

//=== External Dependencies ===============================================

use std::borrow::Cow;
use std::fmt;
use std::sync::OnceLock;
use std::time::Instant;

use thiserror::Error;

//=== Well-Known Info Keys ================================================

/// Pushed once by the engine when the main loop starts.
pub const INFO_INIT: &str = "engine.init";

/// Pushed periodically by the engine with the measured frame rate.
pub const INFO_FRAME_RATE: &str = "engine.frame_rate";

/// Pushed by an input backend when its capture source has gone away.
pub const INFO_DEVICE_LOST: &str = "input.device_lost";

//=== Timestamp ===========================================================

/// Monotonic creation time in microseconds since the process clock epoch.
///
/// The epoch is fixed the first time any timestamp is taken, so values are
/// comparable across producer threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Current monotonic time.
    pub fn now() -> Self {
        static EPOCH: OnceLock<Instant> = OnceLock::new();
        let epoch = *EPOCH.get_or_init(Instant::now);
        Self(epoch.elapsed().as_micros() as u64)
    }

    /// Microseconds since the clock epoch.
    pub fn as_micros(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}us", self.0)
    }
}

//=== MessageKind =========================================================

/// Top-level message category.
///
/// Marked non-exhaustive: state machines must keep a wildcard arm so that
/// kinds added later are ignored rather than breaking the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum MessageKind {
    Info,
    Input,
    System,
}

//=== Payloads ============================================================

/// Value attached to an [`Info`] message.
#[derive(Debug, Clone, PartialEq)]
pub enum InfoValue {
    None,
    Int(i64),
    Float(f64),
    Text(String),
}

/// Diagnostic or metadata event. State machines may ignore these.
#[derive(Debug, Clone, PartialEq)]
pub struct Info {
    pub key: Cow<'static, str>,
    pub value: InfoValue,
}

impl Info {
    pub fn new(key: impl Into<Cow<'static, str>>, value: InfoValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Returns `true` if this info carries the given key.
    pub fn is(&self, key: &str) -> bool {
        self.key == key
    }
}

/// Normalized key / button / pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Input {
    pub code: InputCode,
    pub action: Action,
    pub modifiers: Modifiers,

    /// Pointer position in window pixels (top-left origin), when known.
    pub position: Option<(f32, f32)>,
}

/// Lifecycle and window events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemEvent {
    Resized { width: u32, height: u32 },
    FocusGained,
    FocusLost,

    /// The user or OS asked the window to close.
    CloseRequested,

    /// The application must terminate.
    Quit,
}

impl SystemEvent {
    /// Close-request and quit terminate the main loop.
    pub fn is_quit_signal(self) -> bool {
        matches!(self, Self::CloseRequested | Self::Quit)
    }
}

/// Variant data of a [`Message`]; the variant determines the kind.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Payload {
    Info(Info),
    Input(Input),
    System(SystemEvent),
}

impl Payload {
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Info(_) => MessageKind::Info,
            Self::Input(_) => MessageKind::Input,
            Self::System(_) => MessageKind::System,
        }
    }
}

//=== Message =============================================================

/// Immutable, timestamped, kind-tagged event.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    timestamp: Timestamp,
    payload: Payload,
}

impl Message {
    //--- Construction -----------------------------------------------------

    /// Starts a builder. Use when the payload is decided at runtime.
    pub fn builder() -> MessageBuilder {
        MessageBuilder::default()
    }

    pub fn info(key: impl Into<Cow<'static, str>>, value: InfoValue) -> Self {
        Self::now(Payload::Info(Info::new(key, value)))
    }

    pub fn input(input: Input) -> Self {
        Self::now(Payload::Input(input))
    }

    pub fn system(event: SystemEvent) -> Self {
        Self::now(Payload::System(event))
    }

    /// Keyboard event without pointer data.
    pub fn key(key: KeyCode, action: Action, modifiers: Modifiers) -> Self {
        Self::input(Input {
            code: InputCode::Key(key),
            action,
            modifiers,
            position: None,
        })
    }

    /// Mouse button event at a pointer position.
    pub fn button(
        button: MouseButton,
        action: Action,
        modifiers: Modifiers,
        position: (f32, f32),
    ) -> Self {
        Self::input(Input {
            code: InputCode::Button(button),
            action,
            modifiers,
            position: Some(position),
        })
    }

    /// Pointer motion to a new position.
    pub fn pointer_moved(x: f32, y: f32, modifiers: Modifiers) -> Self {
        Self::input(Input {
            code: InputCode::Pointer,
            action: Action::Moved,
            modifiers,
            position: Some((x, y)),
        })
    }

    fn now(payload: Payload) -> Self {
        Self {
            timestamp: Timestamp::now(),
            payload,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn kind(&self) -> MessageKind {
        self.payload.kind()
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Consumes the message, yielding its payload.
    pub fn into_payload(self) -> Payload {
        self.payload
    }

    pub fn as_info(&self) -> Option<&Info> {
        match &self.payload {
            Payload::Info(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_input(&self) -> Option<&Input> {
        match &self.payload {
            Payload::Input(input) => Some(input),
            _ => None,
        }
    }

    pub fn as_system(&self) -> Option<SystemEvent> {
        match &self.payload {
            Payload::System(event) => Some(*event),
            _ => None,
        }
    }

    /// Returns `true` for System close-request and quit messages.
    pub fn is_quit_signal(&self) -> bool {
        self.as_system().is_some_and(SystemEvent::is_quit_signal)
    }
}

//=== MessageBuilder ======================================================

/// Errors raised while constructing a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MessageError {
    #[error("message has no kind: no payload was set before build()")]
    MissingKind,
}

/// Builder for messages whose payload or timestamp is chosen at runtime.
///
/// ```
/// use cinder_engine::core::message::{Message, MessageKind, SystemEvent, Timestamp};
///
/// let msg = Message::builder()
///     .system(SystemEvent::Quit)
///     .timestamp(Timestamp(3))
///     .build()
///     .unwrap();
/// assert_eq!(msg.kind(), MessageKind::System);
///
/// assert!(Message::builder().build().is_err());
/// ```
#[derive(Debug, Default)]
pub struct MessageBuilder {
    timestamp: Option<Timestamp>,
    payload: Option<Payload>,
}

impl MessageBuilder {
    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn info(self, key: impl Into<Cow<'static, str>>, value: InfoValue) -> Self {
        self.payload(Payload::Info(Info::new(key, value)))
    }

    pub fn input(self, input: Input) -> Self {
        self.payload(Payload::Input(input))
    }

    pub fn system(self, event: SystemEvent) -> Self {
        self.payload(Payload::System(event))
    }

    /// Overrides the creation time (defaults to [`Timestamp::now`]).
    pub fn timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn build(self) -> Result<Message, MessageError> {
        let payload = self.payload.ok_or(MessageError::MissingKind)?;
        Ok(Message {
            timestamp: self.timestamp.unwrap_or_else(Timestamp::now),
            payload,
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=====================================================================
    // Construction
    //=====================================================================

    #[test]
    fn builder_without_payload_is_rejected() {
        let result = Message::builder().timestamp(Timestamp(1)).build();
        assert_eq!(result, Err(MessageError::MissingKind));
    }

    #[test]
    fn builder_keeps_explicit_timestamp() {
        let msg = Message::builder()
            .info(INFO_INIT, InfoValue::None)
            .timestamp(Timestamp(42))
            .build()
            .unwrap();

        assert_eq!(msg.timestamp(), Timestamp(42));
        assert_eq!(msg.kind(), MessageKind::Info);
    }

    #[test]
    fn kind_follows_payload() {
        assert_eq!(Message::info("k", InfoValue::Int(1)).kind(), MessageKind::Info);
        assert_eq!(
            Message::key(KeyCode::KeyA, Action::Pressed, Modifiers::empty()).kind(),
            MessageKind::Input
        );
        assert_eq!(Message::system(SystemEvent::FocusLost).kind(), MessageKind::System);
    }

    #[test]
    fn timestamps_are_monotonic() {
        let first = Message::system(SystemEvent::FocusGained);
        let second = Message::system(SystemEvent::FocusLost);
        assert!(second.timestamp() >= first.timestamp());
    }

    //=====================================================================
    // Accessors
    //=====================================================================

    #[test]
    fn quit_signals_are_close_and_quit_only() {
        assert!(Message::system(SystemEvent::CloseRequested).is_quit_signal());
        assert!(Message::system(SystemEvent::Quit).is_quit_signal());
        assert!(!Message::system(SystemEvent::FocusLost).is_quit_signal());
        assert!(!Message::system(SystemEvent::Resized { width: 1, height: 1 }).is_quit_signal());
        assert!(!Message::key(KeyCode::Escape, Action::Pressed, Modifiers::empty()).is_quit_signal());
    }

    #[test]
    fn typed_accessors_match_variant() {
        let msg = Message::button(
            MouseButton::Left,
            Action::Pressed,
            Modifiers::SHIFT,
            (10.0, 20.0),
        );

        let input = msg.as_input().expect("button message should be input");
        assert_eq!(input.code, InputCode::Button(MouseButton::Left));
        assert_eq!(input.position, Some((10.0, 20.0)));
        assert!(msg.as_info().is_none());
        assert!(msg.as_system().is_none());
    }

    #[test]
    fn pointer_moved_uses_moved_action() {
        let msg = Message::pointer_moved(3.0, 4.0, Modifiers::empty());
        let input = msg.as_input().unwrap();
        assert_eq!(input.code, InputCode::Pointer);
        assert_eq!(input.action, Action::Moved);
    }

    #[test]
    fn info_key_comparison() {
        let msg = Message::info(INFO_FRAME_RATE, InfoValue::Float(59.9));
        let info = msg.as_info().unwrap();
        assert!(info.is(INFO_FRAME_RATE));
        assert!(!info.is(INFO_INIT));
    }
}
