//=========================================================================
// Event Queue
//=========================================================================
//
// Ordered, thread-safe hand-off of Messages from any number of producers
// to exactly one consumer (the main loop).
//
// Architecture:
//   Producers ── EventSender::push() ──┐
//   (backends, capture threads,        │   Mutex<VecDeque<Message>>
//    engine timers)                    ▼
//   Main loop ◄── EventQueue::drain() ─┘   (once per frame)
//
// Every push and every drain holds the lock for its whole duration, so a
// drain sees each push either completely or not at all. Global FIFO order
// across producers is the order in which pushes acquired the lock.
//
// Overflow (bounded capacity only): the oldest non-System message is
// dropped to make room and counted. System messages are never dropped.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::message::{Message, MessageKind};

//=== Shared State ========================================================

struct QueueState {
    messages: VecDeque<Message>,
    dropped: u64,
}

struct Shared {
    state: Mutex<QueueState>,
    capacity: Option<usize>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        // A producer panicking mid-push cannot leave the deque half-written,
        // so the data behind a poisoned lock is still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, message: Message) {
        let mut state = self.lock();

        if let Some(capacity) = self.capacity {
            if state.messages.len() >= capacity && !Self::make_room(&mut state, &message) {
                return;
            }
        }

        trace!(target: "core::event_queue", "push {:?} @ {}", message.kind(), message.timestamp());
        state.messages.push_back(message);
    }

    /// Frees one slot for `incoming`. Returns `false` if `incoming` itself
    /// was dropped instead.
    fn make_room(state: &mut QueueState, incoming: &Message) -> bool {
        let victim = state
            .messages
            .iter()
            .position(|m| m.kind() != MessageKind::System);

        match victim {
            Some(index) => {
                if let Some(dropped) = state.messages.remove(index) {
                    state.dropped += 1;
                    warn!(
                        target: "core::event_queue",
                        "Queue full, dropped oldest {:?} message (total dropped: {})",
                        dropped.kind(),
                        state.dropped
                    );
                }
                true
            }
            // Queue holds only System messages.
            None if incoming.kind() == MessageKind::System => true,
            None => {
                state.dropped += 1;
                warn!(
                    target: "core::event_queue",
                    "Queue full of System messages, dropped incoming {:?} (total dropped: {})",
                    incoming.kind(),
                    state.dropped
                );
                false
            }
        }
    }
}

//=== EventSender =========================================================

/// Producer handle. Cheap to clone and safe to move to other threads.
#[derive(Clone)]
pub struct EventSender {
    shared: Arc<Shared>,
}

impl EventSender {
    /// Appends a message to the tail of the queue. Never blocks beyond the
    /// queue lock.
    pub fn push(&self, message: Message) {
        self.shared.push(message);
    }
}

//=== EventQueue ==========================================================

/// Consumer handle of the engine's single message queue.
///
/// # Examples
///
/// ```
/// use cinder_engine::core::event_queue::EventQueue;
/// use cinder_engine::core::message::{Message, SystemEvent};
///
/// let mut queue = EventQueue::new();
/// let sender = queue.sender();
///
/// std::thread::spawn(move || sender.push(Message::system(SystemEvent::Quit)))
///     .join()
///     .unwrap();
///
/// let drained = queue.drain();
/// assert_eq!(drained.len(), 1);
/// assert!(queue.is_empty());
/// ```
pub struct EventQueue {
    shared: Arc<Shared>,
}

impl EventQueue {
    //--- Construction -----------------------------------------------------

    /// Creates an unbounded queue.
    pub fn new() -> Self {
        Self::with_capacity(None)
    }

    /// Creates a bounded queue; `None` means unbounded.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == Some(0)`.
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        assert!(capacity != Some(0), "Queue capacity must be positive");

        let initial = capacity.unwrap_or(64).min(1024);
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(QueueState {
                    messages: VecDeque::with_capacity(initial),
                    dropped: 0,
                }),
                capacity,
            }),
        }
    }

    /// Returns a new producer handle.
    pub fn sender(&self) -> EventSender {
        EventSender {
            shared: Arc::clone(&self.shared),
        }
    }

    //--- Producer Side ----------------------------------------------------

    /// Appends a message (same semantics as [`EventSender::push`]).
    pub fn push(&self, message: Message) {
        self.shared.push(message);
    }

    //--- Consumer Side ----------------------------------------------------

    /// Atomically removes and returns every queued message, oldest first.
    ///
    /// Takes `&mut self`: only the owner of the consumer handle can drain.
    pub fn drain(&mut self) -> Vec<Message> {
        let mut state = self.shared.lock();
        state.messages.drain(..).collect()
    }

    //--- Query API --------------------------------------------------------

    /// Returns `true` if a drain would currently yield nothing.
    pub fn is_empty(&self) -> bool {
        self.shared.lock().messages.is_empty()
    }

    /// Number of queued messages.
    pub fn len(&self) -> usize {
        self.shared.lock().messages.len()
    }

    /// Total number of messages dropped by the overflow policy.
    pub fn dropped(&self) -> u64 {
        self.shared.lock().dropped
    }

    /// Configured capacity; `None` means unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.shared.capacity
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
