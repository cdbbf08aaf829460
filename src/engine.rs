//=========================================================================
// Cinder Engine
//
// Main entry point and frame loop.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  RunSummary
//         │                          │
//         ├─ with_config()           └─ run_frame() until exit:
//         ├─ with_target_fps()            1. display + input pump
//         └─ with_queue_capacity()        2. drain queue
//                                         3. dispatch in order
//                                         4. update(dt)
//                                         5. render
//                                         6. present
//                                         7. exit check
// ```
//
// Everything runs on the calling thread. Backends that capture on other
// threads only ever push into the queue.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error, info, trace};

//=== Internal Dependencies ===============================================

use crate::config::{EngineConfig, WindowConfig};
use crate::core::backend::{Display, Input, Renderer};
use crate::core::event_queue::{EventQueue, EventSender};
use crate::core::message::{InfoValue, Message, SystemEvent, INFO_FRAME_RATE, INFO_INIT};
use crate::core::state_machine::StateMachine;
use crate::error::EngineResult;

//=== Constants ===========================================================

/// Interval between `engine.frame_rate` reports.
const FRAME_RATE_REPORT_INTERVAL: Duration = Duration::from_secs(1);

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Target FPS**: 60 (0 disables pacing)
/// - **Queue capacity**: unbounded
/// - **Frame rate reports**: enabled
///
/// # Examples
///
/// ```no_run
/// use cinder_engine::prelude::*;
/// use cinder_engine::minesweeper::Minesweeper;
/// use cinder_engine::platform::{HeadlessDisplay, HeadlessRenderer, NullInput};
///
/// let mut engine = EngineBuilder::new()
///     .with_target_fps(30)
///     .with_queue_capacity(256)
///     .build(
///         HeadlessDisplay::new(640, 480),
///         NullInput,
///         HeadlessRenderer::new(),
///         Minesweeper::default(),
///     );
///
/// let summary = engine.run()?;
/// println!("Ran {} frames", summary.frames);
/// # Ok::<(), cinder_engine::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    config: EngineConfig,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every setting with a loaded configuration.
    ///
    /// # Panics
    ///
    /// Panics if the configuration does not validate.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        if let Err(e) = config.validate() {
            panic!("Engine config rejected: {}", e);
        }
        self.config = config;
        self
    }

    /// Sets the frame rate the loop paces itself to.
    ///
    /// The loop sleeps for whatever remains of each frame's budget. `0`
    /// runs frames back to back.
    ///
    /// Default: 60
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.config.target_fps = fps;
        self
    }

    /// Bounds the event queue.
    ///
    /// When full, the oldest non-System message is dropped to make room.
    /// System messages are never dropped.
    ///
    /// Default: unbounded
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Queue capacity must be positive");
        self.config.queue_capacity = Some(capacity);
        self
    }

    /// Enables or disables the once-per-second `engine.frame_rate` Info.
    pub fn with_frame_rate_report(mut self, enabled: bool) -> Self {
        self.config.frame_rate_report = enabled;
        self
    }

    /// Sets the window configuration used by [`EngineBuilder::create`].
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window(mut self, window: WindowConfig) -> Self {
        assert!(
            window.width > 0 && window.height > 0,
            "Window size must be positive, got {}x{}",
            window.width,
            window.height
        );
        self.config.window = window;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Assembles an engine from already constructed backends.
    pub fn build<D, I, R, S>(self, display: D, input: I, renderer: R, state: S) -> Engine<D, I, R, S>
    where
        D: Display,
        I: Input,
        R: Renderer,
        S: StateMachine,
    {
        info!(
            target: "engine",
            "Building engine (target FPS: {}, queue: {})",
            self.config.target_fps,
            self.config
                .queue_capacity
                .map_or_else(|| "unbounded".to_string(), |c| c.to_string())
        );

        let now = Instant::now();
        Engine {
            queue: EventQueue::with_capacity(self.config.queue_capacity),
            config: self.config,
            display,
            input,
            renderer,
            state,
            last_frame: None,
            frames: 0,
            messages_dispatched: 0,
            report_started: now,
            frames_since_report: 0,
        }
    }

    /// Creates the display from the window configuration, then builds.
    pub fn create<D, I, R, S>(self, input: I, renderer: R, state: S) -> EngineResult<Engine<D, I, R, S>>
    where
        D: Display,
        I: Input,
        R: Renderer,
        S: StateMachine,
    {
        let display = D::create(&self.config.window)?;
        Ok(self.build(display, input, renderer, state))
    }
}

//=== Run Results =========================================================

/// Why the main loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The state machine reported itself terminal.
    Terminal,

    /// A System close-request or quit message was dispatched.
    QuitRequested,

    /// The display was closed underneath the loop.
    DisplayClosed,
}

/// Outcome of one [`Engine::run_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    Exit(ExitReason),
}

/// Totals reported when [`Engine::run`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub messages_dispatched: u64,
    pub messages_dropped: u64,
    pub exit_reason: ExitReason,
}

//=== Engine ==============================================================

/// Cinder Engine runtime.
///
/// Owns the event queue, the backends and the active state machine.
/// Create via [`EngineBuilder`].
///
/// # Architecture
///
/// ```text
/// Display ─┐
///          ├─push─> EventQueue ─drain─> StateMachine ─render─> Renderer
/// Input ───┘            ↑                                          │
///     sender() ─────────┘                             Display::present
/// ```
pub struct Engine<D, I, R, S>
where
    D: Display,
    I: Input,
    R: Renderer,
    S: StateMachine,
{
    config: EngineConfig,
    queue: EventQueue,
    display: D,
    input: I,
    renderer: R,
    state: S,

    //--- Frame Bookkeeping ------------------------------------------------
    last_frame: Option<Instant>,
    frames: u64,
    messages_dispatched: u64,
    report_started: Instant,
    frames_since_report: u32,
}

impl<D, I, R, S> Engine<D, I, R, S>
where
    D: Display,
    I: Input,
    R: Renderer,
    S: StateMachine,
{
    //--- Accessors --------------------------------------------------------

    /// Producer handle for pushing messages from any thread.
    pub fn sender(&self) -> EventSender {
        self.queue.sender()
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    //--- Execution --------------------------------------------------------

    /// Runs frames until the state machine terminates, a quit signal is
    /// dispatched or the display closes.
    ///
    /// # Lifecycle
    ///
    /// 1. Pushes the `engine.init` Info message, then a `Resized` with the
    ///    display's current size
    /// 2. Runs paced frames, reporting the frame rate once per second
    /// 3. Closes the display, whatever the outcome
    ///
    /// # Errors
    ///
    /// Returns the first backend failure. The display is closed before
    /// the error is returned.
    pub fn run(&mut self) -> EngineResult<RunSummary> {
        info!(target: "engine", "Starting main loop (target FPS: {})", self.config.target_fps);

        self.queue.push(Message::info(INFO_INIT, InfoValue::None));

        // Not every platform reports a resize at startup.
        let (width, height) = self.display.size();
        self.queue.push(Message::system(SystemEvent::Resized { width, height }));

        self.report_started = Instant::now();

        let budget = frame_budget(self.config.target_fps);
        let outcome = loop {
            let started = Instant::now();

            match self.run_frame() {
                Ok(FrameStatus::Continue) => {}
                Ok(FrameStatus::Exit(reason)) => break Ok(reason),
                Err(e) => break Err(e),
            }

            self.report_frame_rate();

            if let Some(budget) = budget {
                let elapsed = started.elapsed();
                if elapsed < budget {
                    thread::sleep(budget - elapsed);
                }
            }
        };

        self.display.close();

        match outcome {
            Ok(exit_reason) => {
                let summary = RunSummary {
                    frames: self.frames,
                    messages_dispatched: self.messages_dispatched,
                    messages_dropped: self.queue.dropped(),
                    exit_reason,
                };
                info!(target: "engine", "Main loop finished: {:?}", summary);
                Ok(summary)
            }
            Err(e) => {
                error!(target: "engine", "Main loop aborted: {}", e);
                Err(e)
            }
        }
    }

    /// Runs exactly one frame, timing `update` from the previous frame.
    pub fn run_frame(&mut self) -> EngineResult<FrameStatus> {
        let now = Instant::now();
        let delta = self
            .last_frame
            .map_or(Duration::ZERO, |last| now.duration_since(last));
        self.last_frame = Some(now);

        self.step(delta)
    }

    /// One pass of the loop with an explicit time step.
    fn step(&mut self, delta: Duration) -> EngineResult<FrameStatus> {
        if !self.display.is_open() {
            debug!(target: "engine", "Display closed, stopping");
            return Ok(FrameStatus::Exit(ExitReason::DisplayClosed));
        }

        //--- 1. Collect ---------------------------------------------------
        let sender = self.queue.sender();
        self.display.pump_events(&sender)?;
        self.input.pump_events(&sender)?;

        //--- 2-3. Dispatch in queue order ---------------------------------
        let messages = self.queue.drain();
        let mut quit_requested = false;

        for message in messages {
            trace!(target: "engine", "Dispatching {:?} @ {}", message.kind(), message.timestamp());
            quit_requested |= message.is_quit_signal();
            self.state.on_message(message);
            self.messages_dispatched += 1;
        }

        //--- 4. Update ----------------------------------------------------
        self.state.update(delta);

        //--- 5-6. Render and present --------------------------------------
        self.renderer.begin_frame()?;
        let rendered = self.state.render(&mut self.renderer);
        // Close the frame even on failure so the next one can begin.
        let finished = self.renderer.end_frame();
        rendered?;
        finished?;
        self.display.present()?;

        self.frames += 1;
        self.frames_since_report += 1;

        //--- 7. Exit check ------------------------------------------------
        if quit_requested {
            info!(target: "engine", "Quit requested");
            return Ok(FrameStatus::Exit(ExitReason::QuitRequested));
        }
        if self.state.is_terminal() {
            info!(target: "engine", "State machine reached a terminal state");
            return Ok(FrameStatus::Exit(ExitReason::Terminal));
        }
        Ok(FrameStatus::Continue)
    }

    /// Pushes an `engine.frame_rate` Info once per report interval.
    fn report_frame_rate(&mut self) {
        if !self.config.frame_rate_report {
            return;
        }
        let elapsed = self.report_started.elapsed();
        if elapsed < FRAME_RATE_REPORT_INTERVAL {
            return;
        }

        let fps = f64::from(self.frames_since_report) / elapsed.as_secs_f64();
        debug!(target: "engine", "Frame rate: {:.1} FPS", fps);
        self.queue.push(Message::info(INFO_FRAME_RATE, InfoValue::Float(fps)));

        self.report_started = Instant::now();
        self.frames_since_report = 0;
    }
}

//--- Helpers -------------------------------------------------------------

fn frame_budget(target_fps: u32) -> Option<Duration> {
    (target_fps > 0).then(|| Duration::from_secs(1) / target_fps)
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input_state::InputState;
    use crate::core::message::{
        Action, KeyCode, MessageKind, Modifiers, MouseButton, Payload,
    };
    use crate::core::scene::{Color, SceneData};
    use crate::error::{EngineError, RenderError};
    use crate::platform::headless::{HeadlessDisplay, HeadlessRenderer, NullInput, ScriptedInput};

    //--- Test Machine -----------------------------------------------------

    /// Records everything it is given; terminal after `stop_after` updates.
    #[derive(Default)]
    struct Recorder {
        received: Vec<Message>,
        keys: InputState,
        updates: u32,
        renders_after_quit: std::cell::Cell<u32>,
        quit_seen: bool,
        stop_after: Option<u32>,
    }

    impl StateMachine for Recorder {
        fn on_message(&mut self, message: Message) {
            if let Payload::Input(input) = message.payload() {
                self.keys.apply(input);
            }
            self.quit_seen |= message.is_quit_signal();
            self.received.push(message);
        }

        fn update(&mut self, _delta: Duration) {
            self.updates += 1;
        }

        fn render(&self, renderer: &mut dyn Renderer) -> Result<(), RenderError> {
            if self.quit_seen {
                self.renders_after_quit.set(self.renders_after_quit.get() + 1);
            }
            let mut scene = SceneData::new(Color::BLACK);
            scene.push_label(0.0, 0.0, format!("{}", self.received.len()), Color::WHITE);
            renderer.submit(&scene)
        }

        fn is_terminal(&self) -> bool {
            self.stop_after.is_some_and(|n| self.updates >= n)
        }
    }

    fn engine_with(
        input: ScriptedInput,
        state: Recorder,
    ) -> Engine<HeadlessDisplay, ScriptedInput, HeadlessRenderer, Recorder> {
        EngineBuilder::new()
            .with_target_fps(0)
            .with_frame_rate_report(false)
            .build(HeadlessDisplay::new(100, 100), input, HeadlessRenderer::new(), state)
    }

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.config().target_fps, 60);
        assert_eq!(builder.config().queue_capacity, None);
        assert!(builder.config().frame_rate_report);
    }

    #[test]
    fn builder_with_queue_capacity() {
        let builder = EngineBuilder::new().with_queue_capacity(256);
        assert_eq!(builder.config().queue_capacity, Some(256));
    }

    #[test]
    #[should_panic(expected = "Queue capacity must be positive")]
    fn builder_with_queue_capacity_panics_on_zero() {
        EngineBuilder::new().with_queue_capacity(0);
    }

    #[test]
    #[should_panic(expected = "Window size must be positive")]
    fn builder_with_window_panics_on_zero_size() {
        EngineBuilder::new().with_window(WindowConfig {
            width: 0,
            ..WindowConfig::default()
        });
    }

    #[test]
    #[should_panic(expected = "Engine config rejected")]
    fn builder_with_invalid_config_panics() {
        let mut config = EngineConfig::default();
        config.queue_capacity = Some(0);
        EngineBuilder::new().with_config(config);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let engine = EngineBuilder::new()
            .with_target_fps(120)
            .with_queue_capacity(64)
            .build(
                HeadlessDisplay::new(10, 10),
                NullInput,
                HeadlessRenderer::new(),
                Recorder::default(),
            );

        assert_eq!(engine.config().target_fps, 120);
        assert_eq!(engine.config().queue_capacity, Some(64));
    }

    #[test]
    fn create_builds_display_from_window_config() {
        let engine = EngineBuilder::new()
            .with_window(WindowConfig {
                title: "Created".into(),
                width: 64,
                height: 48,
                resizable: false,
            })
            .create::<HeadlessDisplay, _, _, _>(NullInput, HeadlessRenderer::new(), Recorder::default())
            .unwrap();

        assert_eq!(engine.display().size(), (64, 48));
        assert_eq!(engine.display().title(), "Created");
    }

    #[test]
    fn frame_budget_from_target() {
        assert_eq!(frame_budget(0), None);
        assert_eq!(frame_budget(50), Some(Duration::from_millis(20)));
    }

    //=====================================================================
    // Frame Loop Tests
    //=====================================================================

    #[test]
    fn info_input_close_dispatched_in_order_then_exit() {
        let mut engine = engine_with(ScriptedInput::new(), Recorder::default());
        let sender = engine.sender();

        let info = Message::info("test.boot", InfoValue::Int(1));
        let esc = Message::key(KeyCode::Escape, Action::Pressed, Modifiers::empty());
        let close = Message::system(SystemEvent::CloseRequested);
        sender.push(info.clone());
        sender.push(esc.clone());
        sender.push(close.clone());

        let status = engine.run_frame().unwrap();

        assert_eq!(engine.state().received, vec![info, esc, close]);
        assert_eq!(status, FrameStatus::Exit(ExitReason::QuitRequested));
        assert_eq!(engine.renderer().frames_presented(), 1);
    }

    #[test]
    fn run_stops_before_next_render_after_close() {
        let script = ScriptedInput::new()
            .frame([Message::key(KeyCode::KeyA, Action::Pressed, Modifiers::empty())])
            .frame([Message::system(SystemEvent::CloseRequested)])
            .frame([Message::key(KeyCode::KeyB, Action::Pressed, Modifiers::empty())]);
        let mut engine = engine_with(script, Recorder::default());

        let summary = engine.run().unwrap();

        assert_eq!(summary.exit_reason, ExitReason::QuitRequested);
        assert_eq!(summary.frames, 2);
        assert_eq!(engine.state().renders_after_quit.get(), 1, "Only the quitting frame renders");
        assert!(!engine.state().keys.is_key_down(KeyCode::KeyB), "Third frame never runs");
        assert!(!engine.display().is_open(), "Display closed on exit");
    }

    #[test]
    fn run_pushes_init_first() {
        let mut engine = engine_with(
            ScriptedInput::new(),
            Recorder {
                stop_after: Some(1),
                ..Recorder::default()
            },
        );

        let summary = engine.run().unwrap();

        assert_eq!(summary.exit_reason, ExitReason::Terminal);
        let received = &engine.state().received;
        assert!(received[0].as_info().is_some_and(|info| info.is(INFO_INIT)));
        assert_eq!(
            received[1].as_system(),
            Some(SystemEvent::Resized { width: 100, height: 100 }),
            "Initial size follows init"
        );
        assert_eq!(summary.messages_dispatched, 2);
    }

    #[test]
    fn game_learns_display_size_before_first_click() {
        use crate::minesweeper::{CellState, Minesweeper};

        // 9x9 board on 400x300: 27px cells, origin (78, 40).
        let script = ScriptedInput::new()
            .idle()
            .frame([Message::key(KeyCode::Enter, Action::Pressed, Modifiers::empty())])
            .frame([Message::button(
                MouseButton::Right,
                Action::Pressed,
                Modifiers::empty(),
                (91.5, 53.5),
            )])
            .frame([Message::system(SystemEvent::CloseRequested)]);
        let mut engine = EngineBuilder::new()
            .with_target_fps(0)
            .with_frame_rate_report(false)
            .build(
                HeadlessDisplay::new(400, 300),
                script,
                HeadlessRenderer::new(),
                Minesweeper::default(),
            );

        engine.run().unwrap();

        let game = engine.state();
        assert_eq!(game.layout().cell_size, 27.0);
        assert_eq!(game.layout().origin, (78.0, 40.0));
        assert_eq!(game.board().cell(0, 0).unwrap().state, CellState::Flagged);
    }

    #[test]
    fn producers_interleave_in_global_fifo() {
        let mut engine = engine_with(ScriptedInput::new(), Recorder::default());
        let a = engine.sender();
        let b = engine.sender();

        a.push(Message::info("a.1", InfoValue::None));
        b.push(Message::info("b.1", InfoValue::None));
        a.push(Message::info("a.2", InfoValue::None));
        b.push(Message::info("b.2", InfoValue::None));

        engine.run_frame().unwrap();

        let keys: Vec<String> = engine
            .state()
            .received
            .iter()
            .filter_map(|m| m.as_info().map(|i| i.key.to_string()))
            .collect();
        assert_eq!(keys, ["a.1", "b.1", "a.2", "b.2"]);
    }

    #[test]
    fn display_events_precede_input_events() {
        let script = ScriptedInput::new()
            .frame([Message::key(KeyCode::Space, Action::Pressed, Modifiers::empty())]);
        let mut engine = engine_with(script, Recorder::default());
        engine.display_mut().inject(SystemEvent::FocusGained);

        engine.run_frame().unwrap();

        let kinds: Vec<MessageKind> = engine.state().received.iter().map(|m| m.kind()).collect();
        assert_eq!(kinds, vec![MessageKind::System, MessageKind::Input]);
    }

    #[test]
    fn empty_frame_still_updates_and_renders() {
        let mut engine = engine_with(ScriptedInput::new(), Recorder::default());

        assert_eq!(engine.run_frame().unwrap(), FrameStatus::Continue);
        assert_eq!(engine.run_frame().unwrap(), FrameStatus::Continue);

        assert_eq!(engine.state().updates, 2);
        assert_eq!(engine.renderer().frames_presented(), 2);
        assert_eq!(engine.display().frames_presented(), 2);
        assert_eq!(engine.frames(), 2);
    }

    #[test]
    fn closed_display_ends_loop() {
        let mut engine = engine_with(ScriptedInput::new(), Recorder::default());
        engine.display_mut().close();

        let summary = engine.run().unwrap();

        assert_eq!(summary.exit_reason, ExitReason::DisplayClosed);
        assert_eq!(summary.frames, 0);
    }

    #[test]
    fn dropped_messages_reported() {
        let mut engine = EngineBuilder::new()
            .with_target_fps(0)
            .with_frame_rate_report(false)
            .with_queue_capacity(2)
            .build(
                HeadlessDisplay::new(10, 10),
                NullInput,
                HeadlessRenderer::new(),
                Recorder::default(),
            );
        let sender = engine.sender();
        for i in 0..4 {
            sender.push(Message::info("flood", InfoValue::Int(i)));
        }
        sender.push(Message::system(SystemEvent::Quit));

        let summary = engine.run().unwrap();

        assert_eq!(summary.exit_reason, ExitReason::QuitRequested);
        assert!(summary.messages_dropped >= 3, "Flood should overflow a queue of 2");
        assert!(engine.state().quit_seen, "System message must survive overflow");
    }

    //--- Failure Propagation ----------------------------------------------

    struct BrokenRender;

    impl StateMachine for BrokenRender {
        fn on_message(&mut self, _message: Message) {}

        fn render(&self, _renderer: &mut dyn Renderer) -> Result<(), RenderError> {
            Err(RenderError::Texture("missing atlas".into()))
        }
    }

    #[test]
    fn render_failure_aborts_run_and_closes_display() {
        let mut engine = EngineBuilder::new().with_target_fps(0).build(
            HeadlessDisplay::new(10, 10),
            NullInput,
            HeadlessRenderer::new(),
            BrokenRender,
        );

        let err = engine.run().unwrap_err();

        assert!(matches!(err, EngineError::Render(RenderError::Texture(_))));
        assert!(!engine.display().is_open());
    }

    #[test]
    fn render_failure_still_closes_renderer_frame() {
        let mut engine = EngineBuilder::new().with_target_fps(0).build(
            HeadlessDisplay::new(10, 10),
            NullInput,
            HeadlessRenderer::new(),
            BrokenRender,
        );

        for _ in 0..2 {
            let err = engine.run_frame().unwrap_err();
            assert!(
                matches!(err, EngineError::Render(RenderError::Texture(_))),
                "Each frame should report the render error, not FrameInProgress: {}",
                err
            );
        }
        assert_eq!(engine.renderer().frames_presented(), 2);
    }
}
