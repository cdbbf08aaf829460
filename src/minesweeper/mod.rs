//=========================================================================
// Minesweeper
//=========================================================================
//
// Sample game implementing the StateMachine contract.
//
// State flow:
// ```text
//  Uninitialized ──Info──> Menu ──Enter/Space/click──> Playing
//                           │ ^                          │
//                       Esc │ └──────────Esc─────────────┤
//                           v                   mine /   │ all safe
//                       terminal               Lost <────┴────> Won
//                           ^                    │               │
//                           └─────────── Esc ────┴───────────────┘
//                                   (R restarts to Menu)
// ```
//
// Once the game is decided, reveal and flag inputs are no-ops.
//
// Resize re-lays out the board without changing state. Close or quit
// from any state is terminal.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod board;

//=== External Dependencies ===============================================

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

//=== Internal Dependencies ===============================================

use crate::core::backend::Renderer;
use crate::core::message::{
    Action, Input, InputCode, KeyCode, Message, MouseButton, Payload, SystemEvent,
};
use crate::core::scene::{Color, Quad, SceneData};
use crate::core::state_machine::StateMachine;
use crate::error::{ConfigError, RenderError};
pub use board::{Board, Cell, CellState, RevealOutcome};

//=== Constants ===========================================================

/// Space above the board for status text, in pixels.
const HEADER_HEIGHT: f32 = 40.0;

const MARGIN: f32 = 10.0;

const BACKGROUND: Color = Color::rgb(0.1, 0.1, 0.12);
const HIDDEN: Color = Color::rgb(0.45, 0.45, 0.5);
const OPENED: Color = Color::rgb(0.8, 0.8, 0.8);
const CURSOR: Color = Color::rgb(0.95, 0.85, 0.3);

//=== MinesweeperConfig ===================================================

/// Board settings, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Eq, SmartDefault, Serialize, Deserialize)]
#[serde(default)]
pub struct MinesweeperConfig {
    #[default = 9]
    pub width: usize,

    #[default = 9]
    pub height: usize,

    #[default = 10]
    pub mines: usize,

    /// Fixed seed for reproducible boards; absent means time-based.
    #[default(None)]
    pub seed: Option<u64>,
}

impl MinesweeperConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "board size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.mines >= self.width * self.height {
            return Err(ConfigError::Invalid(format!(
                "{} mines do not fit a {}x{} board",
                self.mines, self.width, self.height
            )));
        }
        Ok(())
    }
}

//=== GameState ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Uninitialized,
    Menu,
    Playing,
    Won,
    Lost,
}

//=== Layout ==============================================================

/// Screen placement of the board, recomputed on resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub origin: (f32, f32),
    pub cell_size: f32,
}

impl Layout {
    fn compute(window: (u32, u32), columns: usize, rows: usize) -> Self {
        let (width, height) = (window.0 as f32, window.1 as f32);
        let cell_size = ((width - 2.0 * MARGIN) / columns as f32)
            .min((height - HEADER_HEIGHT - MARGIN) / rows as f32)
            .floor()
            .max(1.0);
        let board_width = cell_size * columns as f32;

        Self {
            origin: (((width - board_width) / 2.0).max(0.0).floor(), HEADER_HEIGHT),
            cell_size,
        }
    }

    /// Cell under a window position.
    fn cell_at(&self, (x, y): (f32, f32), columns: usize, rows: usize) -> Option<(usize, usize)> {
        let column = ((x - self.origin.0) / self.cell_size).floor();
        let row = ((y - self.origin.1) / self.cell_size).floor();
        if column < 0.0 || row < 0.0 {
            return None;
        }
        let (column, row) = (column as usize, row as usize);
        (column < columns && row < rows).then_some((column, row))
    }

    fn cell_origin(&self, column: usize, row: usize) -> (f32, f32) {
        (
            self.origin.0 + column as f32 * self.cell_size,
            self.origin.1 + row as f32 * self.cell_size,
        )
    }
}

//=== Commands ============================================================

/// Game-level meaning of an Input message.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    /// Start or reveal; carries the click position.
    Activate(Option<(f32, f32)>),
    Flag(Option<(f32, f32)>),
    Move(isize, isize),
    Back,
    Restart,
}

impl Command {
    fn from_input(input: &Input) -> Option<Self> {
        match (input.code, input.action) {
            (InputCode::Key(key), Action::Pressed) => match key {
                KeyCode::Enter | KeyCode::Space => Some(Self::Activate(None)),
                KeyCode::KeyF => Some(Self::Flag(None)),
                KeyCode::Escape => Some(Self::Back),
                KeyCode::KeyR => Some(Self::Restart),
                other => Self::movement(other),
            },
            (InputCode::Key(key), Action::Repeated) => Self::movement(key),
            (InputCode::Button(MouseButton::Left), Action::Pressed) => {
                Some(Self::Activate(input.position))
            }
            (InputCode::Button(MouseButton::Right), Action::Pressed) => {
                Some(Self::Flag(input.position))
            }
            _ => None,
        }
    }

    fn movement(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::ArrowLeft => Some(Self::Move(-1, 0)),
            KeyCode::ArrowRight => Some(Self::Move(1, 0)),
            KeyCode::ArrowUp => Some(Self::Move(0, -1)),
            KeyCode::ArrowDown => Some(Self::Move(0, 1)),
            _ => None,
        }
    }
}

//=== Minesweeper =========================================================

/// Minesweeper state machine.
#[derive(Debug, Clone)]
pub struct Minesweeper {
    config: MinesweeperConfig,
    state: GameState,
    board: Board,
    games_started: u64,
    cursor: (usize, usize),
    window: (u32, u32),
    layout: Layout,
    elapsed: Duration,
    terminal: bool,
}

impl Default for Minesweeper {
    fn default() -> Self {
        Self::new(MinesweeperConfig::default())
    }
}

impl Minesweeper {
    //--- Construction -----------------------------------------------------

    pub fn new(config: MinesweeperConfig) -> Self {
        let board = Board::new(
            config.width.max(1),
            config.height.max(1),
            config.mines,
            board_seed(&config, 0),
        );
        Self::with_board(config, board)
    }

    /// Starts with a prepared board (used for fixed layouts).
    pub fn with_board(config: MinesweeperConfig, board: Board) -> Self {
        let window = (800, 600);
        Self {
            layout: Layout::compute(window, board.width(), board.height()),
            config,
            state: GameState::Uninitialized,
            board,
            games_started: 0,
            cursor: (0, 0),
            window,
            elapsed: Duration::ZERO,
            terminal: false,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Time spent in Playing for the current board.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    //--- Transitions ------------------------------------------------------

    fn set_state(&mut self, next: GameState) {
        if self.state != next {
            debug!(target: "minesweeper", "{:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    fn finish(&mut self, why: &str) {
        info!(target: "minesweeper", "Game over ({}), exiting", why);
        self.terminal = true;
    }

    fn restart(&mut self) {
        self.games_started += 1;
        self.board = Board::new(
            self.board.width(),
            self.board.height(),
            self.config.mines,
            board_seed(&self.config, self.games_started),
        );
        self.cursor = (0, 0);
        self.elapsed = Duration::ZERO;
        self.set_state(GameState::Menu);
    }

    //--- Message Handling -------------------------------------------------

    fn on_system(&mut self, event: SystemEvent) {
        match event {
            SystemEvent::Resized { width, height } => {
                self.window = (width, height);
                self.layout = Layout::compute(self.window, self.board.width(), self.board.height());
                trace!(target: "minesweeper", "Re-laid out board: {:?}", self.layout);
            }
            SystemEvent::CloseRequested | SystemEvent::Quit => self.finish("closed"),
            SystemEvent::FocusGained | SystemEvent::FocusLost => {}
        }
    }

    fn on_command(&mut self, command: Command) {
        match (self.state, command) {
            (GameState::Uninitialized, _) => {}

            //--- Menu ---------------------------------------------------------

            (GameState::Menu, Command::Activate(_)) => self.set_state(GameState::Playing),
            (GameState::Menu, Command::Back) => self.finish("quit from menu"),

            //--- Playing ------------------------------------------------------

            (GameState::Playing, Command::Activate(position)) => {
                if let Some((x, y)) = self.target(position) {
                    self.reveal(x, y);
                }
            }
            (GameState::Playing, Command::Flag(position)) => {
                if let Some((x, y)) = self.target(position) {
                    self.board.toggle_flag(x, y);
                }
            }
            (GameState::Playing, Command::Move(dx, dy)) => self.move_cursor(dx, dy),
            (GameState::Playing, Command::Back) => self.set_state(GameState::Menu),

            //--- Won / Lost ---------------------------------------------------

            (GameState::Won | GameState::Lost, Command::Back) => self.finish("acknowledged"),
            (GameState::Won | GameState::Lost, Command::Restart) => self.restart(),

            _ => {}
        }
    }

    /// Click position if given (and on the board), otherwise the cursor.
    fn target(&mut self, position: Option<(f32, f32)>) -> Option<(usize, usize)> {
        match position {
            Some(position) => {
                let cell =
                    self.layout
                        .cell_at(position, self.board.width(), self.board.height())?;
                self.cursor = cell;
                Some(cell)
            }
            None => Some(self.cursor),
        }
    }

    fn reveal(&mut self, x: usize, y: usize) {
        match self.board.reveal(x, y) {
            RevealOutcome::Mine => {
                info!(target: "minesweeper", "Mine at ({}, {})", x, y);
                self.set_state(GameState::Lost);
            }
            RevealOutcome::Cleared => {
                info!(target: "minesweeper", "Board cleared in {:.1}s", self.elapsed.as_secs_f32());
                self.set_state(GameState::Won);
            }
            RevealOutcome::Revealed(count) => {
                trace!(target: "minesweeper", "Opened {} cells from ({}, {})", count, x, y);
            }
            RevealOutcome::Ignored => {}
        }
    }

    fn move_cursor(&mut self, dx: isize, dy: isize) {
        let clamp = |value: usize, delta: isize, limit: usize| {
            value.saturating_add_signed(delta).min(limit - 1)
        };
        self.cursor = (
            clamp(self.cursor.0, dx, self.board.width()),
            clamp(self.cursor.1, dy, self.board.height()),
        );
    }

    //--- Presentation -----------------------------------------------------

    fn status_lines(&self) -> [String; 2] {
        let mines_left = self.board.mine_count().saturating_sub(self.board.flags_placed());
        match self.state {
            GameState::Uninitialized => [String::new(), String::new()],
            GameState::Menu => [
                "MINESWEEPER".to_string(),
                "Enter/Space or click to play, Esc to quit".to_string(),
            ],
            GameState::Playing => [
                format!("Mines: {}  Time: {}s", mines_left, self.elapsed.as_secs()),
                "Arrows move, Space reveals, F flags, Esc for menu".to_string(),
            ],
            GameState::Won => [
                format!("Cleared in {}s!", self.elapsed.as_secs()),
                "Esc to exit, R for a new game".to_string(),
            ],
            GameState::Lost => [
                "Boom!".to_string(),
                "Esc to exit, R for a new game".to_string(),
            ],
        }
    }

    fn glyph(&self, cell: &Cell) -> (char, Color) {
        let show_mine = self.state == GameState::Lost && cell.mine;
        match cell.state {
            CellState::Revealed if cell.mine => ('*', Color::RED),
            CellState::Revealed if cell.adjacent == 0 => ('.', OPENED),
            CellState::Revealed => (char::from(b'0' + cell.adjacent), OPENED),
            _ if show_mine => ('*', HIDDEN),
            CellState::Flagged => ('F', HIDDEN),
            CellState::Hidden => ('#', HIDDEN),
        }
    }

    fn scene(&self) -> SceneData {
        let mut scene = SceneData::new(BACKGROUND);
        if self.state == GameState::Uninitialized {
            return scene;
        }

        let [status, help] = self.status_lines();
        scene.push_label(MARGIN, 5.0, status, Color::WHITE);
        scene.push_label(MARGIN, 20.0, help, Color::GRAY);

        let size = self.layout.cell_size;
        for row in 0..self.board.height() {
            for column in 0..self.board.width() {
                let Some(cell) = self.board.cell(column, row) else {
                    continue;
                };
                let (glyph, mut color) = self.glyph(cell);
                if self.state == GameState::Playing && (column, row) == self.cursor {
                    color = CURSOR;
                }
                let (x, y) = self.layout.cell_origin(column, row);
                scene.push_quad(Quad::new(x, y, size, size, color).with_glyph(glyph));
            }
        }
        scene
    }
}

impl StateMachine for Minesweeper {
    fn on_message(&mut self, message: Message) {
        if self.terminal {
            return;
        }
        match message.into_payload() {
            Payload::Info(_) if self.state == GameState::Uninitialized => {
                self.set_state(GameState::Menu);
            }
            Payload::Info(_) => {}
            Payload::Input(input) => {
                if let Some(command) = Command::from_input(&input) {
                    self.on_command(command);
                }
            }
            Payload::System(event) => self.on_system(event),
        }
    }

    fn update(&mut self, delta: Duration) {
        if self.state == GameState::Playing {
            self.elapsed += delta;
        }
    }

    fn render(&self, renderer: &mut dyn Renderer) -> Result<(), RenderError> {
        renderer.submit(&self.scene())
    }

    fn is_terminal(&self) -> bool {
        self.terminal
    }
}

//--- Helpers -------------------------------------------------------------

fn board_seed(config: &MinesweeperConfig, game: u64) -> u64 {
    match config.seed {
        Some(seed) => seed.wrapping_add(game),
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default(),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
