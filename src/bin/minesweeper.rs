//=========================================================================
// Minesweeper
//
// Entry point wiring the sample game to the platform backends.
//
// Backends:
// ```text
//  default      winit window (input from the window) + text frames
//  --evdev P    input read from an evdev node instead of the window
//  --headless   no window; requires --evdev for input
// ```
//
// Frames are drawn as text on stdout; logs go to stderr (RUST_LOG).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use log::{error, info};
use pico_args::Arguments;
use serde::Deserialize;

//=== Internal Dependencies ===============================================

use cinder_engine::config::EngineConfig;
use cinder_engine::core::backend::{Display, Input};
use cinder_engine::error::ConfigError;
use cinder_engine::minesweeper::{Minesweeper, MinesweeperConfig};
use cinder_engine::platform::{EvdevInput, HeadlessDisplay, NullInput};
use cinder_engine::render::AsciiRenderer;
use cinder_engine::{EngineBuilder, EngineResult, RunSummary};

//=== Command Line ========================================================

const HELP: &str = "\
Play minesweeper on the Cinder engine

USAGE:
  minesweeper [OPTIONS]

OPTIONS:
  --config   PATH    TOML file with [engine] and [minesweeper] tables
  --width    N       Board columns                  [default: 9]
  --height   N       Board rows                     [default: 9]
  --mines    N       Number of mines                [default: 10]
  --seed     N       Fixed board seed               [default: time based]
  --evdev    PATH    Read input from an evdev device node

FLAGS:
  --headless         Run without a window (needs --evdev)
  -h, --help         Print help information

ENVIRONMENT:
  RUST_LOG           Log filter, e.g. `info` or `minesweeper=debug`
";

struct Args {
    config: Option<PathBuf>,
    width: Option<usize>,
    height: Option<usize>,
    mines: Option<usize>,
    seed: Option<u64>,
    evdev: Option<PathBuf>,
    headless: bool,
}

impl Args {
    fn parse() -> Result<Self, pico_args::Error> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            print!("{HELP}");
            std::process::exit(0);
        }

        let args = Self {
            config: pargs.opt_value_from_str("--config")?,
            width: pargs.opt_value_from_str("--width")?,
            height: pargs.opt_value_from_str("--height")?,
            mines: pargs.opt_value_from_str("--mines")?,
            seed: pargs.opt_value_from_str("--seed")?,
            evdev: pargs.opt_value_from_str("--evdev")?,
            headless: pargs.contains("--headless"),
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            return Err(pico_args::Error::ArgumentParsingFailed {
                cause: format!("unexpected arguments: {:?}", remaining),
            });
        }
        Ok(args)
    }
}

//=== Config File =========================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GameFile {
    engine: EngineConfig,
    minesweeper: MinesweeperConfig,
}

fn load_config(args: &Args) -> Result<GameFile, ConfigError> {
    let mut file = match &args.config {
        Some(path) => {
            let source = std::fs::read_to_string(path)?;
            toml::from_str::<GameFile>(&source)?
        }
        None => GameFile::default(),
    };

    let game = &mut file.minesweeper;
    game.width = args.width.unwrap_or(game.width);
    game.height = args.height.unwrap_or(game.height);
    game.mines = args.mines.unwrap_or(game.mines);
    game.seed = args.seed.or(game.seed);

    if args.config.is_none() {
        file.engine.window.title = "Minesweeper".into();
    }

    file.engine.validate()?;
    file.minesweeper.validate()?;
    Ok(file)
}

//=== Wiring ==============================================================

fn play<D, I>(display: D, input: I, file: GameFile) -> EngineResult<RunSummary>
where
    D: Display,
    I: Input,
{
    let renderer = AsciiRenderer::new(io::stdout()).with_clear_screen(true);
    let game = Minesweeper::new(file.minesweeper);

    EngineBuilder::new()
        .with_config(file.engine)
        .build(display, input, renderer, game)
        .run()
}

/// Window input arrives through the display; evdev replaces it when given.
fn play_on<D: Display>(display: D, input: Option<EvdevInput>, file: GameFile) -> EngineResult<RunSummary> {
    match input {
        Some(input) => play(display, input, file),
        None => play(display, NullInput, file),
    }
}

#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
fn play_windowed(input: Option<EvdevInput>, file: GameFile) -> EngineResult<RunSummary> {
    use cinder_engine::platform::WindowedDisplay;

    let display = WindowedDisplay::create(&file.engine.window)?;
    play_on(display, input, file)
}

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
fn play_windowed(input: Option<EvdevInput>, file: GameFile) -> EngineResult<RunSummary> {
    log::warn!("No windowed backend on this target, running headless");
    let display = HeadlessDisplay::create(&file.engine.window)?;
    play_on(display, input, file)
}

fn run(args: Args, file: GameFile) -> EngineResult<RunSummary> {
    let input = args.evdev.as_ref().map(EvdevInput::open).transpose()?;

    if args.headless {
        let display = HeadlessDisplay::create(&file.engine.window)?;
        return play_on(display, input, file);
    }
    play_windowed(input, file)
}

//=== Main ================================================================

fn main() -> ExitCode {
    env_logger::builder().format_target(true).init();

    let args = match Args::parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}\n\n{}", e, HELP);
            return ExitCode::from(2);
        }
    };

    if args.headless && args.evdev.is_none() {
        error!("--headless needs --evdev, there would be no input");
        return ExitCode::from(2);
    }

    let file = match load_config(&args) {
        Ok(file) => file,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Starting {}x{} board with {} mines",
        file.minesweeper.width, file.minesweeper.height, file.minesweeper.mines
    );

    match run(args, file) {
        Ok(summary) => {
            info!(
                "Exited ({:?}) after {} frames, {} messages, {} dropped",
                summary.exit_reason,
                summary.frames,
                summary.messages_dispatched,
                summary.messages_dropped
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
