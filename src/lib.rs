//=========================================================================
// Cinder Engine: Library Root
//
// A small game engine skeleton: a platform-independent message core
// driving one pluggable state machine, with swappable display, input and
// renderer backends.
//
// Responsibilities:
// - Expose the frame loop (`Engine`, `EngineBuilder`)
// - Expose the core contracts (`core`): messages, queue, state machine,
//   backend traits
// - Ship the backends and renderers the sample game runs on
//
// Typical usage:
// ```no_run
// use cinder_engine::prelude::*;
// use cinder_engine::minesweeper::Minesweeper;
// use cinder_engine::platform::{HeadlessDisplay, HeadlessRenderer, NullInput};
//
// fn main() -> EngineResult {
//     let mut engine = EngineBuilder::new().build(
//         HeadlessDisplay::new(640, 480),
//         NullInput,
//         HeadlessRenderer::new(),
//         Minesweeper::default(),
//     );
//     engine.run()?;
//     Ok(())
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds every platform-independent contract. Backends and games
// depend on it; it depends on nothing platform specific.
//
pub mod core;

//--- Engine Facade -------------------------------------------------------
//
// `engine` owns the frame loop; `config` and `error` are shared by every
// layer.
//
pub mod config;
pub mod engine;
pub mod error;

//--- Backends & Assets ---------------------------------------------------
//
// `platform` holds Display/Input backends, `render` the Renderers, and
// `loaders` decodes image files for `Renderer::load_texture`.
//
pub mod loaders;
pub mod platform;
pub mod render;

//--- Sample Game ---------------------------------------------------------

pub mod minesweeper;

pub mod prelude;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, ExitReason, RunSummary};
pub use error::{EngineError, EngineResult};
