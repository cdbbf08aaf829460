//=========================================================================
// Renderers
//=========================================================================
//
// Renderer implementations that ship with the engine. GPU backends plug
// in through the same `Renderer` trait.
//
//=========================================================================

pub mod ascii;

pub use ascii::AsciiRenderer;
