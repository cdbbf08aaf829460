//=========================================================================
// Engine Errors
//=========================================================================
//
// Error taxonomy:
// - Construction: malformed messages (`MessageError`), rejected before
//   they reach the queue.
// - Resource: backend failures (`PlatformError`, `RenderError`,
//   `ImageError`) and configuration problems (`ConfigError`). These are
//   surfaced to the entry point, which decides whether to terminate.
//
// Logic errors (unknown message kinds, impossible transitions) are not
// errors at all: state machines ignore them.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::io;

use thiserror::Error;

//=== Internal Dependencies ===============================================

pub use crate::core::message::MessageError;

//=== PlatformError =======================================================

/// Display and input backend failures.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Failed to create the OS event loop.
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(String),

    /// The OS event loop reported an error while pumping.
    #[error("event loop error: {0}")]
    EventLoopExecution(String),

    #[error("window creation failed: {0}")]
    WindowCreation(String),

    /// An input device could not be opened or read.
    #[error("input device unavailable: {0}")]
    DeviceUnavailable(String),
}

//=== RenderError =========================================================

/// Renderer backend failures.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("begin_frame called while a frame is already in progress")]
    FrameInProgress,

    #[error("{0} called outside begin_frame/end_frame")]
    NoFrameInProgress(&'static str),

    #[error("texture upload failed: {0}")]
    Texture(String),

    #[error("present failed: {0}")]
    Present(#[from] io::Error),
}

//=== ImageError ==========================================================

/// Image decoding failures.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("unrecognized image format")]
    UnknownFormat,

    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),
}

//=== ConfigError =========================================================

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] io::Error),

    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

//=== EngineError =========================================================

/// Any failure the engine reports to its entry point.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Message(#[from] MessageError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Crate-wide result alias.
pub type EngineResult<T = ()> = Result<T, EngineError>;

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_implement_error_trait() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<PlatformError>();
        assert_error::<RenderError>();
        assert_error::<ImageError>();
        assert_error::<ConfigError>();
        assert_error::<EngineError>();
    }

    #[test]
    fn engine_error_is_transparent() {
        let err: EngineError = PlatformError::WindowCreation("no display".into()).into();
        assert_eq!(err.to_string(), "window creation failed: no display");
    }

    #[test]
    fn message_error_converts() {
        let err: EngineError = MessageError::MissingKind.into();
        assert!(matches!(err, EngineError::Message(MessageError::MissingKind)));
    }

    #[test]
    fn render_error_display_names_operation() {
        let err = RenderError::NoFrameInProgress("submit");
        assert_eq!(err.to_string(), "submit called outside begin_frame/end_frame");
    }
}
