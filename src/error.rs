//! Error types
//!
//! Double start/stop are not errors. What remains is the render handshake
//! failing, the worker dying, and bad settings files.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the lock/draw/post handshake with a presentation surface.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceError {
    /// A blocking call was cut short by `Surface::interrupt`.
    ///
    /// The engine treats this as a stop signal, never as a failure.
    #[error("frame hand-off interrupted")]
    Interrupted,

    /// The presentation consumer is gone; no frame will ever be accepted again.
    #[error("presentation consumer disconnected")]
    Disconnected,
}

/// Errors reported by the engine's control surface.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The worker's render handshake failed and the run was aborted.
    #[error("render loop aborted: {0}")]
    Surface(#[from] SurfaceError),

    /// The worker thread panicked before it could report back.
    #[error("engine worker panicked")]
    WorkerPanicked,

    /// The OS refused to create the worker thread.
    #[error("failed to spawn engine worker: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Errors loading or saving [`crate::Settings`].
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Parsed fine but describes an unusable configuration.
    #[error("invalid settings: {0}")]
    Invalid(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
