use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionModeError {
    #[error("Session mode stack used before init()")]
    NotInitialized,

    #[error("Unknown session mode '{name}'")]
    UnknownMode { name: String },

    /// Popping a mode that is not on top, or the last remaining mode.
    #[error("Invalid pop of session mode '{requested}' (current: '{current}', depth: {depth})")]
    InvalidPop {
        requested: String,
        current: String,
        depth: usize,
    },

    #[error("Invalid mode file {path:?}: {reason}")]
    ModeFile { path: PathBuf, reason: String },
}
