//! Error types for the window manager.

use anchor::AnchorError;
use engine_state::{StageError, WindowId};
use thiserror::Error;

use crate::operator::OperatorResult;

#[derive(Debug, Error)]
pub enum OperatorError {
    #[error("Operator already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Operator registry is sealed, cannot register {0}")]
    RegistrySealed(String),

    #[error("Unknown operator: {0}")]
    NotFound(String),

    #[error("Operator {0} cannot run in the current context")]
    PollFailed(String),

    #[error("Operator {idname} returned a result that is both running and terminal: {result:?}")]
    InvalidResult {
        idname: String,
        result: OperatorResult,
    },

    #[error("Operator {0} went modal without a window to run in")]
    NoWindow(String),
}

#[derive(Debug, Error)]
pub enum WmError {
    #[error("Unknown window: {0}")]
    UnknownWindow(WindowId),

    #[error("Failed to realize native window for {window}: {source}")]
    Realize {
        window: WindowId,
        #[source]
        source: AnchorError,
    },

    #[error("No window can host the quit prompt")]
    NoPromptHost,

    #[error("No quit prompt is waiting for an answer")]
    NoQuitPrompt,

    #[error(transparent)]
    Platform(#[from] AnchorError),

    #[error(transparent)]
    Operator(#[from] OperatorError),

    #[error(transparent)]
    Stage(#[from] StageError),
}
