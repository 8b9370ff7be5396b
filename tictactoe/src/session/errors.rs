//! Session error types.

use thiserror::Error;

/// Errors raised at the session boundary. Illegal moves are not errors; they
/// are silently ignored by the game state machine.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SessionError {
    /// Both roles have already been handed out.
    #[error("session is full")]
    SessionFull,

    /// The session actor has stopped.
    #[error("session is closed")]
    Closed,

    /// No more sessions may be created.
    #[error("session limit of {0} reached")]
    CapacityReached(usize),

    /// Invalid session configuration.
    #[error("invalid session configuration: {0}")]
    InvalidConfig(String),
}
