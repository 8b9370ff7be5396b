//! Tic-tac-toe game engine - board, win lines, turn/score state and the
//! authoritative state machine.
//!
//! This module provides:
//! - A fixed 3x3 board of cells
//! - The catalog of the 8 winning lines with first-match win detection
//! - Turn and cumulative score bookkeeping
//! - The state machine that validates moves and queues events

pub mod board;
pub mod constants;
pub mod entities;
pub mod lines;
pub mod score;
pub mod state_machine;

pub use board::{Board, BoardError};
pub use entities::{Cell, Coord, DisplayName, Orientation, Role};
pub use lines::{LineCatalog, WinLine};
pub use score::{Scores, TurnState};
pub use state_machine::{GameEvent, GamePhase, GameSnapshot, GameStateMachine, MoveRejection};
