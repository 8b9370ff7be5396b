//! # Tic-Tac-Toe
//!
//! A networked two-player tic-tac-toe engine built around a single
//! authoritative session per game.
//!
//! The authority owns the board, the turn and the scores. Participants only
//! send commands (connect, move, rematch, disconnect) and mirror the state
//! from the ordered events the authority broadcasts. Illegal commands are
//! ignored without a reply, so participants never diverge.
//!
//! ## Core Modules
//!
//! - [`game`]: Board, win lines, turn/score bookkeeping and the state machine
//! - [`session`]: Session actor, connection pairing and the participant view
//! - [`net`]: Wire protocol, framing, TCP server and a blocking client
//!
//! ## Example
//!
//! ```
//! use tictactoe::{GameEvent, GameStateMachine, Role};
//!
//! let mut game = GameStateMachine::new();
//! game.start();
//! game.submit_move(Role::PlayerA, 1, 1).unwrap();
//!
//! let events: Vec<GameEvent> = game.drain_events().into_iter().collect();
//! assert_eq!(events.last(), Some(&GameEvent::TurnChanged(Some(Role::PlayerB))));
//! ```

/// Networking components for participant-server communication.
pub mod net;
pub use net::{client::Client, messages, server, utils};

/// Core game logic, entities, and state machine.
pub mod game;
pub use game::{
    Board, Cell, Coord, DisplayName, GameEvent, GamePhase, GameSnapshot, GameStateMachine,
    LineCatalog, MoveRejection, Orientation, Role, Scores, WinLine,
    constants::{self, BOARD_SIZE, MAX_PARTICIPANTS},
    entities,
};

/// Session actors and connection management.
pub mod session;
pub use session::{SessionConfig, SessionError, SessionHandle, SessionManager, SessionView};
