//! Authoritative game state machine.
//!
//! The machine owns the board, the turn, and the scores. Every mutation
//! queues one or more [`GameEvent`]s which the owner drains and broadcasts.
//! Illegal commands never mutate state and never queue events.

use log::debug;
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, fmt};
use thiserror::Error;

use super::{
    board::Board,
    entities::{Cell, Role},
    lines::{LineCatalog, WinLine},
    score::{Scores, TurnState},
};

/// Why a move was ignored. Never sent to the participant that issued it.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum MoveRejection {
    #[error("no round in progress")]
    NotInProgress,
    #[error("not {0}'s turn")]
    OutOfTurn(Role),
    #[error("({row}, {col}) is off the board")]
    OutOfRange { row: usize, col: usize },
    #[error("({row}, {col}) is already taken")]
    Occupied { row: usize, col: usize },
}

/// Lifecycle of a session's game.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum GamePhase {
    #[default]
    WaitingForPlayers,
    InProgress,
    Won,
    Tied,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::WaitingForPlayers => "waiting for players",
            Self::InProgress => "in progress",
            Self::Won => "won",
            Self::Tied => "tied",
        };
        write!(f, "{repr}")
    }
}

/// State changes broadcast to every participant.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum GameEvent {
    GameStarted,
    TurnChanged(Option<Role>),
    ScoreChanged(Scores),
    ObjectPlaced { row: usize, col: usize, role: Role },
    GameWon { line: WinLine, role: Role },
    GameTied,
    Rematch,
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GameStarted => write!(f, "game started"),
            Self::TurnChanged(Some(role)) => write!(f, "{role} to move"),
            Self::TurnChanged(None) => write!(f, "no moves accepted"),
            Self::ScoreChanged(scores) => write!(f, "score is now {scores}"),
            Self::ObjectPlaced { row, col, role } => {
                write!(f, "{role} placed {} at ({row}, {col})", role.symbol())
            }
            Self::GameWon { line, role } => write!(f, "{role} won on the {line}"),
            Self::GameTied => write!(f, "game tied"),
            Self::Rematch => write!(f, "rematch"),
        }
    }
}

/// Point-in-time copy of the game state, for queries and late joiners.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub board: Board,
    pub current_turn: Option<Role>,
    pub scores: Scores,
}

#[derive(Debug, Default)]
pub struct GameStateMachine {
    board: Board,
    catalog: LineCatalog,
    turn: TurnState,
    scores: Scores,
    phase: GamePhase,
    /// Set once the current round is won or tied; cleared by a rematch.
    round_concluded: bool,
    events: VecDeque<GameEvent>,
}

impl GameStateMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Both participants are present: hand the first move to player A.
    ///
    /// Returns `false` if the game had already started.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::WaitingForPlayers {
            return false;
        }

        self.turn.begin();
        self.phase = GamePhase::InProgress;
        self.events.push_back(GameEvent::GameStarted);
        self.events.push_back(GameEvent::TurnChanged(self.turn.current()));
        true
    }

    /// Apply `role`'s move at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns the reason the move was ignored. A rejected move leaves the
    /// state untouched and queues no events.
    pub fn submit_move(&mut self, role: Role, row: usize, col: usize) -> Result<(), MoveRejection> {
        if self.phase != GamePhase::InProgress {
            return Err(MoveRejection::NotInProgress);
        }
        if !self.turn.is_turn_of(role) {
            return Err(MoveRejection::OutOfTurn(role));
        }
        match self.board.get(row, col) {
            Ok(Cell::Empty) => {}
            Ok(_) => return Err(MoveRejection::Occupied { row, col }),
            Err(_) => return Err(MoveRejection::OutOfRange { row, col }),
        }

        self.board
            .set(row, col, role.into())
            .map_err(|_| MoveRejection::OutOfRange { row, col })?;
        self.events
            .push_back(GameEvent::ObjectPlaced { row, col, role });
        self.turn.flip();

        if let Some((line, winner)) = self.catalog.find_winning_line(&self.board) {
            let line = line.clone();
            self.turn.clear();
            self.scores.record_win(winner);
            self.round_concluded = true;
            self.phase = GamePhase::Won;
            debug!("{winner} completed the {line}");

            self.events.push_back(GameEvent::TurnChanged(None));
            self.events.push_back(GameEvent::ScoreChanged(self.scores));
            self.events.push_back(GameEvent::GameWon { line, role: winner });
        } else if self.board.is_full() {
            self.turn.clear();
            self.round_concluded = true;
            self.phase = GamePhase::Tied;

            self.events.push_back(GameEvent::TurnChanged(None));
            self.events.push_back(GameEvent::GameTied);
        } else {
            self.events
                .push_back(GameEvent::TurnChanged(self.turn.current()));
        }

        Ok(())
    }

    /// Clear the board and start a new round with player A to move.
    /// Scores carry over.
    ///
    /// Tolerated mid-round. Returns `false` (and does nothing) before the
    /// game has started.
    pub fn rematch(&mut self) -> bool {
        if self.phase == GamePhase::WaitingForPlayers {
            return false;
        }

        self.board.reset();
        self.turn.begin();
        self.round_concluded = false;
        self.phase = GamePhase::InProgress;
        self.events.push_back(GameEvent::Rematch);
        self.events.push_back(GameEvent::TurnChanged(self.turn.current()));
        true
    }

    pub fn drain_events(&mut self) -> VecDeque<GameEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn catalog(&self) -> &LineCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn current_turn(&self) -> Option<Role> {
        self.turn.current()
    }

    #[must_use]
    pub fn scores(&self) -> Scores {
        self.scores
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn is_round_concluded(&self) -> bool {
        self.round_concluded
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            board: self.board.clone(),
            current_turn: self.turn.current(),
            scores: self.scores,
        }
    }
}
