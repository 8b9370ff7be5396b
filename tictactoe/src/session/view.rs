//! Participant-side projection of a session.
//!
//! A [`SessionView`] starts from the snapshot a participant receives when it
//! joins and is kept current by applying every broadcast [`GameEvent`] in
//! order. It never validates anything; the authority already did.

use crate::game::{
    Board, GameEvent, GamePhase, Scores, WinLine,
    entities::{Cell, DisplayName, Role},
};

use super::messages::{SessionId, SessionSnapshot};

#[derive(Clone, Debug)]
pub struct SessionView {
    session_id: SessionId,
    local_role: Role,
    board: Board,
    phase: GamePhase,
    current_turn: Option<Role>,
    scores: Scores,
    names: [Option<DisplayName>; 2],
    last_win: Option<(WinLine, Role)>,
}

impl SessionView {
    /// Build the view from the join acknowledgement.
    #[must_use]
    pub fn from_welcome(local_role: Role, snapshot: &SessionSnapshot) -> Self {
        let mut names = [None, None];
        for participant in &snapshot.participants {
            names[slot(participant.role)] = Some(participant.name.clone());
        }

        Self {
            session_id: snapshot.session_id,
            local_role,
            board: snapshot.game.board.clone(),
            phase: snapshot.game.phase,
            current_turn: snapshot.game.current_turn,
            scores: snapshot.game.scores,
            names,
            last_win: None,
        }
    }

    pub fn apply(&mut self, event: &GameEvent) {
        match event {
            GameEvent::GameStarted => {
                self.board.reset();
                self.phase = GamePhase::InProgress;
                self.last_win = None;
            }
            GameEvent::Rematch => {
                self.board.reset();
                self.phase = GamePhase::InProgress;
                self.last_win = None;
            }
            GameEvent::TurnChanged(turn) => self.current_turn = *turn,
            GameEvent::ScoreChanged(scores) => self.scores = *scores,
            GameEvent::ObjectPlaced { row, col, role } => {
                // Off-board placements cannot come from the authority
                let _ = self.board.set(*row, *col, Cell::from(*role));
            }
            GameEvent::GameWon { line, role } => {
                self.phase = GamePhase::Won;
                self.last_win = Some((line.clone(), *role));
            }
            GameEvent::GameTied => self.phase = GamePhase::Tied,
        }
    }

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    #[must_use]
    pub fn local_role(&self) -> Role {
        self.local_role
    }

    #[must_use]
    pub fn current_turn(&self) -> Option<Role> {
        self.current_turn
    }

    #[must_use]
    pub fn is_my_turn(&self) -> bool {
        self.current_turn == Some(self.local_role)
    }

    /// Scores as `(player A, player B)`.
    #[must_use]
    pub fn scores(&self) -> (u32, u32) {
        self.scores.as_pair()
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn name_of(&self, role: Role) -> Option<&DisplayName> {
        self.names[slot(role)].as_ref()
    }

    /// Line and winner of the last concluded round, until the next one starts.
    #[must_use]
    pub fn last_win(&self) -> Option<&(WinLine, Role)> {
        self.last_win.as_ref()
    }
}

fn slot(role: Role) -> usize {
    match role {
        Role::PlayerA => 0,
        Role::PlayerB => 1,
    }
}
