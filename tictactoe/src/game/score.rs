//! Turn and score bookkeeping.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::entities::Role;

/// Which role may submit the next move. `None` before the game starts and
/// after a round concludes, until a rematch.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TurnState {
    current: Option<Role>,
}

impl TurnState {
    #[must_use]
    pub const fn current(&self) -> Option<Role> {
        self.current
    }

    #[must_use]
    pub fn is_turn_of(&self, role: Role) -> bool {
        self.current == Some(role)
    }

    /// Hand the first move of a round to player A.
    pub fn begin(&mut self) {
        self.current = Some(Role::PlayerA);
    }

    pub fn flip(&mut self) {
        self.current = self.current.map(Role::other);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

/// Cumulative win counts. Survives rematches.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Scores {
    pub player_a: u32,
    pub player_b: u32,
}

impl Scores {
    /// Credit one win to `role` and return its new total.
    pub fn record_win(&mut self, role: Role) -> u32 {
        let score = match role {
            Role::PlayerA => &mut self.player_a,
            Role::PlayerB => &mut self.player_b,
        };
        *score = score.saturating_add(1);
        *score
    }

    /// `(score_a, score_b)`.
    #[must_use]
    pub const fn as_pair(&self) -> (u32, u32) {
        (self.player_a, self.player_b)
    }
}

impl fmt::Display for Scores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X {} - {} O", self.player_a, self.player_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_starts_empty() {
        let turn = TurnState::default();
        assert_eq!(turn.current(), None);
        assert!(!turn.is_turn_of(Role::PlayerA));
    }

    #[test]
    fn test_turn_begin_and_flip() {
        let mut turn = TurnState::default();
        turn.begin();
        assert_eq!(turn.current(), Some(Role::PlayerA));
        turn.flip();
        assert_eq!(turn.current(), Some(Role::PlayerB));
        turn.flip();
        assert!(turn.is_turn_of(Role::PlayerA));
        turn.clear();
        turn.flip();
        assert_eq!(turn.current(), None);
    }

    #[test]
    fn test_record_win() {
        let mut scores = Scores::default();
        assert_eq!(scores.record_win(Role::PlayerB), 1);
        assert_eq!(scores.record_win(Role::PlayerB), 2);
        assert_eq!(scores.record_win(Role::PlayerA), 1);
        assert_eq!(scores.as_pair(), (1, 2));
    }

    #[test]
    fn test_scores_display() {
        let scores = Scores {
            player_a: 3,
            player_b: 1,
        };
        assert_eq!(scores.to_string(), "X 3 - 1 O");
    }
}
