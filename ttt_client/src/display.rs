//! Terminal rendering of the session view.

use std::fmt::Write;
use tictactoe::{GameEvent, GamePhase, Role, SessionView};

/// Name to show for a role: the participant's display name when known.
fn label(view: &SessionView, role: Role) -> String {
    match view.name_of(role) {
        Some(name) => format!("{name} ({})", role.symbol()),
        None => format!("{role} ({})", role.symbol()),
    }
}

/// Board with row/column indices, scores and whose turn it is.
pub fn render(view: &SessionView) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "    0 1 2");
    for (i, row) in view.board().rows().iter().enumerate() {
        let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
        let _ = writeln!(out, "{i}   {}", cells.join("|"));
        if i + 1 < row.len() {
            let _ = writeln!(out, "    -+-+-");
        }
    }

    let (score_a, score_b) = view.scores();
    let _ = writeln!(
        out,
        "\nScore: {} {} - {} {}",
        label(view, Role::PlayerA),
        score_a,
        score_b,
        label(view, Role::PlayerB)
    );

    let status = match view.phase() {
        GamePhase::WaitingForPlayers => "Waiting for an opponent...".to_string(),
        GamePhase::InProgress if view.is_my_turn() => "Your move.".to_string(),
        GamePhase::InProgress => match view.current_turn() {
            Some(role) => format!("Waiting for {}...", label(view, role)),
            None => String::new(),
        },
        GamePhase::Won => match view.last_win() {
            Some((_, role)) if *role == view.local_role() => {
                "You won! Type 'rematch' to play again.".to_string()
            }
            Some((_, role)) => format!(
                "{} won. Type 'rematch' to play again.",
                label(view, *role)
            ),
            None => "Round over. Type 'rematch' to play again.".to_string(),
        },
        GamePhase::Tied => "It's a tie. Type 'rematch' to play again.".to_string(),
    };
    let _ = write!(out, "{status}");

    out
}

/// One line narrating an event, for the events worth narrating.
pub fn describe_event(view: &SessionView, event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::GameStarted => Some("Both players are here. Game on!".to_string()),
        GameEvent::Rematch => Some("New round.".to_string()),
        GameEvent::ObjectPlaced { row, col, role } => {
            Some(format!("{} played ({row}, {col})", label(view, *role)))
        }
        GameEvent::GameWon { line, role } => Some(format!(
            "{} wins with the {} (center {})",
            label(view, *role),
            line,
            line.center
        )),
        GameEvent::GameTied => Some("Board full, no line.".to_string()),
        GameEvent::TurnChanged(_) | GameEvent::ScoreChanged(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tictactoe::{
        GameStateMachine,
        session::{Participant, SessionSnapshot},
    };

    fn view_after(moves: &[(Role, usize, usize)], local: Role) -> SessionView {
        let mut game = GameStateMachine::new();
        let snapshot = SessionSnapshot {
            session_id: 1,
            name: "Session 1".to_string(),
            game: game.snapshot(),
            participants: vec![
                Participant {
                    role: Role::PlayerA,
                    name: "alice".into(),
                },
                Participant {
                    role: Role::PlayerB,
                    name: "bob".into(),
                },
            ],
        };
        let mut view = SessionView::from_welcome(local, &snapshot);

        game.start();
        for &(role, row, col) in moves {
            game.submit_move(role, row, col).unwrap();
        }
        for event in game.drain_events() {
            view.apply(&event);
        }
        view
    }

    #[test]
    fn test_render_board_and_turn() {
        let view = view_after(&[(Role::PlayerA, 1, 1)], Role::PlayerB);
        let out = render(&view);
        assert!(out.contains("1   .|X|."));
        assert!(out.contains("Score: alice (X) 0 - 0 bob (O)"));
        assert!(out.ends_with("Your move."));
    }

    #[test]
    fn test_render_win() {
        let view = view_after(
            &[
                (Role::PlayerA, 0, 0),
                (Role::PlayerB, 1, 0),
                (Role::PlayerA, 0, 1),
                (Role::PlayerB, 1, 1),
                (Role::PlayerA, 0, 2),
            ],
            Role::PlayerB,
        );
        let out = render(&view);
        assert!(out.contains("0   X|X|X"));
        assert!(out.contains("alice (X) 1 - 0 bob (O)"));
        assert!(out.contains("alice (X) won"));
    }

    #[test]
    fn test_describe_event() {
        let view = view_after(&[], Role::PlayerA);
        let placed = GameEvent::ObjectPlaced {
            row: 2,
            col: 0,
            role: Role::PlayerB,
        };
        assert_eq!(
            describe_event(&view, &placed).as_deref(),
            Some("bob (O) played (2, 0)")
        );
        assert_eq!(describe_event(&view, &GameEvent::TurnChanged(None)), None);
    }
}
