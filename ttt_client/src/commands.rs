use std::fmt;
use tictactoe::messages::SessionCommand;

/// A line typed by the participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    Move { row: usize, col: usize },
    Rematch,
    Help,
    Quit,
}

impl ClientCommand {
    /// The wire command to send, if this one goes to the server at all.
    pub fn to_session_command(&self) -> Option<SessionCommand> {
        match self {
            Self::Move { row, col } => Some(SessionCommand::Move {
                row: *row,
                col: *col,
            }),
            Self::Rematch => Some(SessionCommand::Rematch),
            Self::Quit => Some(SessionCommand::Disconnect),
            Self::Help => None,
        }
    }
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// `move` without both coordinates.
    MissingCoordinates,
    /// A coordinate that isn't a non-negative number.
    InvalidCoordinate(String),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCoordinates => {
                write!(f, "Move requires a row and a column (e.g., 'move 1 2')")
            }
            Self::InvalidCoordinate(value) => write!(
                f,
                "Invalid coordinate '{}'. Rows and columns are numbers from 0 to 2",
                value
            ),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

pub const HELP_TEXT: &str = "\
Available commands:
  move ROW COL   Place your piece (rows and columns 0-2), also 'm ROW COL'
  rematch        Start a new round once the current one is over
  help           Show this message
  quit           Leave the session";

/// Parse a command string into a ClientCommand.
///
/// Coordinates are not range checked; the server ignores moves off the
/// board like any other illegal move.
///
/// # Examples
///
/// ```
/// use ttt_client::commands::{ClientCommand, parse_command};
///
/// assert_eq!(parse_command("m 0 2"), Ok(ClientCommand::Move { row: 0, col: 2 }));
/// assert_eq!(parse_command("rematch"), Ok(ClientCommand::Rematch));
/// ```
pub fn parse_command(input: &str) -> Result<ClientCommand, ParseError> {
    let trimmed = input.trim();

    // Try single-word commands first
    match trimmed.to_lowercase().as_str() {
        "rematch" | "r" => return Ok(ClientCommand::Rematch),
        "help" | "?" => return Ok(ClientCommand::Help),
        "quit" | "exit" | "q" => return Ok(ClientCommand::Quit),
        _ => {}
    }

    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();
    match parts.first().map(|p| p.to_lowercase()) {
        Some(cmd) if cmd == "move" || cmd == "m" => parse_move_command(&parts),
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

/// Parse a move command: "move ROW COL"
fn parse_move_command(parts: &[&str]) -> Result<ClientCommand, ParseError> {
    match (parts.get(1), parts.get(2)) {
        (Some(row), Some(col)) => Ok(ClientCommand::Move {
            row: parse_coordinate(row)?,
            col: parse_coordinate(col)?,
        }),
        _ => Err(ParseError::MissingCoordinates),
    }
}

fn parse_coordinate(value: &str) -> Result<usize, ParseError> {
    value
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidCoordinate(value.to_string()))
}
