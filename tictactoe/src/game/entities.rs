use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::constants::{self, BOARD_SIZE};

/// One of the two fixed player identities of a session.
///
/// The first participant to connect plays [`Role::PlayerA`] (crosses) and
/// always moves first; the second plays [`Role::PlayerB`] (circles).
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Role {
    PlayerA,
    PlayerB,
}

impl Role {
    /// Both roles in connection order.
    pub const ALL: [Role; 2] = [Role::PlayerA, Role::PlayerB];

    /// The opposing role.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::PlayerA => Self::PlayerB,
            Self::PlayerB => Self::PlayerA,
        }
    }

    /// Board symbol used when rendering this role's pieces.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::PlayerA => 'X',
            Self::PlayerB => 'O',
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::PlayerA => "player A",
            Self::PlayerB => "player B",
        };
        write!(f, "{repr}")
    }
}

/// State of a single board cell.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Cell {
    #[default]
    Empty,
    PlayerA,
    PlayerB,
}

impl Cell {
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The role whose piece occupies this cell, if any.
    #[must_use]
    pub const fn owner(self) -> Option<Role> {
        match self {
            Self::Empty => None,
            Self::PlayerA => Some(Role::PlayerA),
            Self::PlayerB => Some(Role::PlayerB),
        }
    }
}

impl From<Role> for Cell {
    fn from(value: Role) -> Self {
        match value {
            Role::PlayerA => Self::PlayerA,
            Role::PlayerB => Self::PlayerB,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.owner() {
            Some(role) => write!(f, "{}", role.symbol()),
            None => write!(f, "."),
        }
    }
}

/// A `(row, col)` position on the board.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub const fn is_on_board(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Direction of a winning line.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
    /// Top-left to bottom-right.
    DiagonalA,
    /// Top-right to bottom-left.
    DiagonalB,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::DiagonalA => "diagonal",
            Self::DiagonalB => "anti-diagonal",
        };
        write!(f, "{repr}")
    }
}

/// A participant's display name. Only passed through to presentation.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(s: &str) -> Self {
        let mut name: String = s
            .trim()
            .chars()
            .map(|c| if c.is_ascii_whitespace() { '_' } else { c })
            .collect();
        if name.len() > constants::MAX_NAME_LENGTH {
            let mut end = constants::MAX_NAME_LENGTH;
            while !name.is_char_boundary(end) {
                end -= 1;
            }
            name.truncate(end);
        }
        Self(name)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for DisplayName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

impl From<String> for DisplayName {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for DisplayName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
