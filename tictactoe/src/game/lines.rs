//! Catalog of winning lines and win detection.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    board::Board,
    constants::{BOARD_SIZE, WIN_LINE_COUNT},
    entities::{Coord, Orientation, Role},
};

/// Three cells forming a row, column, or diagonal.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct WinLine {
    pub cells: [Coord; 3],
    /// Middle cell of the line. The winner is read from here.
    pub center: Coord,
    pub orientation: Orientation,
}

impl WinLine {
    fn new(cells: [Coord; 3], orientation: Orientation) -> Self {
        Self {
            cells,
            center: cells[1],
            orientation,
        }
    }

    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains(&coord)
    }

    /// The role holding all three cells of this line on `board`, if any.
    #[must_use]
    pub fn winner(&self, board: &Board) -> Option<Role> {
        let [a, b, c] = self.cells.map(|coord| board.cell(coord));
        if a.is_empty() || a != b || b != c {
            return None;
        }
        board.cell(self.center).owner()
    }
}

impl fmt::Display for WinLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.cells;
        write!(f, "{} line {a} {b} {c}", self.orientation)
    }
}

/// The immutable set of 8 winning lines, in a fixed order: rows top to
/// bottom, columns left to right, then the two diagonals.
#[derive(Clone, Debug)]
pub struct LineCatalog {
    lines: Vec<WinLine>,
}

impl Default for LineCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl LineCatalog {
    #[must_use]
    pub fn new() -> Self {
        let mut lines = Vec::with_capacity(WIN_LINE_COUNT);

        for row in 0..BOARD_SIZE {
            lines.push(WinLine::new(
                [Coord::new(row, 0), Coord::new(row, 1), Coord::new(row, 2)],
                Orientation::Horizontal,
            ));
        }

        for col in 0..BOARD_SIZE {
            lines.push(WinLine::new(
                [Coord::new(0, col), Coord::new(1, col), Coord::new(2, col)],
                Orientation::Vertical,
            ));
        }

        lines.push(WinLine::new(
            [Coord::new(0, 0), Coord::new(1, 1), Coord::new(2, 2)],
            Orientation::DiagonalA,
        ));
        lines.push(WinLine::new(
            [Coord::new(0, 2), Coord::new(1, 1), Coord::new(2, 0)],
            Orientation::DiagonalB,
        ));

        Self { lines }
    }

    #[must_use]
    pub fn lines(&self) -> &[WinLine] {
        &self.lines
    }

    /// First line in catalog order that is completely held by one role.
    ///
    /// Ordering only matters for boards that were never reachable through
    /// legal play, but it is still deterministic.
    #[must_use]
    pub fn find_winning_line(&self, board: &Board) -> Option<(&WinLine, Role)> {
        self.lines
            .iter()
            .find_map(|line| line.winner(board).map(|role| (line, role)))
    }
}
