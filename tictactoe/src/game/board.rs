//! The 3x3 board model.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::{
    constants::BOARD_SIZE,
    entities::{Cell, Coord},
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum BoardError {
    #[error("({row}, {col}) is off the board")]
    OutOfRange { row: usize, col: usize },
}

/// Fixed-size grid of cells.
///
/// The board only stores cells. Whether a write is legal (empty target,
/// right player's turn) is decided by the game state machine, which is the
/// only writer.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the cell at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::OutOfRange`] if either coordinate is not in `[0, 3)`.
    pub fn get(&self, row: usize, col: usize) -> Result<Cell, BoardError> {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .ok_or(BoardError::OutOfRange { row, col })
    }

    /// Write `cell` at `(row, col)` regardless of what was there.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::OutOfRange`] if either coordinate is not in `[0, 3)`.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Result<(), BoardError> {
        let slot = self
            .cells
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(BoardError::OutOfRange { row, col })?;
        *slot = cell;
        Ok(())
    }

    /// Cell at an on-board coordinate. Off-board coordinates read as empty.
    #[must_use]
    pub fn cell(&self, coord: Coord) -> Cell {
        self.get(coord.row, coord.col).unwrap_or_default()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|cell| !cell.is_empty())
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| !cell.is_empty()).count()
    }

    pub fn reset(&mut self) {
        self.cells = Default::default();
    }

    /// Rows of the board, top to bottom.
    #[must_use]
    pub fn rows(&self) -> &[[Cell; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f, "-+-+-")?;
            }
            writeln!(f, "{}|{}|{}", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.occupied(), 0);
        assert!(!board.is_full());
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                assert_eq!(board.get(row, col), Ok(Cell::Empty));
            }
        }
    }

    #[test]
    fn test_get_out_of_range() {
        let board = Board::new();
        assert_eq!(board.get(3, 0), Err(BoardError::OutOfRange { row: 3, col: 0 }));
        assert_eq!(board.get(0, 3), Err(BoardError::OutOfRange { row: 0, col: 3 }));
        assert_eq!(
            board.get(usize::MAX, usize::MAX),
            Err(BoardError::OutOfRange {
                row: usize::MAX,
                col: usize::MAX
            })
        );
    }

    #[test]
    fn test_set_out_of_range_leaves_board_untouched() {
        let mut board = Board::new();
        assert!(board.set(1, 5, Cell::PlayerA).is_err());
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_set_is_unconditional() {
        let mut board = Board::new();
        board.set(1, 1, Cell::PlayerA).unwrap();
        board.set(1, 1, Cell::PlayerB).unwrap();
        assert_eq!(board.get(1, 1), Ok(Cell::PlayerB));
    }

    #[test]
    fn test_is_full() {
        let mut board = Board::new();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                assert!(!board.is_full());
                board.set(row, col, Cell::PlayerA).unwrap();
            }
        }
        assert!(board.is_full());
        assert_eq!(board.occupied(), 9);
    }

    #[test]
    fn test_reset() {
        let mut board = Board::new();
        board.set(0, 0, Cell::PlayerA).unwrap();
        board.set(2, 1, Cell::PlayerB).unwrap();
        board.reset();
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_display() {
        let mut board = Board::new();
        board.set(0, 0, Cell::PlayerA).unwrap();
        board.set(1, 1, Cell::PlayerB).unwrap();
        assert_eq!(board.to_string(), "X|.|.\n-+-+-\n.|O|.\n-+-+-\n.|.|.\n");
    }
}
