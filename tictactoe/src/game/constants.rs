//! Fixed dimensions and limits of the game.

/// Number of rows and columns on the board.
pub const BOARD_SIZE: usize = 3;

/// Number of cells on the board.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Number of winning lines on a 3x3 board (3 rows, 3 columns, 2 diagonals).
pub const WIN_LINE_COUNT: usize = 8;

/// Number of participants in a session.
pub const MAX_PARTICIPANTS: usize = 2;

/// Maximum length of a participant's display name.
pub const MAX_NAME_LENGTH: usize = 32;
