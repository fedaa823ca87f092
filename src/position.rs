//! A Connect 4 position stored relative to the player about to move
//!
//! Every cell holds [`CURRENT`] (a tile of the player about to move), [`OPPONENT`]
//! (a tile of the player who moved last) or [`EMPTY`]. After each move all signs are
//! inverted, so `+1` always means "the player to move" and never "player one". The
//! search scores positions from the mover's point of view and depends on this.

use std::fmt;
use std::str::FromStr;

use crate::{
    error::{IllegalInputKind, PositionError},
    HEIGHT, WIDTH,
};

/// A tile belonging to the player about to move
pub const CURRENT: i8 = 1;
/// A tile belonging to the player who made the last move
pub const OPPONENT: i8 = -1;
/// An unoccupied cell
pub const EMPTY: i8 = 0;

// directions checked for alignments as (column step, row step),
// the opposite direction of each axis is walked as well
const AXES: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Position {
    // cells are indexed [column][row], row 0 is the bottom of the board
    board: [[i8; HEIGHT]; WIDTH],
    heights: [usize; WIDTH],
    num_moves: usize,
}

impl Position {
    /// Creates an empty board
    pub fn new() -> Self {
        Self {
            board: [[EMPTY; HEIGHT]; WIDTH],
            heights: [0; WIDTH],
            num_moves: 0,
        }
    }

    /// Replays a string of 1-indexed columns, one character per move, from an empty board
    ///
    /// Move strings come from outside the program, so a full column is reported as
    /// [`PositionError::IllegalInput`] instead of reaching the `play` precondition.
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self, PositionError> {
        let mut position = Self::new();

        for (offset, column_char) in moves.as_ref().chars().enumerate() {
            let column = match column_char.to_digit(10).map(|c| c as usize) {
                Some(column @ 1..=WIDTH) => column - 1,
                _ => {
                    return Err(PositionError::IllegalInput {
                        offset,
                        kind: IllegalInputKind::NotAColumn(column_char),
                    })
                }
            };
            if !position.playable(column) {
                return Err(PositionError::IllegalInput {
                    offset,
                    kind: IllegalInputKind::ColumnFull(column),
                });
            }
            position.play_unchecked(column);
        }
        Ok(position)
    }

    /// Indicates whether a tile can be dropped into `column` (0-indexed)
    pub fn can_play(&self, column: usize) -> Result<bool, PositionError> {
        if column >= WIDTH {
            return Err(PositionError::InvalidColumn { column });
        }
        Ok(self.playable(column))
    }

    /// Drops a tile of the player to move into `column` (0-indexed), then hands the turn over
    pub fn play(&mut self, column: usize) -> Result<(), PositionError> {
        if !self.can_play(column)? {
            return Err(PositionError::ColumnFull { column });
        }
        self.play_unchecked(column);
        Ok(())
    }

    /// Whether the player to move completes four in a row by playing `column`
    ///
    /// # Panics
    /// Panics if `column` is out of range or full. Callers gate this with [`can_play`].
    ///
    /// [`can_play`]: Position::can_play
    pub fn is_winning_move(&self, column: usize) -> bool {
        assert!(self.playable(column), "column {} is not playable", column);
        let row = self.heights[column];

        // the candidate tile is the fourth, so three neighbours along one axis win
        AXES.iter().any(|&(dx, dy)| {
            self.run_length(column, row, dx, dy) + self.run_length(column, row, -dx, -dy) >= 3
        })
    }

    /// The tile at `(column, row)`: [`CURRENT`], [`OPPONENT`] or [`EMPTY`]
    pub fn cell(&self, column: usize, row: usize) -> i8 {
        self.board[column][row]
    }

    pub fn height(&self, column: usize) -> usize {
        self.heights[column]
    }

    pub fn heights(&self) -> [usize; WIDTH] {
        self.heights
    }

    /// Number of tiles played so far
    pub fn num_moves(&self) -> usize {
        self.num_moves
    }

    pub fn is_full(&self) -> bool {
        self.num_moves == WIDTH * HEIGHT
    }

    pub(crate) fn playable(&self, column: usize) -> bool {
        self.heights[column] < HEIGHT
    }

    pub(crate) fn play_unchecked(&mut self, column: usize) {
        assert!(self.playable(column), "column {} is full", column);
        self.board[column][self.heights[column]] = CURRENT;
        self.heights[column] += 1;
        self.num_moves += 1;
        self.flip();
    }

    // swap the perspective so the next player owns the positive tiles
    fn flip(&mut self) {
        for column in self.board.iter_mut() {
            for cell in column.iter_mut() {
                *cell = -*cell;
            }
        }
    }

    // count contiguous tiles of the player to move, starting next to (column, row)
    fn run_length(&self, column: usize, row: usize, dx: isize, dy: isize) -> usize {
        let mut x = column as isize + dx;
        let mut y = row as isize + dy;
        let mut run = 0;
        while x >= 0
            && x < WIDTH as isize
            && y >= 0
            && y < HEIGHT as isize
            && self.board[x as usize][y as usize] == CURRENT
        {
            run += 1;
            x += dx;
            y += dy;
        }
        run
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for Position {
    type Err = PositionError;

    fn from_str(moves: &str) -> Result<Self, Self::Err> {
        Self::from_moves(moves)
    }
}

/// Draws the board top row first, `+` for the player to move and `-` for the other player
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..HEIGHT).rev() {
            write!(f, "|")?;
            for column in 0..WIDTH {
                let tile = match self.board[column][row] {
                    CURRENT => '+',
                    OPPONENT => '-',
                    _ => ' ',
                };
                write!(f, "{}|", tile)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
