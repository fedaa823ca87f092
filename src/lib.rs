//! A reference solver for the board game 'Connect 4'
//!
//! The solver scores a position with an exhaustive depth-first negamax search,
//! pruned with alpha-beta and a fixed center-out move ordering. It deliberately
//! carries no transposition table, bitboard or opening book, so that every
//! score it reports can be traced back to a plain game tree.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_negamax::{position::Position, solver::Solver};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let mut solver = Solver::new(Position::from_moves("2252576253462244111563365343671351441")?);
//! let score = solver.solve();
//!
//! assert_eq!(score, -1);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod error;

pub mod position;

pub mod solver;

pub mod driver;

pub mod benchmark;

mod test;

pub use error::{IllegalInputKind, PositionError};
pub use position::Position;
pub use solver::Solver;

/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

// every column must be writable as a single digit of a move string
const_assert!(WIDTH >= 1 && WIDTH <= 9);
// a run of four has to fit on the board in at least one direction
const_assert!(WIDTH >= 4 || HEIGHT >= 4);
// the score window [-N/2, N/2] is only symmetric for an even number of cells
const_assert!((WIDTH * HEIGHT) % 2 == 0);
