//! Errors raised while building or querying a [`Position`](crate::position::Position)

use thiserror::Error;

use crate::WIDTH;

/// Why a move string was rejected
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum IllegalInputKind {
    #[error("could not parse '{0}' as a column between 1 and {}", WIDTH)]
    NotAColumn(char),
    /// The column is zero-based
    #[error("column {} is already full", .0 + 1)]
    ColumnFull(usize),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum PositionError {
    /// A column index outside `0..WIDTH` was passed to a legality query
    #[error("column {column} out of range, columns must be between 0 and {}", WIDTH - 1)]
    InvalidColumn { column: usize },

    /// `play` was asked to drop a tile into a full column
    #[error("column {column} is full")]
    ColumnFull { column: usize },

    /// A move string could not be replayed, `offset` is the index of the offending move
    #[error("illegal move string at offset {offset}: {kind}")]
    IllegalInput {
        offset: usize,
        kind: IllegalInputKind,
    },
}
