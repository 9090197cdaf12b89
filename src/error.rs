//! Error types shared across the engine.

use thiserror::Error;

use crate::board::Point;

/// Problems building a board from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("unsupported board size {0} (expected 3..=19)")]
    InvalidSize(usize),
    #[error("row {row} has {len} points, expected {expected}")]
    RaggedRow { row: usize, len: usize, expected: usize },
    #[error("unknown glyph {glyph:?} at ({x}, {y})")]
    UnknownGlyph { glyph: char, x: usize, y: usize },
}

/// Reasons a placement is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("the game is over")]
    GameOver,
    #[error("it is not this player's turn")]
    NotYourTurn,
    #[error("point {0:?} is off the board")]
    OffBoard(Point),
    #[error("point {0:?} is an offline node")]
    Offline(Point),
    #[error("point {0:?} is not empty")]
    Occupied(Point),
    #[error("playing at {0:?} would be suicide")]
    Suicide(Point),
    #[error("playing at {0:?} repeats an earlier position")]
    Repeat(Point),
}

#[derive(Debug, Error)]
pub enum GoError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Move(#[from] MoveError),
}
