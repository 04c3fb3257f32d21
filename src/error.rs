// src/error.rs
use std::io;

use thiserror::Error;

use crate::moves::Move;
use crate::piece::Color;
use crate::position::Position;

/// Raised when a row or column falls outside `1..=8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("Illegal position: row {row}, column {col}. Both must be within 1..=8.")]
    IllegalPosition { row: u8, col: u8 },
}

/// Why `Game::make_move` (or `Game::resign`) refused to act.
///
/// Every variant is produced before the board is touched, so a caller that
/// receives one can assume the game is exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("The game is already over.")]
    GameOver,
    #[error("No piece found at {0}")]
    NoPiece(Position),
    #[error("It's {expected:?}'s turn, but the piece belongs to {found:?}.")]
    WrongTurn { expected: Color, found: Color },
    #[error("Move '{0}' reaches the last rank and must name a promotion piece (q, r, b, n).")]
    PromotionRequired(Move),
    #[error("Illegal move: '{0}'")]
    IllegalMove(Move),
}

/// Notation failures: squares, moves and board placement strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Invalid square: '{0}'. Use a file a-h followed by a rank 1-8, e.g. 'e4'.")]
    InvalidSquare(String),
    #[error("Invalid move format: '{0}'. Use a format like 'e2e4' or 'a7a8q'.")]
    InvalidMove(String),
    #[error("Invalid promotion character: '{0}'. Use q, r, b, or n.")]
    InvalidPromotion(char),
    #[error("Invalid piece placement: {0}")]
    InvalidPlacement(String),
}

/// Failures while saving or loading a game record or snapshot.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("I/O error with file '{0}': {1}")]
    Io(String, #[source] io::Error),
}
