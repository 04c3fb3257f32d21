// src/lib.rs
//! Chess rules engine: board state, legal move generation, move execution
//! (with promotion) and check, checkmate and stalemate detection.
//!
//! Castling, en passant, repetition and move-count draws, and clocks are not
//! part of these rules.

pub mod board;
pub mod error;
pub mod game;
pub mod moves;
pub mod piece;
pub mod position;
pub mod record;

pub use board::Board;
pub use error::{MoveError, ParseError, PositionError, RecordError};
pub use game::{Game, GameStatus};
pub use moves::Move;
pub use piece::{Color, Piece, PieceType, PROMOTION_CHOICES};
pub use position::Position;
pub use record::{GameRecord, MoveRecord};
