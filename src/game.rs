// src/game.rs
use std::fmt;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{MoveError, RecordError};
use crate::moves::Move;
use crate::piece::{Color, PieceType};
use crate::position::Position;

// --- Legality Helpers (work on any board) ---

/// True if any enemy piece's raw, unfiltered destinations include `color`'s
/// king square. A board without that king is never in check.
fn king_attacked(board: &Board, color: Color) -> bool {
    let Some(king_sq) = board.find_king(color) else {
        return false;
    };
    board
        .pieces_of(color.opponent())
        .any(|(pos, piece)| piece.pseudo_legal_moves(board, pos).iter().any(|mv| mv.end == king_sq))
}

/// Pseudo-legal moves of the piece on `pos` that do not leave its own king
/// attacked once played out on a copy of `board`.
fn legal_moves_on(board: &Board, pos: Position) -> Vec<Move> {
    let Some(piece) = board.get_piece(pos) else {
        return Vec::new();
    };
    piece
        .pseudo_legal_moves(board, pos)
        .into_iter()
        .filter(|mv| {
            let mut trial = board.deep_copy();
            trial.apply_unchecked(mv);
            !king_attacked(&trial, piece.color)
        })
        .collect()
}

fn has_any_legal_move(board: &Board, color: Color) -> bool {
    board.pieces_of(color).any(|(pos, _)| !legal_moves_on(board, pos).is_empty())
}

/// A side with a king and no legal move. Without a king there is neither
/// mate nor stalemate.
fn king_stuck(board: &Board, color: Color) -> bool {
    board.find_king(color).is_some() && !has_any_legal_move(board, color)
}

// --- Game Status ---

/// What a session layer should announce for the current position.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    /// The side to move is in check but has a way out.
    Check(Color),
    Checkmate { winner: Color },
    Stalemate,
    Resigned { winner: Color },
    /// Ended by the session layer without a result on the board.
    Abandoned,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::InProgress | GameStatus::Check(_))
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "In progress"),
            GameStatus::Check(color) => write!(f, "{} is in check!", color),
            GameStatus::Checkmate { winner } => write!(f, "Checkmate! {} wins!", winner),
            GameStatus::Stalemate => write!(f, "Stalemate! The game is a draw."),
            GameStatus::Resigned { winner } => write!(f, "{} resigned. {} wins!", winner.opponent(), winner),
            GameStatus::Abandoned => write!(f, "Game over."),
        }
    }
}

// --- Game State ---

/// One game: the authoritative board plus whose turn it is.
///
/// The board only changes through [`Game::make_move`]. Check, checkmate and
/// stalemate are derived from the board on demand, never stored.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Game {
    current_turn: Color,
    board: Board,
    game_over: bool,
    /// Color that resigned, if any.
    resigned: Option<Color>,
}

impl Default for Game {
    fn default() -> Self { Game::new() }
}

impl Game {
    /// Standard starting position, White to move.
    pub fn new() -> Self {
        Game::from_board(Board::standard(), Color::White)
    }

    /// A game continuing from an arbitrary board.
    pub fn from_board(board: Board, current_turn: Color) -> Self {
        Game { current_turn, board, game_over: false, resigned: None }
    }

    pub fn current_turn(&self) -> Color { self.current_turn }

    pub fn board(&self) -> &Board { &self.board }

    /// Legal moves for the piece on `pos`, whichever color it is. Empty if the
    /// square is empty.
    pub fn legal_moves(&self, pos: Position) -> Vec<Move> {
        legal_moves_on(&self.board, pos)
    }

    /// Legal moves for every piece of `color`.
    pub fn all_legal_moves(&self, color: Color) -> Vec<Move> {
        self.board
            .pieces_of(color)
            .flat_map(|(pos, _)| legal_moves_on(&self.board, pos))
            .collect()
    }

    /// Plays `mv` for the side to move and returns the updated board.
    ///
    /// On any error nothing has changed.
    pub fn make_move(&mut self, mv: Move) -> Result<&Board, MoveError> {
        if let Err(e) = self.validate(&mv) {
            trace!("rejected {}: {}", mv, e);
            return Err(e);
        }

        let mover = self.current_turn;
        self.board.apply_unchecked(&mv);
        self.current_turn = mover.opponent();
        debug!("{} played {}", mover, mv);
        Ok(&self.board)
    }

    fn validate(&self, mv: &Move) -> Result<(), MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        let piece = self.board.get_piece(mv.start).ok_or(MoveError::NoPiece(mv.start))?;
        if piece.color != self.current_turn {
            return Err(MoveError::WrongTurn { expected: self.current_turn, found: piece.color });
        }

        let legal = self.legal_moves(mv.start);
        if legal.contains(mv) {
            return Ok(());
        }
        // A bare pawn move onto the last rank is incomplete rather than illegal.
        if mv.promotion.is_none() && legal.contains(&mv.with_promotion(Some(PieceType::Queen))) {
            return Err(MoveError::PromotionRequired(*mv));
        }
        Err(MoveError::IllegalMove(*mv))
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        king_attacked(&self.board, color)
    }

    pub fn is_in_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && king_stuck(&self.board, color)
    }

    /// False when `color` has no king on the board.
    pub fn is_in_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && king_stuck(&self.board, color)
    }

    /// Either color mated or stalemated, a resignation, or an external end.
    pub fn is_game_over(&self) -> bool {
        self.game_over
            || self.resigned.is_some()
            || [Color::White, Color::Black]
                .iter()
                .any(|&c| king_stuck(&self.board, c))
    }

    /// Records that `color` resigned. Fails if the game had already ended.
    pub fn resign(&mut self, color: Color) -> Result<(), MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        debug!("{} resigned", color);
        self.resigned = Some(color);
        self.game_over = true;
        Ok(())
    }

    /// Marks the game finished without a winner, e.g. when a session closes it.
    pub fn end(&mut self) {
        debug!("game ended externally");
        self.game_over = true;
    }

    pub fn status(&self) -> GameStatus {
        if let Some(loser) = self.resigned {
            return GameStatus::Resigned { winner: loser.opponent() };
        }
        if self.game_over {
            return GameStatus::Abandoned;
        }
        let turn = self.current_turn;
        for color in [turn, turn.opponent()] {
            if self.is_in_checkmate(color) {
                return GameStatus::Checkmate { winner: color.opponent() };
            }
        }
        if self.is_in_stalemate(turn) || self.is_in_stalemate(turn.opponent()) {
            return GameStatus::Stalemate;
        }
        if self.is_in_check(turn) {
            return GameStatus::Check(turn);
        }
        GameStatus::InProgress
    }

    // --- Snapshots ---

    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board)?;
        write!(f, "Turn: {}", self.current_turn)
    }
}
