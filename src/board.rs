// src/board.rs
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::moves::Move;
use crate::piece::{Color, Piece, PieceType};
use crate::position::Position;

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook, PieceType::Knight, PieceType::Bishop, PieceType::Queen,
    PieceType::King, PieceType::Bishop, PieceType::Knight, PieceType::Rook,
];

/// Raw piece storage: 64 cells, each empty or holding one piece.
///
/// The board knows nothing about legality. `Clone` is a full deep copy, and
/// equality compares cell by cell.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// `cells[row - 1][col - 1]`, row 1 first.
    cells: [[Option<Piece>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self { Board::empty() }
}

impl Board {
    pub fn empty() -> Self {
        Board { cells: [[None; 8]; 8] }
    }

    /// A board in the standard opening layout.
    pub fn standard() -> Self {
        let mut board = Board::empty();
        board.reset_to_start();
        board
    }

    pub fn get_piece(&self, pos: Position) -> Option<Piece> {
        let (r, c) = pos.index();
        self.cells[r][c]
    }

    /// Unconditional write. Callers validate legality first.
    pub fn set_piece(&mut self, pos: Position, piece: Option<Piece>) {
        let (r, c) = pos.index();
        self.cells[r][c] = piece;
    }

    /// Clears the board and sets up the standard opening position.
    pub fn reset_to_start(&mut self) {
        self.cells = [[None; 8]; 8];
        for (col, kind) in BACK_RANK.iter().enumerate() {
            self.cells[0][col] = Some(Piece::new(Color::White, *kind));
            self.cells[1][col] = Some(Piece::new(Color::White, PieceType::Pawn));
            self.cells[6][col] = Some(Piece::new(Color::Black, PieceType::Pawn));
            self.cells[7][col] = Some(Piece::new(Color::Black, *kind));
        }
    }

    /// An independent copy for speculative simulation.
    pub fn deep_copy(&self) -> Board {
        self.clone()
    }

    /// Moves whatever stands on `mv.start` to `mv.end`, replacing it with the
    /// promotion piece when one is named. No legality checks.
    pub(crate) fn apply_unchecked(&mut self, mv: &Move) {
        let moving = self.get_piece(mv.start);
        let placed = match (moving, mv.promotion) {
            (Some(piece), Some(kind)) => Some(Piece::new(piece.color, kind)),
            (piece, _) => piece,
        };
        self.set_piece(mv.end, placed);
        self.set_piece(mv.start, None);
    }

    /// Every occupied square with its piece, row by row from a1.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(move |pos| self.get_piece(pos).map(|p| (pos, p)))
    }

    /// Squares holding a piece of `color`, found by scanning the board.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    /// First square holding `color`'s king, if any.
    pub fn find_king(&self, color: Color) -> Option<Position> {
        self.pieces_of(color)
            .find(|(_, p)| p.kind == PieceType::King)
            .map(|(pos, _)| pos)
    }

    // --- Placement Notation ---

    /// Builds a board from the piece-placement field of a FEN string,
    /// e.g. `"rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"`.
    pub fn from_placement(placement: &str) -> Result<Self, ParseError> {
        let ranks: Vec<&str> = placement.trim().split('/').collect();
        if ranks.len() != 8 {
            return Err(ParseError::InvalidPlacement(format!("expected 8 ranks, found {}", ranks.len())));
        }

        let mut board = Board::empty();
        for (i, rank_str) in ranks.iter().enumerate() {
            let row = 7 - i; // First rank listed is rank 8
            let mut col = 0usize;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(ParseError::InvalidPlacement(format!("bad empty-square count '{}'", c)));
                    }
                    col += skip as usize;
                } else {
                    let piece = Piece::from_char(c)
                        .ok_or_else(|| ParseError::InvalidPlacement(format!("unknown piece '{}'", c)))?;
                    if col >= 8 {
                        return Err(ParseError::InvalidPlacement(format!("rank {} is too long", row + 1)));
                    }
                    board.cells[row][col] = Some(piece);
                    col += 1;
                }
            }
            if col != 8 {
                return Err(ParseError::InvalidPlacement(format!("rank {} covers {} squares", row + 1, col)));
            }
        }
        Ok(board)
    }

    /// The inverse of [`Board::from_placement`].
    pub fn to_placement(&self) -> String {
        let mut out = String::with_capacity(71);
        for row in (0..8).rev() {
            let mut empty_run = 0;
            for col in 0..8 {
                match self.cells[row][col] {
                    Some(piece) => {
                        if empty_run > 0 {
                            out.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        out.push_str(&piece.to_string());
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 { out.push_str(&empty_run.to_string()); }
            if row > 0 { out.push('/'); }
        }
        out
    }

    // --- Text Rendering ---

    /// ASCII diagram with the given empty squares drawn as `*` instead of `.`.
    /// Occupied highlighted squares (captures) keep their piece letter.
    pub fn render_highlighted(&self, highlights: &[Position]) -> String {
        let mut out = String::new();
        out.push_str("  +-----------------+\n");
        for row in (1..=8u8).rev() {
            out.push_str(&format!("{} | ", row));
            for pos in Position::all().filter(|p| p.row() == row) {
                let cell = match self.get_piece(pos) {
                    Some(piece) => piece.to_string(),
                    None if highlights.contains(&pos) => "*".to_string(),
                    None => ".".to_string(),
                };
                out.push_str(&cell);
                out.push(' ');
            }
            out.push_str("|\n");
        }
        out.push_str("  +-----------------+\n");
        out.push_str("    a b c d e f g h");
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render_highlighted(&[]))
    }
}
