// src/piece.rs
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::moves::Move;
use crate::position::Position;

// --- Movement Tables ---

const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2), (1, -2), (-1, 2), (-1, -2),
    (2, 1), (2, -1), (-2, 1), (-2, -1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (1, -1), (1, 0), (1, 1),
    (0, -1),         (0, 1),
    (-1, -1), (-1, 0), (-1, 1),
];

/// Pieces a pawn may become on the last rank, in the order they are generated.
pub const PROMOTION_CHOICES: [PieceType; 4] =
    [PieceType::Queen, PieceType::Rook, PieceType::Bishop, PieceType::Knight];

// --- Enums and Basic Structs ---

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color { White, Black }

impl Color {
    pub fn opponent(&self) -> Color {
        match self { Color::White => Color::Black, Color::Black => Color::White }
    }

    /// Row direction pawns of this color advance in.
    pub fn forward(&self) -> i8 {
        match self { Color::White => 1, Color::Black => -1 }
    }

    /// Rank pawns of this color start on (and may double-step from).
    pub fn pawn_home_row(&self) -> u8 {
        match self { Color::White => 2, Color::Black => 7 }
    }

    /// Rank on which pawns of this color promote.
    pub fn promotion_row(&self) -> u8 {
        match self { Color::White => 8, Color::Black => 1 }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Color::White => write!(f, "White"), Color::Black => write!(f, "Black") }
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum PieceType { King, Queen, Rook, Bishop, Knight, Pawn }

impl PieceType {
    /// Lower-case letter used in move and placement notation.
    pub fn symbol(&self) -> char {
        match self {
            PieceType::Pawn => 'p', PieceType::Knight => 'n', PieceType::Bishop => 'b',
            PieceType::Rook => 'r', PieceType::Queen => 'q', PieceType::King => 'k',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn), 'n' => Some(PieceType::Knight), 'b' => Some(PieceType::Bishop),
            'r' => Some(PieceType::Rook), 'q' => Some(PieceType::Queen), 'k' => Some(PieceType::King),
            _ => None,
        }
    }
}

/// A colored piece. Carries no position: where it stands is the board's business.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
}

impl Piece {
    pub fn new(color: Color, kind: PieceType) -> Self { Piece { color, kind } }

    /// Upper case is white, lower case is black (FEN convention).
    pub fn from_char(c: char) -> Option<Self> {
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        PieceType::from_symbol(c).map(|kind| Piece::new(color, kind))
    }

    // --- Pseudo-Legal Move Generation ---

    /// Every destination this piece could reach from `from` on `board` by its
    /// movement, blocking and capture rules. Whether the move exposes the
    /// mover's own king is not considered here.
    pub fn pseudo_legal_moves(&self, board: &Board, from: Position) -> Vec<Move> {
        let mut moves = Vec::with_capacity(28);
        match self.kind {
            PieceType::Rook => self.sliding_moves(board, from, &ORTHOGONALS, &mut moves),
            PieceType::Bishop => self.sliding_moves(board, from, &DIAGONALS, &mut moves),
            PieceType::Queen => {
                self.sliding_moves(board, from, &ORTHOGONALS, &mut moves);
                self.sliding_moves(board, from, &DIAGONALS, &mut moves);
            }
            PieceType::Knight => self.stepping_moves(board, from, &KNIGHT_OFFSETS, &mut moves),
            PieceType::King => self.stepping_moves(board, from, &KING_OFFSETS, &mut moves),
            PieceType::Pawn => self.pawn_moves(board, from, &mut moves),
        }
        moves
    }

    /// Walks each ray until the edge, a friendly piece (excluded) or an enemy
    /// piece (included as a capture).
    fn sliding_moves(&self, board: &Board, from: Position, rays: &[(i8, i8)], moves: &mut Vec<Move>) {
        for &(dr, dc) in rays {
            let mut current = from;
            while let Some(next) = current.offset(dr, dc) {
                match board.get_piece(next) {
                    None => moves.push(Move::new(from, next, None)),
                    Some(other) => {
                        if other.color != self.color {
                            moves.push(Move::new(from, next, None));
                        }
                        break;
                    }
                }
                current = next;
            }
        }
    }

    fn stepping_moves(&self, board: &Board, from: Position, offsets: &[(i8, i8)], moves: &mut Vec<Move>) {
        for &(dr, dc) in offsets {
            if let Some(to) = from.offset(dr, dc) {
                let blocked_by_friend = board.get_piece(to).is_some_and(|p| p.color == self.color);
                if !blocked_by_friend {
                    moves.push(Move::new(from, to, None));
                }
            }
        }
    }

    fn pawn_moves(&self, board: &Board, from: Position, moves: &mut Vec<Move>) {
        let forward = self.color.forward();

        // Single and double pushes onto empty squares only.
        if let Some(one) = from.offset(forward, 0) {
            if board.get_piece(one).is_none() {
                self.push_pawn_move(from, one, moves);
                if from.row() == self.color.pawn_home_row() {
                    if let Some(two) = from.offset(2 * forward, 0) {
                        if board.get_piece(two).is_none() {
                            self.push_pawn_move(from, two, moves);
                        }
                    }
                }
            }
        }

        // Diagonal captures onto enemy pieces only. En passant is not modeled.
        for dc in [-1, 1] {
            if let Some(target) = from.offset(forward, dc) {
                if board.get_piece(target).is_some_and(|p| p.color != self.color) {
                    self.push_pawn_move(from, target, moves);
                }
            }
        }
    }

    /// Emits one move, or one per promotion choice when landing on the last rank.
    fn push_pawn_move(&self, from: Position, to: Position, moves: &mut Vec<Move>) {
        if to.row() == self.color.promotion_row() {
            for kind in PROMOTION_CHOICES {
                moves.push(Move::new(from, to, Some(kind)));
            }
        } else {
            moves.push(Move::new(from, to, None));
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.kind.symbol();
        let symbol = match self.color {
            Color::White => symbol.to_ascii_uppercase(),
            Color::Black => symbol,
        };
        write!(f, "{}", symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Position { s.parse().unwrap() }

    fn destinations(board: &Board, from: &str) -> Vec<String> {
        let piece = board.get_piece(sq(from)).unwrap();
        let mut ends: Vec<String> = piece
            .pseudo_legal_moves(board, sq(from))
            .iter()
            .map(|m| m.end.to_string())
            .collect();
        ends.sort();
        ends
    }

    #[test]
    fn rook_ray_stops_at_friend_and_captures_enemy() {
        let board = Board::from_placement("8/8/8/3p4/8/8/3R1N2/8").unwrap();
        // d2 rook: up to d5 (capture), down to d1, left to a2, right stops before f2.
        assert_eq!(destinations(&board, "d2"), ["a2", "b2", "c2", "d1", "d3", "d4", "d5", "e2"]);
    }

    #[test]
    fn queen_in_corner_of_empty_board() {
        let board = Board::from_placement("8/8/8/8/8/8/8/Q7").unwrap();
        assert_eq!(destinations(&board, "a1").len(), 21);
    }

    #[test]
    fn knight_skips_friendly_squares() {
        let board = Board::from_placement("8/8/8/8/8/2P5/8/1N6").unwrap();
        // b1 knight: a3, c3 (own pawn), d2.
        assert_eq!(destinations(&board, "b1"), ["a3", "d2"]);
    }

    #[test]
    fn king_steps_once_in_every_direction() {
        let board = Board::from_placement("8/8/8/8/4K3/8/8/8").unwrap();
        assert_eq!(destinations(&board, "e4").len(), 8);
    }

    #[test]
    fn pawn_double_step_needs_both_squares_empty() {
        let blocked_far = Board::from_placement("8/8/8/8/4n3/8/4P3/8").unwrap();
        assert_eq!(destinations(&blocked_far, "e2"), ["e3"]);
        let blocked_near = Board::from_placement("8/8/8/8/8/4n3/4P3/8").unwrap();
        assert!(destinations(&blocked_near, "e2").is_empty());
    }

    #[test]
    fn pawn_captures_diagonally_only_enemies() {
        let board = Board::from_placement("8/8/8/8/8/3p1P2/4P3/8").unwrap();
        assert_eq!(destinations(&board, "e2"), ["d3", "e3", "e4"]);
    }

    #[test]
    fn black_pawn_moves_down_the_board() {
        let board = Board::from_placement("8/3p4/8/8/8/8/8/8").unwrap();
        assert_eq!(destinations(&board, "d7"), ["d5", "d6"]);
    }

    #[test]
    fn promotion_emits_four_moves() {
        let board = Board::from_placement("1n6/P7/8/8/8/8/8/8").unwrap();
        let pawn = board.get_piece(sq("a7")).unwrap();
        let moves = pawn.pseudo_legal_moves(&board, sq("a7"));
        // Push to a8 and capture on b8, four choices each.
        assert_eq!(moves.len(), 8);
        assert!(moves.iter().all(|m| m.promotion.is_some()));
        for kind in PROMOTION_CHOICES {
            assert!(moves.contains(&Move::new(sq("a7"), sq("b8"), Some(kind))));
        }
    }

    #[test]
    fn piece_chars() {
        assert_eq!(Piece::from_char('Q'), Some(Piece::new(Color::White, PieceType::Queen)));
        assert_eq!(Piece::from_char('n'), Some(Piece::new(Color::Black, PieceType::Knight)));
        assert_eq!(Piece::from_char('x'), None);
        assert_eq!(Piece::new(Color::Black, PieceType::King).to_string(), "k");
    }
}
