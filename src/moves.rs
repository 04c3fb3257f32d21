// src/moves.rs
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::piece::PieceType;
use crate::position::Position;

lazy_static! {
    static ref MOVE_RE: Regex = Regex::new(r"^([a-h][1-8])([a-h][1-8])([a-z])?$").unwrap();
}

/// A move from `start` to `end`, optionally promoting a pawn.
///
/// Not validated on construction; it only means something against a
/// particular board.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub start: Position,
    pub end: Position,
    pub promotion: Option<PieceType>,
}

impl Move {
    pub fn new(start: Position, end: Position, promotion: Option<PieceType>) -> Self {
        Move { start, end, promotion }
    }

    /// Same squares, different (or no) promotion piece.
    pub fn with_promotion(&self, promotion: Option<PieceType>) -> Self {
        Move { promotion, ..*self }
    }
}

impl fmt::Display for Move {
    /// Long algebraic notation, e.g. `e2e4` or `a7a8q`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.start, self.end)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.symbol())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = ParseError;

    /// Parses long algebraic notation. Only the format is checked, not legality.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let caps = MOVE_RE
            .captures(&lowered)
            .ok_or_else(|| ParseError::InvalidMove(s.trim().to_string()))?;

        let start: Position = caps[1].parse()?;
        let end: Position = caps[2].parse()?;
        let promotion = match caps.get(3) {
            None => None,
            Some(m) => {
                let c = m.as_str().chars().next().unwrap_or('?');
                match PieceType::from_symbol(c) {
                    Some(kind @ (PieceType::Queen | PieceType::Rook | PieceType::Bishop | PieceType::Knight)) => Some(kind),
                    _ => return Err(ParseError::InvalidPromotion(c)),
                }
            }
        };
        Ok(Move::new(start, end, promotion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_prints_long_algebraic() {
        let mv: Move = "e2e4".parse().unwrap();
        assert_eq!(mv.start, "e2".parse::<Position>().unwrap());
        assert_eq!(mv.end, "e4".parse::<Position>().unwrap());
        assert_eq!(mv.promotion, None);
        assert_eq!(mv.to_string(), "e2e4");

        let promo: Move = "A7A8Q".parse().unwrap();
        assert_eq!(promo.promotion, Some(PieceType::Queen));
        assert_eq!(promo.to_string(), "a7a8q");
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!("e2".parse::<Move>(), Err(ParseError::InvalidMove("e2".into())));
        assert_eq!("e2e9".parse::<Move>(), Err(ParseError::InvalidMove("e2e9".into())));
        assert_eq!("e7e8k".parse::<Move>(), Err(ParseError::InvalidPromotion('k')));
        assert_eq!("e7e8x".parse::<Move>(), Err(ParseError::InvalidPromotion('x')));
    }

    #[test]
    fn equality_includes_promotion() {
        let plain: Move = "b7b8".parse().unwrap();
        assert_ne!(plain, plain.with_promotion(Some(PieceType::Rook)));
        assert_eq!(plain.with_promotion(Some(PieceType::Rook)), "b7b8r".parse::<Move>().unwrap());
    }
}
