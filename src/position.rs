// src/position.rs
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, PositionError};

lazy_static! {
    static ref SQUARE_RE: Regex = Regex::new(r"^([a-h])([1-8])$").unwrap();
}

/// A square on the board. Rows are ranks (1 = white's back rank), columns are
/// files (1 = the a-file). Both are always within `1..=8`.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    row: u8,
    col: u8,
}

// Deserialization goes through this so out-of-range data is rejected.
#[derive(Deserialize)]
struct RawPosition {
    row: u8,
    col: u8,
}

impl TryFrom<RawPosition> for Position {
    type Error = PositionError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Position::new(raw.row, raw.col)
    }
}

impl Position {
    pub fn new(row: u8, col: u8) -> Result<Self, PositionError> {
        if (1..=8).contains(&row) && (1..=8).contains(&col) {
            Ok(Position { row, col })
        } else {
            Err(PositionError::IllegalPosition { row, col })
        }
    }

    pub fn row(&self) -> u8 { self.row }
    pub fn col(&self) -> u8 { self.col }

    /// The square `dr` rows and `dc` columns away, or `None` past the edge.
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Position> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if (1..=8).contains(&row) && (1..=8).contains(&col) {
            Some(Position { row: row as u8, col: col as u8 })
        } else {
            None
        }
    }

    /// All 64 squares, row by row starting at a1.
    pub fn all() -> impl Iterator<Item = Position> {
        (1..=8u8).flat_map(|row| (1..=8u8).map(move |col| Position { row, col }))
    }

    /// Zero-based indices into an 8x8 array.
    pub(crate) fn index(&self) -> (usize, usize) {
        ((self.row - 1) as usize, (self.col - 1) as usize)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file_char = (b'a' + self.col - 1) as char;
        write!(f, "{}{}", file_char, self.row)
    }
}

impl FromStr for Position {
    type Err = ParseError;

    /// Parses algebraic notation such as `"e4"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let caps = SQUARE_RE
            .captures(&lowered)
            .ok_or_else(|| ParseError::InvalidSquare(s.to_string()))?;
        let col = caps[1].as_bytes()[0] - b'a' + 1;
        let row = caps[2].as_bytes()[0] - b'0';
        Position::new(row, col).map_err(|_| ParseError::InvalidSquare(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(Position::new(0, 4), Err(PositionError::IllegalPosition { row: 0, col: 4 }));
        assert_eq!(Position::new(3, 9), Err(PositionError::IllegalPosition { row: 3, col: 9 }));
        assert!(Position::new(8, 8).is_ok());
        assert!(Position::new(1, 1).is_ok());
    }

    #[test]
    fn algebraic_notation() {
        let e2: Position = "e2".parse().unwrap();
        assert_eq!((e2.row(), e2.col()), (2, 5));
        assert_eq!(e2.to_string(), "e2");
        assert_eq!("H8".parse::<Position>().unwrap(), Position::new(8, 8).unwrap());
        assert!("i1".parse::<Position>().is_err());
        assert!("a9".parse::<Position>().is_err());
        assert!("a10".parse::<Position>().is_err());
    }

    #[test]
    fn offset_stops_at_edges() {
        let a1 = Position::new(1, 1).unwrap();
        assert_eq!(a1.offset(-1, 0), None);
        assert_eq!(a1.offset(0, -1), None);
        assert_eq!(a1.offset(2, 1), Some(Position::new(3, 2).unwrap()));
        assert_eq!(Position::all().count(), 64);
    }

    #[test]
    fn deserialize_validates_range() {
        let ok: Position = serde_json::from_str(r#"{"row":2,"col":5}"#).unwrap();
        assert_eq!(ok.to_string(), "e2");
        assert!(serde_json::from_str::<Position>(r#"{"row":0,"col":5}"#).is_err());
    }
}
