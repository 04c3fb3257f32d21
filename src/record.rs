// src/record.rs
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MoveError, RecordError};
use crate::game::{Game, GameStatus};
use crate::moves::Move;
use crate::piece::Color;

// --- Event History and Saving ---

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub notation: String, // e.g. e2e4, e7e8q
    pub player: Color,
    pub is_check: bool,     // Is the *opponent* now in check?
    pub is_checkmate: bool, // Is the *opponent* now checkmated?
}

impl MoveRecord {
    /// `#` for mate, `+` for check, empty otherwise.
    pub fn annotation(&self) -> &'static str {
        if self.is_checkmate { "#" } else if self.is_check { "+" } else { "" }
    }
}

/// A game's starting point, every move played from it, and how it ended.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub start_placement: String,
    pub start_turn: Color,
    pub moves: Vec<MoveRecord>,
    pub result: Option<GameStatus>,
}

impl GameRecord {
    /// An empty record starting from `game`'s current position.
    pub fn new(game: &Game) -> Self {
        GameRecord {
            start_placement: game.board().to_placement(),
            start_turn: game.current_turn(),
            moves: Vec::new(),
            result: None,
        }
    }

    /// Plays `mv` on `game` and logs it with its check/mate annotation.
    /// A rejected move is not recorded.
    pub fn play(&mut self, game: &mut Game, mv: Move) -> Result<(), MoveError> {
        let player = game.current_turn();
        game.make_move(mv)?;
        let opponent = player.opponent();
        let is_checkmate = game.is_in_checkmate(opponent);
        self.moves.push(MoveRecord {
            notation: mv.to_string(),
            player,
            is_check: is_checkmate || game.is_in_check(opponent),
            is_checkmate,
        });
        Ok(())
    }

    pub fn finish(&mut self, status: GameStatus) {
        self.result = Some(status);
    }

    /// Numbered move list, e.g. `1. f2f3 e7e5`, one line per move pair.
    pub fn history_text(&self) -> String {
        let mut lines = Vec::new();
        let mut move_num = 1;
        let mut iter = self.moves.iter();

        // A record starting with Black to move opens with an ellipsis.
        if self.start_turn == Color::Black {
            if let Some(black) = iter.next() {
                lines.push(format!("{}. ... {}{}", move_num, black.notation, black.annotation()));
                move_num += 1;
            }
        }
        while let Some(white) = iter.next() {
            let mut line = format!("{}. {}{}", move_num, white.notation, white.annotation());
            if let Some(black) = iter.next() {
                line.push_str(&format!(" {}{}", black.notation, black.annotation()));
            }
            lines.push(line);
            move_num += 1;
        }
        lines.join("\n")
    }

    /// Writes the record as pretty-printed JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), RecordError> {
        let path = path.as_ref();
        let json_data = serde_json::to_string_pretty(self)?;
        fs::write(path, json_data).map_err(|e| RecordError::Io(path.display().to_string(), e))
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let path = path.as_ref();
        let json_data = fs::read_to_string(path).map_err(|e| RecordError::Io(path.display().to_string(), e))?;
        Ok(serde_json::from_str(&json_data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn mv(s: &str) -> Move { s.parse().unwrap() }

    fn fools_mate() -> (Game, GameRecord) {
        let mut game = Game::new();
        let mut record = GameRecord::new(&game);
        for m in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            record.play(&mut game, mv(m)).unwrap();
        }
        (game, record)
    }

    #[test]
    fn annotates_check_and_mate() {
        let (game, mut record) = fools_mate();
        assert_eq!(record.moves.len(), 4);
        assert_eq!(record.moves[3].annotation(), "#");
        assert_eq!(record.moves[0].annotation(), "");
        record.finish(game.status());
        assert_eq!(record.result, Some(GameStatus::Checkmate { winner: Color::Black }));
        assert_eq!(record.history_text(), "1. f2f3 e7e5\n2. g2g4 d8h4#");
    }

    #[test]
    fn rejected_moves_are_not_logged() {
        let mut game = Game::new();
        let mut record = GameRecord::new(&game);
        assert!(record.play(&mut game, mv("e2e5")).is_err());
        assert!(record.moves.is_empty());
    }

    #[test]
    fn black_first_history_uses_ellipsis() {
        let board = Board::from_placement("4k3/4p3/8/8/8/8/4P3/4K3").unwrap();
        let mut game = Game::from_board(board, Color::Black);
        let mut record = GameRecord::new(&game);
        record.play(&mut game, mv("e7e5")).unwrap();
        record.play(&mut game, mv("e2e4")).unwrap();
        assert_eq!(record.history_text(), "1. ... e7e5\n2. e2e4");
    }

    #[test]
    fn save_and_load_round_trip() {
        let (_, record) = fools_mate();
        let path = std::env::temp_dir().join(format!("chess_rules_record_{}.json", std::process::id()));
        record.save_to_file(&path).unwrap();
        let loaded = GameRecord::load_from_file(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, record);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GameRecord::load_from_file("/nonexistent/dir/record.json").unwrap_err();
        assert!(matches!(err, RecordError::Io(..)));
    }
}
