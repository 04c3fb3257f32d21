// src/main.rs
use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chess_rules::{Board, Color, Game, GameRecord, GameStatus, Move, ParseError, PieceType, Position};
use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

// --- Configuration ---

const DEFAULT_RECORD_FILENAME: &str = "chess_game.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Opponent {
    /// Both sides are entered at this terminal
    Human,
    /// The other side plays a random legal move
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Side { White, Black }

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side { Side::White => Color::White, Side::Black => Color::Black }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Play chess in the terminal", long_about = None)]
struct Args {
    /// File the game record is written to when the game ends or on quit
    #[arg(long, default_value = DEFAULT_RECORD_FILENAME)]
    record: PathBuf,

    /// Who plays the side you are not playing
    #[arg(long, value_enum, default_value_t = Opponent::Human)]
    opponent: Opponent,

    /// Color you play against a random opponent
    #[arg(long, value_enum, default_value_t = Side::White)]
    play_as: Side,

    /// Seed for the random opponent (a fresh seed is drawn if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Start from a FEN piece placement instead of the standard position
    #[arg(long)]
    placement: Option<String>,

    /// Side to move first
    #[arg(long, value_enum, default_value_t = Side::White)]
    turn: Side,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

// --- Input Parsing ---

#[derive(Debug)]
enum UserInput {
    Move(Move), // e.g. e2e4, a7a8q
    Command(Command),
}

#[derive(Debug)]
enum Command {
    Moves(Position),
    Resign, History, Help, Quit,
    Save(PathBuf),
}

#[derive(Debug, Error)]
enum CommandError {
    #[error("Missing argument for command: '{0}'")]
    MissingArgument(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Parses a line of input into a command or a move. Moves are only checked for
/// format here; legality is the game's call.
fn parse_user_input(input: &str, default_record: &Path) -> Result<UserInput, CommandError> {
    let trimmed_input = input.trim();
    let mut parts = trimmed_input.splitn(2, char::is_whitespace);
    let command_word = parts.next().unwrap_or("").to_lowercase();
    let argument = parts.next().unwrap_or("").trim();

    match command_word.as_str() {
        "moves" => {
            if argument.is_empty() {
                return Err(CommandError::MissingArgument(command_word));
            }
            return Ok(UserInput::Command(Command::Moves(argument.parse()?)));
        }
        "resign" => return Ok(UserInput::Command(Command::Resign)),
        "history" => return Ok(UserInput::Command(Command::History)),
        "help" | "?" => return Ok(UserInput::Command(Command::Help)),
        "quit" | "exit" => return Ok(UserInput::Command(Command::Quit)),
        "save" => {
            let path = if argument.is_empty() { default_record.to_path_buf() } else { PathBuf::from(argument) };
            return Ok(UserInput::Command(Command::Save(path)));
        }
        _ => {} // Not a command word, try parsing as a move
    }

    Ok(UserInput::Move(trimmed_input.parse()?))
}

/// True when `mv` moves the side to move's pawn onto its last rank with no
/// piece chosen yet.
fn needs_promotion_choice(game: &Game, mv: &Move) -> bool {
    mv.promotion.is_none()
        && game
            .board()
            .get_piece(mv.start)
            .is_some_and(|p| {
                p.color == game.current_turn() && p.kind == PieceType::Pawn && mv.end.row() == p.color.promotion_row()
            })
}

/// Asks for a promotion piece until one is given. `None` on end of input.
fn prompt_promotion() -> io::Result<Option<PieceType>> {
    loop {
        print!("Promote pawn to? (q=Queen, r=Rook, b=Bishop, n=Knight): ");
        io::stdout().flush()?;
        let mut promo_input = String::new();
        if io::stdin().read_line(&mut promo_input)? == 0 {
            return Ok(None);
        }
        match promo_input.trim().to_lowercase().chars().next().and_then(PieceType::from_symbol) {
            Some(kind @ (PieceType::Queen | PieceType::Rook | PieceType::Bishop | PieceType::Knight)) => return Ok(Some(kind)),
            _ => println!("Invalid choice. Please enter q, r, b, or n."),
        }
    }
}

fn save_record(record: &GameRecord, path: &Path) {
    match record.save_to_file(path) {
        Ok(()) => println!("Game record saved to '{}'.", path.display()),
        Err(e) => eprintln!("Error: Failed to save game record: {}", e),
    }
}

fn init_logging(debug: bool) {
    let log_level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level))
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}

// --- Main Game Loop ---

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.debug);

    let board = match &args.placement {
        Some(placement) => Board::from_placement(placement)?,
        None => Board::standard(),
    };
    let mut game = Game::from_board(board, args.turn.into());
    let mut record = GameRecord::new(&game);

    let computer_color = match args.opponent {
        Opponent::Human => None,
        Opponent::Random => Some(Color::from(args.play_as).opponent()),
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    log::debug!("starting game: opponent={:?}, placement={}", args.opponent, game.board().to_placement());

    println!("==============================");
    println!("|         Rust Chess         |");
    println!("==============================");
    print_help();

    'game_loop: loop {
        // 1. Game end
        let status = game.status();
        if status.is_over() {
            println!("------------------------------------------");
            println!("{}", game.board());
            println!("\n=== GAME OVER: {} ===", status);
            record.finish(status);
            save_record(&record, &args.record);
            break 'game_loop;
        }

        println!("------------------------------------------");
        println!("{}", game);
        if let GameStatus::Check(color) = status {
            println!("{} is in check!", color);
        }

        // 2. Computer move
        if computer_color == Some(game.current_turn()) {
            let options = game.all_legal_moves(game.current_turn());
            if options.is_empty() {
                println!("\n{} has no legal move.", game.current_turn());
                game.end();
                continue 'game_loop;
            }
            let choice = options[rng.random_range(0..options.len())];
            println!("\n{} plays {}", game.current_turn(), choice);
            record.play(&mut game, choice)?;
            continue 'game_loop;
        }

        // 3. Prompt and read
        print!("\n{}'s turn. Enter move (e.g. e2e4) or command: ", game.current_turn());
        io::stdout().flush()?;

        let mut input_line = String::new();
        match io::stdin().read_line(&mut input_line) {
            Ok(0) => {
                println!("\nEnd of input detected. Quitting game.");
                save_record(&record, &args.record);
                break 'game_loop;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {}. Try again or use 'quit'/'exit'.", e);
                continue 'game_loop;
            }
        }

        let input_trimmed = input_line.trim();
        if input_trimmed.is_empty() { continue 'game_loop; }

        // 4. Process input
        match parse_user_input(input_trimmed, &args.record) {
            Ok(UserInput::Move(mut parsed_move)) => {
                if needs_promotion_choice(&game, &parsed_move) {
                    let target_reachable = game.legal_moves(parsed_move.start).iter().any(|m| m.end == parsed_move.end);
                    if !target_reachable {
                        println!("Error: Moving pawn to {} is not a legal destination.", parsed_move.end);
                        continue 'game_loop;
                    }
                    match prompt_promotion()? {
                        Some(kind) => parsed_move.promotion = Some(kind),
                        None => {
                            println!("Promotion choice required but not provided. Move cancelled.");
                            continue 'game_loop;
                        }
                    }
                }
                if let Err(e) = record.play(&mut game, parsed_move) {
                    println!("Error making move: {}", e);
                }
            }
            Ok(UserInput::Command(command)) => match command {
                Command::Moves(pos) => {
                    let moves = game.legal_moves(pos);
                    if moves.is_empty() {
                        println!("No legal moves from {}.", pos);
                    } else {
                        let ends: Vec<Position> = moves.iter().map(|m| m.end).collect();
                        println!("{}", game.board().render_highlighted(&ends));
                        let listed: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
                        println!("Legal moves from {}: {}", pos, listed.join(" "));
                    }
                }
                Command::Resign => {
                    if let Err(e) = game.resign(game.current_turn()) {
                        println!("Error: {}", e);
                    }
                }
                Command::History => {
                    let text = record.history_text();
                    println!("{}", if text.is_empty() { "(no moves yet)" } else { text.as_str() });
                }
                Command::Help => print_help(),
                Command::Quit => {
                    println!("Quit command received.");
                    save_record(&record, &args.record);
                    println!("Exiting game.");
                    break 'game_loop;
                }
                Command::Save(path) => save_record(&record, &path),
            },
            Err(e) => println!("Input Error: {}", e),
        }
    }

    println!("\nGame session finished.");
    Ok(())
}

/// Prints available commands.
fn print_help() {
    println!("\nAvailable Commands:");
    println!("  <move>         Enter move in long algebraic notation (e.g., e2e4, a7a8q).");
    println!("                 Promotion (q, r, b, n) is optional; will prompt if needed.");
    println!("  moves <square> Show the legal moves of the piece on a square.");
    println!("  history        Show the move history.");
    println!("  resign         Forfeit the game (ends game).");
    println!("  save [file]    Save the game record (default: {}).", DEFAULT_RECORD_FILENAME);
    println!("  help           Show this help message.");
    println!("  quit / exit    Exit the game (saves the record).");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_path() -> PathBuf { PathBuf::from(DEFAULT_RECORD_FILENAME) }

    #[test]
    fn parses_commands_and_moves() {
        let path = default_path();
        assert!(matches!(parse_user_input("e2e4", &path), Ok(UserInput::Move(_))));
        assert!(matches!(parse_user_input("Resign", &path), Ok(UserInput::Command(Command::Resign))));
        assert!(matches!(parse_user_input("exit", &path), Ok(UserInput::Command(Command::Quit))));
        match parse_user_input("moves e2", &path) {
            Ok(UserInput::Command(Command::Moves(pos))) => assert_eq!(pos.to_string(), "e2"),
            other => panic!("unexpected: {:?}", other),
        }
        match parse_user_input("save out.json", &path) {
            Ok(UserInput::Command(Command::Save(p))) => assert_eq!(p, PathBuf::from("out.json")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn reports_bad_input() {
        let path = default_path();
        assert!(matches!(parse_user_input("moves", &path), Err(CommandError::MissingArgument(_))));
        assert!(matches!(parse_user_input("moves z9", &path), Err(CommandError::Parse(_))));
        assert!(matches!(parse_user_input("castle", &path), Err(CommandError::Parse(_))));
    }

    #[test]
    fn detects_missing_promotion_piece() {
        let board = Board::from_placement("7k/P7/8/8/8/8/8/K7").unwrap();
        let game = Game::from_board(board, Color::White);
        assert!(needs_promotion_choice(&game, &"a7a8".parse().unwrap()));
        assert!(!needs_promotion_choice(&game, &"a7a8q".parse().unwrap()));
        assert!(!needs_promotion_choice(&game, &"a1a2".parse().unwrap()));
    }

    #[test]
    fn no_promotion_prompt_out_of_turn() {
        let board = Board::from_placement("7k/P7/8/8/8/8/8/K7").unwrap();
        let game = Game::from_board(board, Color::Black);
        assert!(!needs_promotion_choice(&game, &"a7a8".parse().unwrap()));
    }
}
