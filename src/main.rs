// src/main.rs
use clap::Parser;
use regex::Regex;
use serde::Serialize;
use std::error::Error;
use std::fs;
use std::io::{self, Write};
use tracing::warn;

use chess_rules::config::Config;
use chess_rules::{Engine, EngineError, GameStatus, MoveOutcome, MoveRecord, PieceKind, SaveError, Square};

// --- Input Parsing ---

#[derive(Debug, PartialEq)]
enum UserInput {
    Move { from: Square, to: Square, promotion: Option<PieceKind> },
    Select(Square),
    Promote(PieceKind),
    Command(Command),
}

#[derive(Debug, PartialEq)]
enum Command {
    Undo, New, History, ClaimDraw, Help, Quit,
    Save(Option<String>),
}

struct InputParser {
    move_re: Regex,
    select_re: Regex,
    promote_re: Regex,
}

impl InputParser {
    fn new() -> Result<Self, regex::Error> {
        Ok(InputParser {
            // e2e4, e2-e4, e4xd5, e7e8q, e7-e8=Q
            move_re: Regex::new(r"^([a-h][1-8])\s*[-x]?\s*([a-h][1-8])\s*=?([qrbn])?$")?,
            select_re: Regex::new(r"^(?:select|moves)\s+([a-h][1-8])$")?,
            promote_re: Regex::new(r"^(?:promote\s+)?([qrbn])$")?,
        })
    }

    /// Parses a line into a move, selection, promotion choice or command.
    fn parse(&self, input: &str) -> Result<UserInput, String> {
        let lower = input.trim().to_lowercase();

        let mut parts = lower.splitn(2, char::is_whitespace);
        let command_word = parts.next().unwrap_or("");
        let argument = parts.next().unwrap_or("").trim();
        match command_word {
            "undo" => return Ok(UserInput::Command(Command::Undo)),
            "new" | "reset" => return Ok(UserInput::Command(Command::New)),
            "history" => return Ok(UserInput::Command(Command::History)),
            "claim" if argument == "draw" => return Ok(UserInput::Command(Command::ClaimDraw)),
            "help" | "?" => return Ok(UserInput::Command(Command::Help)),
            "quit" | "exit" => return Ok(UserInput::Command(Command::Quit)),
            "save" => {
                // File names are case-sensitive
                let name = input.trim().splitn(2, char::is_whitespace).nth(1).map(|s| s.trim().to_string());
                return Ok(UserInput::Command(Command::Save(name.filter(|s| !s.is_empty()))));
            }
            _ => {}
        }

        if let Some(caps) = self.promote_re.captures(&lower) {
            let kind = caps[1].chars().next().and_then(PieceKind::from_promotion_char);
            if let Some(kind) = kind {
                return Ok(UserInput::Promote(kind));
            }
        }
        if let Some(caps) = self.select_re.captures(&lower) {
            let square = caps[1].parse::<Square>().map_err(|e| e.to_string())?;
            return Ok(UserInput::Select(square));
        }
        if let Some(caps) = self.move_re.captures(&lower) {
            let from = caps[1].parse::<Square>().map_err(|e| e.to_string())?;
            let to = caps[2].parse::<Square>().map_err(|e| e.to_string())?;
            let promotion = caps.get(3).and_then(|m| m.as_str().chars().next()).and_then(PieceKind::from_promotion_char);
            return Ok(UserInput::Move { from, to, promotion });
        }

        Err(format!("Unrecognized input '{}'. Type 'help' for commands.", input.trim()))
    }
}

// --- History Export ---

#[derive(Serialize)]
struct SavedMove<'a> {
    notation: String,
    #[serde(flatten)]
    record: &'a MoveRecord,
}

#[derive(Serialize)]
struct SavedGame<'a> {
    status: GameStatus,
    moves: Vec<SavedMove<'a>>,
}

fn save_history(engine: &Engine, filename: &str) -> Result<(), SaveError> {
    let saved = SavedGame {
        status: engine.status(),
        moves: engine
            .move_history()
            .iter()
            .map(|record| SavedMove { notation: record.notation(), record })
            .collect(),
    };
    let json_data = serde_json::to_string_pretty(&saved)?;
    fs::write(filename, json_data).map_err(|e| SaveError::Io(filename.to_string(), e))?;
    Ok(())
}

// --- Output ---

fn print_status(status: &GameStatus) {
    if let Some(winner) = status.winner() {
        println!("\n=== Checkmate! {} wins. ===", winner);
    } else if let Some(reason) = status.draw {
        println!("\n=== Game drawn: {:?}. ===", reason);
    } else if status.check {
        println!("{} is in check!", status.turn);
    }
}

fn print_game(engine: &Engine, config: &Config) {
    println!("------------------------------------------");
    if config.board_only {
        println!("{}", engine.board());
    } else {
        print!("{}", engine);
    }
    print_status(&engine.status());
}

fn print_help() {
    println!("\nCommands:");
    println!("  e2e4, e2-e4, e7e8q  Move a piece (promotion letter optional)");
    println!("  select e2           List legal moves for a piece");
    println!("  q / r / b / n       Choose the promotion piece when asked");
    println!("  undo                Take back the last move");
    println!("  new                 Start a new game");
    println!("  history             Show the move list");
    println!("  claim draw          Claim a draw by threefold repetition");
    println!("  save [file]         Save the move history as JSON");
    println!("  help                Show this help");
    println!("  quit                Exit");
}

fn report(err: EngineError) {
    println!("Error: {}", err);
}

fn handle_move(engine: &mut Engine, from: Square, to: Square, promotion: Option<PieceKind>) {
    match engine.apply_move(from, to) {
        Ok(MoveOutcome::Completed(_)) => {}
        Ok(MoveOutcome::PromotionPending { square }) => match promotion {
            Some(kind) => {
                if let Err(e) = engine.resolve_promotion(kind) { report(e); }
            }
            None => println!("Pawn reached {}. Choose a piece: q, r, b or n.", square),
        },
        Err(e) => report(e),
    }
}

// --- Main Game Loop ---

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::parse();
    config.init_tracing();

    let parser = InputParser::new()?;
    let mut engine = Engine::new();

    println!("==============================");
    println!("|        Rust Chess          |");
    println!("==============================");
    print_help();

    loop {
        print_game(&engine, &config);

        let prompt = match engine.pending_promotion() {
            Some(square) => format!("\nPromote the pawn on {} (q/r/b/n): ", square),
            None if engine.status().game_over => "\nGame over. Enter 'undo', 'new', 'save' or 'quit': ".to_string(),
            None => format!("\n{}'s turn. Enter move (e.g. e2e4) or command: ", engine.turn()),
        };
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut input_line = String::new();
        match io::stdin().read_line(&mut input_line) {
            Ok(0) => {
                println!("\nEnd of input detected. Quitting game.");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "failed to read input");
                continue;
            }
        }
        if input_line.trim().is_empty() { continue; }

        let input = match parser.parse(&input_line) {
            Ok(input) => input,
            Err(msg) => {
                println!("{}", msg);
                continue;
            }
        };

        match input {
            UserInput::Move { from, to, promotion } => handle_move(&mut engine, from, to, promotion),
            UserInput::Select(square) => match engine.select(square) {
                Ok(moves) => {
                    let targets: Vec<String> = moves
                        .iter()
                        .map(|m| if m.is_capture() { format!("x{}", m.to) } else { m.to.to_string() })
                        .collect();
                    if targets.is_empty() {
                        println!("The piece on {} has no legal moves.", square);
                    } else {
                        println!("Legal moves from {}: {}", square, targets.join(" "));
                    }
                }
                Err(e) => report(e),
            },
            UserInput::Promote(kind) => {
                if let Err(e) = engine.resolve_promotion(kind) { report(e); }
            }
            UserInput::Command(command) => match command {
                Command::Undo => match engine.undo_move() {
                    Ok(record) => println!("Took back {}.", record),
                    Err(e) => report(e),
                },
                Command::New => {
                    engine.reset();
                    println!("New game started.");
                }
                Command::History => {
                    let history = chess_rules::history::format_move_list(engine.move_history());
                    if history.is_empty() { println!("No moves yet."); } else { println!("{}", history); }
                }
                Command::ClaimDraw => {
                    if let Err(e) = engine.claim_draw() { report(e); }
                }
                Command::Save(name) => {
                    let filename = name.unwrap_or_else(|| config.history_file.clone());
                    match save_history(&engine, &filename) {
                        Ok(()) => println!("History saved to '{}'.", filename),
                        Err(e) => eprintln!("Error: Failed to save history: {}", e),
                    }
                }
                Command::Help => print_help(),
                Command::Quit => {
                    println!("Exiting game.");
                    break;
                }
            },
        }
    }

    Ok(())
}
