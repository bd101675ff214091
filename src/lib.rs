//! Rules engine for standard chess: board state, legal move generation,
//! check/checkmate/stalemate/draw detection, and reversible move application
//! including castling, en passant and two-phase promotion.

pub mod attacks;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod history;
pub mod legal;
pub mod movegen;
pub mod moves;
pub mod position;
pub mod rights;
pub mod status;
pub mod types;
pub mod zobrist;

pub use board::Board;
pub use error::{EngineError, SaveError};
pub use game::{CapturedPieces, Engine, MoveOutcome};
pub use history::MoveRecord;
pub use moves::{Move, MoveKind};
pub use position::Position;
pub use rights::{CastleSide, CastlingRights};
pub use status::{DrawReason, GameStatus};
pub use types::{Color, Piece, PieceKind, Square};
