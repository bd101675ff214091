// src/position.rs
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::rights::CastlingRights;
use crate::types::{Color, Square};

/// Everything move generation depends on. Small enough to copy for
/// simulation and lookahead.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub board: Board,
    pub turn: Color,
    /// Square capturable by en passant this ply only.
    pub en_passant: Option<Square>,
    pub rights: CastlingRights,
}

impl Position {
    pub fn initial() -> Self {
        Position::from_board(Board::initial(), Color::White)
    }

    /// Arbitrary setup; castling bookkeeping is derived from piece placement.
    pub fn from_board(board: Board, turn: Color) -> Self {
        Position {
            rights: CastlingRights::from_board(&board),
            board,
            turn,
            en_passant: None,
        }
    }
}

impl Default for Position {
    fn default() -> Self { Position::initial() }
}
