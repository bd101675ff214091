// src/history.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::rights::{CastleSide, CastlingRights};
use crate::types::{Piece, PieceKind, Square};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct EnPassantCapture {
    pub square: Square,
    pub pawn: Piece,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct CastlingMove {
    pub rook_from_col: u8,
    pub rook_to_col: u8,
}

/// Everything needed to take a move back exactly. Built before the board is
/// touched and pushed once the move is complete.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    /// The mover as it was before the move (a pawn, for promotions).
    pub piece: Piece,
    /// Whatever stood on `to` beforehand.
    pub captured: Option<Piece>,
    pub prior_en_passant: Option<Square>,
    pub prior_rights: CastlingRights,
    pub en_passant_capture: Option<EnPassantCapture>,
    pub castling: Option<CastlingMove>,
    pub promotion: Option<PieceKind>,
}

impl MoveRecord {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some() || self.en_passant_capture.is_some()
    }

    /// Short notation: `Nxf3`, `-e4`, `O-O`, `xd8=Q`.
    pub fn notation(&self) -> String {
        if let Some(castling) = self.castling {
            return match CastleSide::from_rook_col(castling.rook_from_col) {
                Some(CastleSide::QueenSide) => "O-O-O".to_string(),
                _ => "O-O".to_string(),
            };
        }
        let mut notation = String::new();
        if let Some(letter) = self.piece.kind.letter() {
            notation.push(letter);
        }
        notation.push(if self.is_capture() { 'x' } else { '-' });
        notation.push_str(&self.to.to_string());
        if let Some(letter) = self.promotion.and_then(|kind| kind.letter()) {
            notation.push('=');
            notation.push(letter);
        }
        notation
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation())
    }
}

/// Numbered move pairs, one full move per line: `1. -e4 -e5`.
pub fn format_move_list(records: &[MoveRecord]) -> String {
    records
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| {
            let moves: Vec<String> = pair.iter().map(MoveRecord::notation).collect();
            format!("{}. {}", i + 1, moves.join(" "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
