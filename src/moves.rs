// src/moves.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Square;

/// What a generated move does besides relocating the moving piece.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Quiet,
    Capture,
    /// Pawn two-step; creates an en-passant target on the square passed over.
    DoublePawnPush,
    /// The captured pawn sits on `captured`, not on the destination.
    EnPassantCapture { captured: Square },
    Castle { rook_from: Square, rook_to: Square },
    /// Pawn reaching the last rank; the piece type is chosen afterwards.
    Promotion { capture: bool },
}

// --- Move Representation ---
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
}

impl Move {
    pub fn new(from: Square, to: Square, kind: MoveKind) -> Self {
        Move { from, to, kind }
    }

    pub fn is_capture(&self) -> bool {
        matches!(
            self.kind,
            MoveKind::Capture | MoveKind::EnPassantCapture { .. } | MoveKind::Promotion { capture: true }
        )
    }

    pub fn is_castle(&self) -> bool {
        matches!(self.kind, MoveKind::Castle { .. })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}
