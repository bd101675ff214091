// src/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::EngineError;

// --- Enums and Basic Structs ---
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Color { White, Black }

impl Color {
    pub fn opponent(&self) -> Color {
        match self { Color::White => Color::Black, Color::Black => Color::White }
    }

    pub(crate) fn index(&self) -> usize { // Helper for Zobrist indexing
        match self { Color::White => 0, Color::Black => 1 }
    }

    /// Row holding this color's king and rooks at the start of the game.
    pub fn back_row(&self) -> u8 {
        match self { Color::White => 0, Color::Black => 7 }
    }

    /// Row direction a pawn of this color advances in.
    pub fn pawn_direction(&self) -> i8 {
        match self { Color::White => 1, Color::Black => -1 }
    }

    pub fn pawn_start_row(&self) -> u8 {
        match self { Color::White => 1, Color::Black => 6 }
    }

    /// The farthest rank, where a pawn of this color promotes.
    pub fn promotion_row(&self) -> u8 {
        self.opponent().back_row()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PieceKind { Pawn, Knight, Bishop, Rook, Queen, King }

impl PieceKind {
    pub const PROMOTION_CHOICES: [PieceKind; 4] =
        [PieceKind::Queen, PieceKind::Rook, PieceKind::Bishop, PieceKind::Knight];

    pub(crate) fn index(&self) -> usize { // Helper for Zobrist indexing
        match self {
            PieceKind::Pawn => 0, PieceKind::Knight => 1, PieceKind::Bishop => 2,
            PieceKind::Rook => 3, PieceKind::Queen => 4, PieceKind::King => 5,
        }
    }

    /// Uppercase letter used in move notation. Pawns have none.
    pub fn letter(&self) -> Option<char> {
        match self {
            PieceKind::Pawn => None,
            PieceKind::Knight => Some('N'), PieceKind::Bishop => Some('B'),
            PieceKind::Rook => Some('R'), PieceKind::Queen => Some('Q'), PieceKind::King => Some('K'),
        }
    }

    pub fn is_promotion_choice(&self) -> bool {
        Self::PROMOTION_CHOICES.contains(self)
    }

    /// Parses a promotion choice letter (q, r, b, n; either case).
    pub fn from_promotion_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'q' => Some(PieceKind::Queen), 'r' => Some(PieceKind::Rook),
            'b' => Some(PieceKind::Bishop), 'n' => Some(PieceKind::Knight),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Self { Piece { kind, color } }

    pub fn value(&self) -> u32 {
        match self.kind {
            PieceKind::Pawn => 1, PieceKind::Knight => 3, PieceKind::Bishop => 3,
            PieceKind::Rook => 5, PieceKind::Queen => 9, PieceKind::King => 0,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        let color = if c.is_uppercase() { Color::White } else { Color::Black };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn, 'n' => PieceKind::Knight, 'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook, 'q' => PieceKind::Queen, 'k' => PieceKind::King,
            _ => return None,
        };
        Some(Piece::new(kind, color))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self.kind {
            PieceKind::Pawn => 'p', PieceKind::Knight => 'n', PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r', PieceKind::Queen => 'q', PieceKind::King => 'k',
        };
        let symbol = match self.color {
            Color::White => symbol.to_ascii_uppercase(),
            Color::Black => symbol,
        };
        write!(f, "{}", symbol)
    }
}

// --- Squares ---

/// A board coordinate. Row 0 is White's back rank, column 0 is the a-file.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    pub const fn new(row: u8, col: u8) -> Self { Square { row, col } }

    /// False for squares built by hand or deserialized with a row or column past 7.
    pub const fn is_on_board(&self) -> bool { self.row < 8 && self.col < 8 }

    /// Offsets the square, returning `None` when the result falls off the board.
    pub fn offset(&self, d_row: i8, d_col: i8) -> Option<Square> {
        let row = self.row as i8 + d_row;
        let col = self.col as i8 + d_col;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Square::new(row as u8, col as u8))
        } else {
            None
        }
    }

    pub(crate) fn index(&self) -> usize {
        self.row as usize * 8 + self.col as usize
    }

    /// Every square on the board, a1 first, h8 last.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Square::new(row, col)))
    }

    /// Parses algebraic notation such as "e4".
    pub fn from_algebraic(s: &str) -> Option<Square> {
        let mut chars = s.chars();
        let file_char = chars.next()?;
        let rank_char = chars.next()?;
        if chars.next().is_some() { return None; }
        let col = match file_char.to_ascii_lowercase() { c @ 'a'..='h' => c as u8 - b'a', _ => return None };
        let row = match rank_char { '1'..='8' => rank_char as u8 - b'1', _ => return None };
        Some(Square::new(row, col))
    }
}

impl std::str::FromStr for Square {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s.trim()).ok_or_else(|| EngineError::InvalidSquare(s.to_string()))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, (b'1' + self.row) as char)
    }
}
