// src/board.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Color, Piece, PieceKind, Square};

const BACK_ROW: [PieceKind; 8] = [
    PieceKind::Rook, PieceKind::Knight, PieceKind::Bishop, PieceKind::Queen,
    PieceKind::King, PieceKind::Bishop, PieceKind::Knight, PieceKind::Rook,
];

/// Column the king starts on.
pub const KING_START_COL: u8 = 4;

/// 8x8 grid of optional pieces, indexed `[row][col]`.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Option<Piece>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self { Board::empty() }
}

impl Board {
    pub fn empty() -> Self {
        Board { cells: [[None; 8]; 8] }
    }

    /// Creates the standard starting position.
    pub fn initial() -> Self {
        let mut board = Board::empty();
        for col in 0..8u8 {
            let kind = BACK_ROW[col as usize];
            board.set(Square::new(Color::White.back_row(), col), Some(Piece::new(kind, Color::White)));
            board.set(Square::new(Color::White.pawn_start_row(), col), Some(Piece::new(PieceKind::Pawn, Color::White)));
            board.set(Square::new(Color::Black.pawn_start_row(), col), Some(Piece::new(PieceKind::Pawn, Color::Black)));
            board.set(Square::new(Color::Black.back_row(), col), Some(Piece::new(kind, Color::Black)));
        }
        board
    }

    /// Builds a board from `(square, piece)` pairs written algebraically,
    /// e.g. `[("e1", 'K'), ("e8", 'k')]`. Unparseable entries are skipped.
    pub fn from_pieces(pieces: &[(&str, char)]) -> Self {
        let mut board = Board::empty();
        for (name, symbol) in pieces {
            if let (Some(sq), Some(piece)) = (Square::from_algebraic(name), Piece::from_char(*symbol)) {
                board.set(sq, Some(piece));
            }
        }
        board
    }

    /// Off-board squares read as empty.
    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        if !sq.is_on_board() { return None; }
        self.cells[sq.row as usize][sq.col as usize]
    }

    /// Writes to an off-board square are ignored.
    #[inline]
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        if sq.is_on_board() {
            self.cells[sq.row as usize][sq.col as usize] = piece;
        }
    }

    /// Removes and returns whatever stands on `sq`.
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        if !sq.is_on_board() { return None; }
        self.cells[sq.row as usize][sq.col as usize].take()
    }

    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// Copy of the grid for presentation layers.
    pub fn cells(&self) -> [[Option<Piece>; 8]; 8] {
        self.cells
    }

    /// Iterates over occupied squares, a1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|p| (sq, p)))
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, p)| p.kind == PieceKind::King && p.color == color)
            .map(|(sq, _)| sq)
    }

    pub fn piece_count(&self) -> usize {
        self.pieces().count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  +-----------------+")?;
        for row in (0..8u8).rev() {
            write!(f, "{} | ", row + 1)?;
            for col in 0..8u8 {
                match self.get(Square::new(row, col)) {
                    Some(piece) => write!(f, "{} ", piece)?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "  +-----------------+")?;
        write!(f, "    a b c d e f g h")
    }
}
