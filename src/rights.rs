// src/rights.rs
//
// One record per color of what has moved; castling availability is derived
// from it rather than stored alongside.
use serde::{Deserialize, Serialize};

use crate::board::{Board, KING_START_COL};
use crate::types::{Color, Piece, PieceKind, Square};

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CastleSide { KingSide, QueenSide }

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::KingSide, CastleSide::QueenSide];

    pub fn rook_col(&self) -> u8 {
        match self { CastleSide::KingSide => 7, CastleSide::QueenSide => 0 }
    }

    /// Column the king lands on.
    pub fn king_to_col(&self) -> u8 {
        match self { CastleSide::KingSide => 6, CastleSide::QueenSide => 2 }
    }

    /// Column the rook lands on, beside the king.
    pub fn rook_to_col(&self) -> u8 {
        match self { CastleSide::KingSide => 5, CastleSide::QueenSide => 3 }
    }

    pub fn from_rook_col(col: u8) -> Option<CastleSide> {
        match col { 7 => Some(CastleSide::KingSide), 0 => Some(CastleSide::QueenSide), _ => None }
    }

    fn index(&self) -> usize {
        match self { CastleSide::KingSide => 0, CastleSide::QueenSide => 1 }
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct SideRights {
    pub king_moved: bool,
    /// Indexed king side, queen side.
    pub rook_moved: [bool; 2],
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    pub white: SideRights,
    pub black: SideRights,
}

impl CastlingRights {
    fn initial() -> Self { Self::default() }

    /// Derives the bookkeeping from piece placement: anything off its home
    /// square counts as having moved.
    pub fn from_board(board: &Board) -> Self {
        let mut rights = CastlingRights::initial();
        for color in [Color::White, Color::Black] {
            let row = color.back_row();
            let king_home = board.get(Square::new(row, KING_START_COL)) == Some(Piece::new(PieceKind::King, color));
            let side = rights.side_mut(color);
            side.king_moved = !king_home;
            for castle in CastleSide::BOTH {
                let rook_home = board.get(Square::new(row, castle.rook_col())) == Some(Piece::new(PieceKind::Rook, color));
                side.rook_moved[castle.index()] = !rook_home;
            }
        }
        rights
    }

    pub fn side(&self, color: Color) -> &SideRights {
        match color { Color::White => &self.white, Color::Black => &self.black }
    }

    fn side_mut(&mut self, color: Color) -> &mut SideRights {
        match color { Color::White => &mut self.white, Color::Black => &mut self.black }
    }

    /// True while neither the king nor the rook for `castle` has moved.
    pub fn can_castle(&self, color: Color, castle: CastleSide) -> bool {
        let side = self.side(color);
        !side.king_moved && !side.rook_moved[castle.index()]
    }

    pub fn king_moved(&mut self, color: Color) {
        self.side_mut(color).king_moved = true;
    }

    /// Records that a rook left (or was captured on) `sq`. Only home corners matter.
    pub fn rook_left(&mut self, color: Color, sq: Square) {
        if sq.row != color.back_row() { return; }
        if let Some(castle) = CastleSide::from_rook_col(sq.col) {
            self.side_mut(color).rook_moved[castle.index()] = true;
        }
    }

    pub(crate) fn flags(&self) -> [bool; 6] {
        [
            self.white.king_moved, self.white.rook_moved[0], self.white.rook_moved[1],
            self.black.king_moved, self.black.rook_moved[0], self.black.rook_moved[1],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn king_move_removes_both_sides() {
        let mut rights = CastlingRights::from_board(&Board::initial());
        assert!(rights.can_castle(Color::White, CastleSide::KingSide));
        rights.king_moved(Color::White);
        assert!(!rights.can_castle(Color::White, CastleSide::KingSide));
        assert!(!rights.can_castle(Color::White, CastleSide::QueenSide));
        assert!(rights.can_castle(Color::Black, CastleSide::QueenSide));
    }

    #[test]
    fn rook_leaving_corner_removes_only_its_side() {
        let mut rights = CastlingRights::from_board(&Board::initial());
        rights.rook_left(Color::Black, Square::new(7, 0));
        assert!(!rights.can_castle(Color::Black, CastleSide::QueenSide));
        assert!(rights.can_castle(Color::Black, CastleSide::KingSide));

        // Off the back rank nothing changes.
        rights.rook_left(Color::Black, Square::new(3, 7));
        assert!(rights.can_castle(Color::Black, CastleSide::KingSide));
    }

    #[test]
    fn derived_from_sparse_board() {
        let board = Board::from_pieces(&[("e1", 'K'), ("h1", 'R'), ("e7", 'k'), ("a8", 'r')]);
        let rights = CastlingRights::from_board(&board);
        assert!(rights.can_castle(Color::White, CastleSide::KingSide));
        assert!(!rights.can_castle(Color::White, CastleSide::QueenSide));
        assert!(!rights.can_castle(Color::Black, CastleSide::QueenSide));
    }
}
