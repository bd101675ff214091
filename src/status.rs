// src/status.rs
use serde::{Deserialize, Serialize};

use crate::attacks::is_in_check;
use crate::board::Board;
use crate::legal::has_no_legal_moves;
use crate::position::Position;
use crate::types::{Color, PieceKind};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    Stalemate,
    InsufficientMaterial,
    ThreefoldRepetition,
}

/// Status flags for the side to move.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct GameStatus {
    pub turn: Color,
    pub check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
    pub draw: Option<DrawReason>,
    pub game_over: bool,
}

impl GameStatus {
    /// A fresh, undecided status.
    pub fn in_play(turn: Color) -> Self {
        GameStatus { turn, check: false, checkmate: false, stalemate: false, draw: None, game_over: false }
    }

    /// The side that delivered mate, if any.
    pub fn winner(&self) -> Option<Color> {
        self.checkmate.then(|| self.turn.opponent())
    }

    pub fn is_draw(&self) -> bool {
        self.draw.is_some()
    }
}

// --- Game Termination Status Check ---
/// Re-derives check, checkmate, stalemate and material draws for the side to move.
pub fn evaluate(pos: &Position) -> GameStatus {
    let mut status = GameStatus::in_play(pos.turn);
    status.check = is_in_check(pos, pos.turn);

    if has_no_legal_moves(pos, pos.turn) {
        if status.check {
            status.checkmate = true;
        } else {
            status.stalemate = true;
            status.draw = Some(DrawReason::Stalemate);
        }
        status.game_over = true;
    }

    // Checked independently of mate; a bare-kings board is drawn even in check.
    if is_insufficient_material(&pos.board) {
        status.draw = Some(DrawReason::InsufficientMaterial);
        status.game_over = true;
    }

    status
}

/// King vs king, or king and a single bishop or knight vs king.
pub fn is_insufficient_material(board: &Board) -> bool {
    match board.piece_count() {
        2 => true,
        3 => board
            .pieces()
            .any(|(_, p)| matches!(p.kind, PieceKind::Bishop | PieceKind::Knight)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_is_undecided() {
        let status = evaluate(&Position::initial());
        assert_eq!(status, GameStatus::in_play(Color::White));
    }

    #[test]
    fn back_rank_mate() {
        let board = Board::from_pieces(&[("g1", 'K'), ("f2", 'P'), ("g2", 'P'), ("h2", 'P'), ("a1", 'r'), ("a8", 'k')]);
        let status = evaluate(&Position::from_board(board, Color::White));
        assert!(status.check && status.checkmate && status.game_over);
        assert_eq!(status.winner(), Some(Color::Black));
        assert!(!status.is_draw());
    }

    #[test]
    fn cornered_king_is_stalemated() {
        let board = Board::from_pieces(&[("a8", 'k'), ("b6", 'Q'), ("c1", 'K')]);
        let status = evaluate(&Position::from_board(board, Color::Black));
        assert!(!status.check);
        assert!(status.stalemate && status.game_over);
        assert_eq!(status.draw, Some(DrawReason::Stalemate));
    }

    #[test]
    fn minor_piece_endings_are_drawn() {
        assert!(is_insufficient_material(&Board::from_pieces(&[("a1", 'K'), ("h8", 'k')])));
        assert!(is_insufficient_material(&Board::from_pieces(&[("a1", 'K'), ("h8", 'k'), ("c3", 'b')])));
        assert!(is_insufficient_material(&Board::from_pieces(&[("a1", 'K'), ("h8", 'k'), ("c3", 'N')])));
        assert!(!is_insufficient_material(&Board::from_pieces(&[("a1", 'K'), ("h8", 'k'), ("c3", 'R')])));
        assert!(!is_insufficient_material(&Board::from_pieces(&[("a1", 'K'), ("h8", 'k'), ("c3", 'B'), ("c4", 'b')])));
    }
}
