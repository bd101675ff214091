// src/legal.rs
//
// The single legality gate. Candidates come from the pseudo-legal generator
// and are simulated on a copy of the position; the caller's position is
// never touched.
use tracing::trace;

use crate::attacks::is_in_check;
use crate::movegen::{pseudo_legal_moves, GenMode};
use crate::moves::{Move, MoveKind};
use crate::position::Position;
use crate::types::{Color, Square};

/// Legal moves for the piece on `from`, regardless of whose turn it is.
pub fn legal_moves(pos: &Position, from: Square) -> Vec<Move> {
    let Some(piece) = pos.board.get(from) else { return Vec::new() };
    pseudo_legal_moves(pos, from, GenMode::Moves)
        .into_iter()
        .filter(|mv| {
            let leaves_check = leaves_king_in_check(pos, mv, piece.color);
            if leaves_check {
                trace!(%mv, "discarded, leaves king in check");
            }
            !leaves_check
        })
        .collect()
}

/// Every legal move for `color`.
pub fn all_legal_moves(pos: &Position, color: Color) -> Vec<Move> {
    pos.board
        .pieces()
        .filter(|(_, p)| p.color == color)
        .flat_map(|(sq, _)| legal_moves(pos, sq))
        .collect()
}

/// True when no piece of `color` has a legal move. Stops at the first one found.
pub fn has_no_legal_moves(pos: &Position, color: Color) -> bool {
    !pos.board
        .pieces()
        .filter(|(_, p)| p.color == color)
        .any(|(sq, _)| !legal_moves(pos, sq).is_empty())
}

fn leaves_king_in_check(pos: &Position, mv: &Move, color: Color) -> bool {
    let mut scratch = *pos;
    let board = &mut scratch.board;
    let mover = board.take(mv.from);
    board.set(mv.to, mover);
    match mv.kind {
        MoveKind::EnPassantCapture { captured } => board.set(captured, None),
        MoveKind::Castle { rook_from, rook_to } => {
            let rook = board.take(rook_from);
            board.set(rook_to, rook);
        }
        _ => {}
    }
    is_in_check(&scratch, color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn start_position_has_twenty_moves() {
        let pos = Position::initial();
        assert_eq!(all_legal_moves(&pos, Color::White).len(), 20);
        assert_eq!(all_legal_moves(&pos, Color::Black).len(), 20);
    }

    #[test]
    fn pinned_piece_may_only_move_along_pin() {
        let board = Board::from_pieces(&[("e1", 'K'), ("e4", 'R'), ("e8", 'r'), ("a8", 'k')]);
        let pos = Position::from_board(board, Color::White);
        let moves = legal_moves(&pos, sq("e4"));
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|m| m.to.col == 4));
    }

    #[test]
    fn king_cannot_step_into_attack() {
        let board = Board::from_pieces(&[("e1", 'K'), ("d8", 'r'), ("h8", 'k')]);
        let pos = Position::from_board(board, Color::White);
        let moves = legal_moves(&pos, sq("e1"));
        assert!(moves.iter().all(|m| m.to.col != 3));
        assert_eq!(moves.len(), 3); // e2, f1, f2
    }

    #[test]
    fn en_passant_exposing_king_is_rejected() {
        // Both pawns leave the fifth rank, opening the rook onto the king.
        let board = Board::from_pieces(&[("a5", 'K'), ("b5", 'P'), ("c5", 'p'), ("h5", 'r'), ("h8", 'k')]);
        let mut pos = Position::from_board(board, Color::White);
        pos.en_passant = Some(sq("c6"));
        let moves = legal_moves(&pos, sq("b5"));
        assert!(moves.iter().all(|m| !matches!(m.kind, MoveKind::EnPassantCapture { .. })));
        assert!(moves.iter().any(|m| m.to == sq("b6")));
    }

    #[test]
    fn simulation_leaves_position_untouched() {
        let pos = Position::initial();
        let before = pos;
        let _ = all_legal_moves(&pos, Color::White);
        assert_eq!(pos, before);
    }

    #[test]
    fn empty_square_has_no_moves() {
        assert!(legal_moves(&Position::initial(), sq("e4")).is_empty());
    }
}
