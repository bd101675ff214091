// src/attacks.rs
use crate::movegen::{pseudo_legal_moves, GenMode};
use crate::position::Position;
use crate::types::{Color, Square};

// --- Attack Generation ---
/// Checks whether any piece of the side opposing `defending` attacks `target`.
/// Attackers are generated in attack mode, so castling never counts.
pub fn is_square_attacked(pos: &Position, target: Square, defending: Color) -> bool {
    let attacker = defending.opponent();
    pos.board
        .pieces()
        .filter(|(_, piece)| piece.color == attacker)
        .any(|(from, _)| {
            pseudo_legal_moves(pos, from, GenMode::Attacks)
                .iter()
                .any(|mv| mv.to == target)
        })
}

/// True if `color`'s king is attacked. A board without that king is never in check.
pub fn is_in_check(pos: &Position, color: Color) -> bool {
    match pos.board.find_king(color) {
        Some(king_sq) => is_square_attacked(pos, king_sq, color),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn rook_attacks_along_open_file_only() {
        let board = Board::from_pieces(&[("e1", 'K'), ("a8", 'k'), ("e7", 'r'), ("d7", 'n')]);
        let pos = Position::from_board(board, Color::White);
        assert!(is_in_check(&pos, Color::White));
        assert!(is_square_attacked(&pos, sq("e3"), Color::White));
        assert!(!is_square_attacked(&pos, sq("d1"), Color::White));
    }

    #[test]
    fn blocked_ray_does_not_attack() {
        let board = Board::from_pieces(&[("e1", 'K'), ("a8", 'k'), ("e7", 'r'), ("e2", 'P')]);
        let pos = Position::from_board(board, Color::White);
        assert!(!is_in_check(&pos, Color::White));
    }

    #[test]
    fn pawn_push_square_is_not_attacked() {
        let board = Board::from_pieces(&[("a1", 'K'), ("h8", 'k'), ("d5", 'p')]);
        let pos = Position::from_board(board, Color::White);
        assert!(!is_square_attacked(&pos, sq("d4"), Color::White));
        assert!(is_square_attacked(&pos, sq("c4"), Color::White));
        assert!(is_square_attacked(&pos, sq("e4"), Color::White));
    }

    #[test]
    fn missing_king_is_never_in_check() {
        let board = Board::from_pieces(&[("e8", 'k'), ("e1", 'Q')]);
        let pos = Position::from_board(board, Color::White);
        assert!(!is_in_check(&pos, Color::White));
        assert!(is_in_check(&pos, Color::Black));
    }
}
