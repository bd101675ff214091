// src/movegen.rs
//
// Pseudo-legal move generation: every destination a piece's movement rule
// reaches, ignoring whether the mover's own king is left in check.
use crate::attacks::{is_in_check, is_square_attacked};
use crate::board::KING_START_COL;
use crate::moves::{Move, MoveKind};
use crate::position::Position;
use crate::rights::CastleSide;
use crate::types::{Color, Piece, PieceKind, Square};

// Directions for sliding pieces
const DIRECTIONS: &[(i8, i8, bool)] = &[ // (dr, df, is_diagonal)
    ( 1,  0, false), ( -1,  0, false), ( 0,  1, false), ( 0, -1, false), // Orthogonal
    ( 1,  1, true),  ( 1, -1, true),  (-1,  1, true),  (-1, -1, true),  // Diagonal
];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1), (0, 1),
    (1, -1), (1, 0), (1, 1),
];

/// Which squares the generator reports.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GenMode {
    /// Playable candidates, castling included.
    Moves,
    /// Squares the piece attacks: no castling, and pawns report only their
    /// diagonals.
    Attacks,
}

/// Generates pseudo-legal moves for the piece on `from`. Empty when the square is empty.
pub fn pseudo_legal_moves(pos: &Position, from: Square, mode: GenMode) -> Vec<Move> {
    let mut moves = Vec::with_capacity(28);
    if let Some(piece) = pos.board.get(from) {
        generate_moves_for_piece(pos, from, piece, mode, &mut moves);
    }
    moves
}

#[inline]
fn generate_moves_for_piece(pos: &Position, from: Square, piece: Piece, mode: GenMode, moves: &mut Vec<Move>) {
    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(pos, from, piece.color, mode, moves),
        PieceKind::Knight => generate_step_moves(pos, from, piece.color, &KNIGHT_OFFSETS, moves),
        PieceKind::Bishop => generate_sliding_moves(pos, from, piece.color, true, false, moves),
        PieceKind::Rook => generate_sliding_moves(pos, from, piece.color, false, true, moves),
        PieceKind::Queen => generate_sliding_moves(pos, from, piece.color, true, true, moves),
        PieceKind::King => {
            generate_step_moves(pos, from, piece.color, &KING_OFFSETS, moves);
            if mode == GenMode::Moves {
                generate_castling_moves(pos, from, piece.color, moves);
            }
        }
    }
}

/// Pawn pushes, double pushes, captures, en passant and promotions.
fn generate_pawn_moves(pos: &Position, from: Square, color: Color, mode: GenMode, moves: &mut Vec<Move>) {
    let dir = color.pawn_direction();
    let board = &pos.board;

    if mode == GenMode::Moves {
        if let Some(one) = from.offset(dir, 0).filter(|sq| board.is_empty(*sq)) {
            if one.row == color.promotion_row() {
                moves.push(Move::new(from, one, MoveKind::Promotion { capture: false }));
            } else {
                moves.push(Move::new(from, one, MoveKind::Quiet));
            }
            // Double push only from the start row, and only through an empty square
            if from.row == color.pawn_start_row() {
                if let Some(two) = from.offset(2 * dir, 0).filter(|sq| board.is_empty(*sq)) {
                    moves.push(Move::new(from, two, MoveKind::DoublePawnPush));
                }
            }
        }
    }

    for d_col in [-1, 1] {
        let Some(target) = from.offset(dir, d_col) else { continue };
        match board.get(target) {
            Some(p) if p.color == color => {}
            Some(_) if mode == GenMode::Moves && target.row == color.promotion_row() => {
                moves.push(Move::new(from, target, MoveKind::Promotion { capture: true }));
            }
            Some(_) => moves.push(Move::new(from, target, MoveKind::Capture)),
            None if mode == GenMode::Attacks => moves.push(Move::new(from, target, MoveKind::Quiet)),
            None => {
                if pos.en_passant == Some(target) {
                    // The pawn being taken stands beside us, on the target's column
                    let captured = Square::new(from.row, target.col);
                    if board.get(captured) == Some(Piece::new(PieceKind::Pawn, color.opponent())) {
                        moves.push(Move::new(from, target, MoveKind::EnPassantCapture { captured }));
                    }
                }
            }
        }
    }
}

/// Knight and king steps: a destination counts if it is empty or holds an enemy.
fn generate_step_moves(pos: &Position, from: Square, color: Color, offsets: &[(i8, i8)], moves: &mut Vec<Move>) {
    for &(dr, df) in offsets {
        let Some(to) = from.offset(dr, df) else { continue };
        match pos.board.get(to) {
            None => moves.push(Move::new(from, to, MoveKind::Quiet)),
            Some(p) if p.color != color => moves.push(Move::new(from, to, MoveKind::Capture)),
            Some(_) => {}
        }
    }
}

/// Rook, bishop and queen rays.
fn generate_sliding_moves(pos: &Position, from: Square, color: Color, diagonals: bool, orthogonals: bool, moves: &mut Vec<Move>) {
    for &(dr, df, is_diagonal) in DIRECTIONS {
        if !((diagonals && is_diagonal) || (orthogonals && !is_diagonal)) { continue; }
        let mut current = from;
        while let Some(next) = current.offset(dr, df) {
            match pos.board.get(next) {
                None => moves.push(Move::new(from, next, MoveKind::Quiet)),
                Some(p) => {
                    if p.color != color {
                        moves.push(Move::new(from, next, MoveKind::Capture));
                    }
                    break; // Stop after the first occupied square
                }
            }
            current = next;
        }
    }
}

/// Castling: king and rook unmoved, squares between them empty, and the king
/// neither in check nor passing through or landing on an attacked square.
fn generate_castling_moves(pos: &Position, from: Square, color: Color, moves: &mut Vec<Move>) {
    let row = color.back_row();
    if from != Square::new(row, KING_START_COL) { return; }

    let sides: Vec<CastleSide> = CastleSide::BOTH
        .into_iter()
        .filter(|side| pos.rights.can_castle(color, *side))
        .collect();
    if sides.is_empty() || is_in_check(pos, color) { return; }

    for side in sides {
        let rook_from = Square::new(row, side.rook_col());
        if pos.board.get(rook_from) != Some(Piece::new(PieceKind::Rook, color)) { continue; }

        let (low, high) = (from.col.min(rook_from.col), from.col.max(rook_from.col));
        if !(low + 1..high).all(|col| pos.board.is_empty(Square::new(row, col))) { continue; }

        let king_to = Square::new(row, side.king_to_col());
        let (path_low, path_high) = (from.col.min(king_to.col), from.col.max(king_to.col));
        let path_attacked = (path_low..=path_high)
            .filter(|col| *col != from.col)
            .any(|col| is_square_attacked(pos, Square::new(row, col), color));
        if path_attacked { continue; }

        let rook_to = Square::new(row, side.rook_to_col());
        moves.push(Move::new(from, king_to, MoveKind::Castle { rook_from, rook_to }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn targets(moves: &[Move]) -> Vec<String> {
        let mut names: Vec<String> = moves.iter().map(|m| m.to.to_string()).collect();
        names.sort();
        names
    }

    #[test]
    fn pawn_on_start_row_pushes_one_or_two() {
        let pos = Position::initial();
        let moves = pseudo_legal_moves(&pos, sq("e2"), GenMode::Moves);
        assert_eq!(targets(&moves), vec!["e3", "e4"]);
        assert!(moves.iter().any(|m| m.kind == MoveKind::DoublePawnPush && m.to == sq("e4")));
    }

    #[test]
    fn blocked_pawn_cannot_jump() {
        let board = Board::from_pieces(&[("e1", 'K'), ("e8", 'k'), ("e2", 'P'), ("e3", 'n')]);
        let pos = Position::from_board(board, Color::White);
        assert!(pseudo_legal_moves(&pos, sq("e2"), GenMode::Moves).is_empty());
    }

    #[test]
    fn pawn_attacks_only_diagonals() {
        let pos = Position::initial();
        let attacks = pseudo_legal_moves(&pos, sq("e2"), GenMode::Attacks);
        assert_eq!(targets(&attacks), vec!["d3", "f3"]);
    }

    #[test]
    fn rook_ray_stops_at_first_piece() {
        let board = Board::from_pieces(&[("a1", 'R'), ("a4", 'p'), ("c1", 'N'), ("e1", 'K'), ("e8", 'k')]);
        let pos = Position::from_board(board, Color::White);
        let moves = pseudo_legal_moves(&pos, sq("a1"), GenMode::Moves);
        assert_eq!(targets(&moves), vec!["a2", "a3", "a4", "b1"]);
        let capture = moves.iter().find(|m| m.to == sq("a4")).unwrap();
        assert_eq!(capture.kind, MoveKind::Capture);
    }

    #[test]
    fn knight_in_corner_has_two_moves() {
        let board = Board::from_pieces(&[("a1", 'N'), ("e1", 'K'), ("e8", 'k')]);
        let pos = Position::from_board(board, Color::White);
        assert_eq!(targets(&pseudo_legal_moves(&pos, sq("a1"), GenMode::Moves)), vec!["b3", "c2"]);
    }

    #[test]
    fn queen_combines_rook_and_bishop() {
        let board = Board::from_pieces(&[("d4", 'Q'), ("a1", 'K'), ("h8", 'k')]);
        let pos = Position::from_board(board, Color::White);
        assert_eq!(pseudo_legal_moves(&pos, sq("d4"), GenMode::Moves).len(), 26);
    }

    #[test]
    fn en_passant_is_tagged_with_captured_square() {
        let board = Board::from_pieces(&[("e1", 'K'), ("e8", 'k'), ("e5", 'P'), ("d5", 'p')]);
        let mut pos = Position::from_board(board, Color::White);
        pos.en_passant = Some(sq("d6"));
        let moves = pseudo_legal_moves(&pos, sq("e5"), GenMode::Moves);
        let ep = moves.iter().find(|m| m.to == sq("d6")).unwrap();
        assert_eq!(ep.kind, MoveKind::EnPassantCapture { captured: sq("d5") });
    }

    #[test]
    fn promotion_moves_are_tagged() {
        let board = Board::from_pieces(&[("e1", 'K'), ("a8", 'k'), ("g7", 'P'), ("h8", 'r')]);
        let pos = Position::from_board(board, Color::White);
        let moves = pseudo_legal_moves(&pos, sq("g7"), GenMode::Moves);
        assert!(moves.contains(&Move::new(sq("g7"), sq("g8"), MoveKind::Promotion { capture: false })));
        assert!(moves.contains(&Move::new(sq("g7"), sq("h8"), MoveKind::Promotion { capture: true })));
    }

    #[test]
    fn attack_mode_omits_castling() {
        let board = Board::from_pieces(&[("e1", 'K'), ("h1", 'R'), ("a1", 'R'), ("e8", 'k')]);
        let pos = Position::from_board(board, Color::White);
        let gen = pseudo_legal_moves(&pos, sq("e1"), GenMode::Moves);
        assert_eq!(gen.iter().filter(|m| m.is_castle()).count(), 2);
        let attacks = pseudo_legal_moves(&pos, sq("e1"), GenMode::Attacks);
        assert!(attacks.iter().all(|m| !m.is_castle()));
    }

    #[test]
    fn castling_blocked_by_piece_between() {
        let board = Board::from_pieces(&[("e1", 'K'), ("a1", 'R'), ("b1", 'N'), ("e8", 'k')]);
        let pos = Position::from_board(board, Color::White);
        let gen = pseudo_legal_moves(&pos, sq("e1"), GenMode::Moves);
        assert!(gen.iter().all(|m| !m.is_castle()));
    }
}
