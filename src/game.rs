// src/game.rs
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, trace};

use crate::attacks::{is_in_check, is_square_attacked};
use crate::board::Board;
use crate::error::EngineError;
use crate::history::{format_move_list, CastlingMove, EnPassantCapture, MoveRecord};
use crate::legal::{all_legal_moves, has_no_legal_moves, legal_moves};
use crate::moves::{Move, MoveKind};
use crate::position::Position;
use crate::rights::{CastleSide, CastlingRights};
use crate::status::{evaluate, is_insufficient_material, DrawReason, GameStatus};
use crate::types::{Color, Piece, PieceKind, Square};
use crate::zobrist::position_key;

/// Pieces taken so far, listed under the side that took them.
#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct CapturedPieces {
    pub by_white: Vec<Piece>,
    pub by_black: Vec<Piece>,
}

impl CapturedPieces {
    pub fn by(&self, capturer: Color) -> &[Piece] {
        match capturer { Color::White => &self.by_white, Color::Black => &self.by_black }
    }

    fn by_mut(&mut self, capturer: Color) -> &mut Vec<Piece> {
        match capturer { Color::White => &mut self.by_white, Color::Black => &mut self.by_black }
    }
}

/// A pawn move that reached the last rank and waits for a piece type.
#[derive(Debug, Clone)]
struct PendingPromotion {
    record: MoveRecord,
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    AwaitingPromotion(PendingPromotion),
}

/// Result of a successful `apply_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move is complete and the turn has passed.
    Completed(GameStatus),
    /// The pawn on `square` waits for `resolve_promotion`.
    PromotionPending { square: Square },
}

/// Owns one game: the position, its history and the derived status.
/// Independent instances can be cloned for lookahead.
#[derive(Debug, Clone)]
pub struct Engine {
    position: Position,
    status: GameStatus,
    phase: Phase,
    selected: Option<Square>,
    selected_moves: Vec<Move>,
    history: Vec<MoveRecord>,
    captured: CapturedPieces,
    /// Parallel to `history`, plus the starting position.
    position_keys: Vec<u64>,
}

impl Default for Engine {
    fn default() -> Self { Engine::new() }
}

impl Engine {
    /// Creates a new game from the standard starting position.
    pub fn new() -> Self {
        Engine::from_position(Position::initial())
    }

    /// Starts from an arbitrary board. Kings and rooks off their home squares
    /// count as having moved.
    pub fn from_board(board: Board, turn: Color) -> Self {
        Engine::from_position(Position::from_board(board, turn))
    }

    fn from_position(position: Position) -> Self {
        Engine {
            status: evaluate(&position),
            position_keys: vec![position_key(&position)],
            position,
            phase: Phase::Idle,
            selected: None,
            selected_moves: Vec::new(),
            history: Vec::new(),
            captured: CapturedPieces::default(),
        }
    }

    /// Restores the starting position and clears history, captures and rights.
    /// Accepted in every state, including a pending promotion.
    pub fn reset(&mut self) {
        debug!("game reset");
        *self = Engine::new();
    }

    // --- Queries ---

    pub fn position(&self) -> &Position { &self.position }

    pub fn board(&self) -> &Board { &self.position.board }

    pub fn board_snapshot(&self) -> [[Option<Piece>; 8]; 8] { self.position.board.cells() }

    pub fn turn(&self) -> Color { self.position.turn }

    pub fn status(&self) -> GameStatus { self.status }

    pub fn captured_pieces(&self) -> &CapturedPieces { &self.captured }

    pub fn move_history(&self) -> &[MoveRecord] { &self.history }

    pub fn en_passant_target(&self) -> Option<Square> { self.position.en_passant }

    pub fn castling_rights(&self) -> &CastlingRights { &self.position.rights }

    /// Legal moves for whatever stands on `square`; empty for an empty square.
    pub fn legal_moves(&self, square: Square) -> Vec<Move> {
        legal_moves(&self.position, square)
    }

    pub fn all_legal_moves(&self, color: Color) -> Vec<Move> {
        all_legal_moves(&self.position, color)
    }

    pub fn is_square_under_attack(&self, square: Square, defending: Color) -> bool {
        is_square_attacked(&self.position, square, defending)
    }

    pub fn is_check(&self, color: Color) -> bool {
        is_in_check(&self.position, color)
    }

    pub fn has_no_legal_moves(&self, color: Color) -> bool {
        has_no_legal_moves(&self.position, color)
    }

    pub fn is_insufficient_material(&self) -> bool {
        is_insufficient_material(&self.position.board)
    }

    /// Square of the pawn waiting to be promoted, if any.
    pub fn pending_promotion(&self) -> Option<Square> {
        match &self.phase {
            Phase::AwaitingPromotion(pending) => Some(pending.record.to),
            Phase::Idle => None,
        }
    }

    pub fn selected(&self) -> Option<Square> { self.selected }

    /// Legal moves cached for the selected square.
    pub fn selected_moves(&self) -> &[Move] { &self.selected_moves }

    /// How many times the current position has occurred, this occurrence included.
    pub fn repetition_count(&self) -> usize {
        match self.position_keys.last() {
            Some(current) => self.position_keys.iter().filter(|k| *k == current).count(),
            None => 0,
        }
    }

    // --- Commands ---

    fn ensure_accepting_moves(&self) -> Result<(), EngineError> {
        if self.pending_promotion().is_some() {
            return Err(EngineError::PromotionPending);
        }
        if self.status.game_over {
            return Err(EngineError::GameOver);
        }
        Ok(())
    }

    fn own_piece(&self, square: Square) -> Result<Piece, EngineError> {
        self.position
            .board
            .get(square)
            .filter(|p| p.color == self.position.turn)
            .ok_or(EngineError::InvalidSelection(square))
    }

    /// Selects a piece of the side to move and caches its legal moves.
    pub fn select(&mut self, square: Square) -> Result<&[Move], EngineError> {
        self.ensure_accepting_moves()?;
        self.own_piece(square)?;
        self.selected_moves = legal_moves(&self.position, square);
        self.selected = Some(square);
        debug!(%square, moves = self.selected_moves.len(), "square selected");
        Ok(&self.selected_moves)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.selected_moves.clear();
    }

    /// Plays the legal move from `from` to `to`. A pawn reaching the last rank
    /// leaves the engine waiting for `resolve_promotion`.
    pub fn apply_move(&mut self, from: Square, to: Square) -> Result<MoveOutcome, EngineError> {
        self.ensure_accepting_moves()?;
        let piece = self.own_piece(from)?;

        let found = if self.selected == Some(from) {
            self.selected_moves.iter().copied().find(|m| m.to == to)
        } else {
            legal_moves(&self.position, from).into_iter().find(|m| m.to == to)
        };
        let mv = match found {
            Some(mv) => mv,
            None => {
                trace!(%from, %to, "rejected illegal move");
                return Err(EngineError::IllegalMove { from, to });
            }
        };

        self.clear_selection();
        Ok(self.play(mv, piece))
    }

    /// Finishes a pending promotion with `kind` and passes the turn.
    pub fn resolve_promotion(&mut self, kind: PieceKind) -> Result<GameStatus, EngineError> {
        if self.pending_promotion().is_none() {
            return Err(EngineError::NoPendingPromotion);
        }
        if !kind.is_promotion_choice() {
            return Err(EngineError::InvalidPromotion(kind));
        }
        self.promote(kind);
        Ok(self.status)
    }

    /// Takes back the most recent completed move and returns its record.
    /// `check` is re-derived for the restored side to move.
    pub fn undo_move(&mut self) -> Result<MoveRecord, EngineError> {
        if self.pending_promotion().is_some() {
            return Err(EngineError::PromotionPending);
        }
        self.take_back().ok_or(EngineError::EmptyHistory)
    }

    /// Ends the game as a draw when the current position has occurred three times.
    pub fn claim_draw(&mut self) -> Result<GameStatus, EngineError> {
        self.ensure_accepting_moves()?;
        if self.repetition_count() < 3 {
            return Err(EngineError::DrawClaimInvalid);
        }
        self.status.draw = Some(DrawReason::ThreefoldRepetition);
        self.status.game_over = true;
        info!("draw claimed by threefold repetition");
        Ok(self.status)
    }

    /// Counts leaf positions `depth` plies ahead, each promotion piece separately.
    /// Plays and takes back every move; status and selection are restored
    /// afterwards, so a finished game stays finished.
    /// Returns 0 while a promotion is pending.
    pub fn perft(&mut self, depth: u32) -> u64 {
        if self.pending_promotion().is_some() { return 0; }

        let status = self.status;
        let selected = self.selected.take();
        let selected_moves = std::mem::take(&mut self.selected_moves);

        let nodes = self.count_nodes(depth);

        self.status = status;
        self.selected = selected;
        self.selected_moves = selected_moves;
        nodes
    }

    fn count_nodes(&mut self, depth: u32) -> u64 {
        if depth == 0 { return 1; }

        let mut nodes = 0;
        for mv in all_legal_moves(&self.position, self.position.turn) {
            let Some(piece) = self.position.board.get(mv.from) else { continue };
            let choices: Vec<Option<PieceKind>> = match mv.kind {
                MoveKind::Promotion { .. } => PieceKind::PROMOTION_CHOICES.into_iter().map(Some).collect(),
                _ => vec![None],
            };
            for choice in choices {
                self.play(mv, piece);
                if let Some(kind) = choice {
                    self.promote(kind);
                }
                nodes += self.count_nodes(depth - 1);
                self.take_back();
            }
        }
        nodes
    }

    // --- Move Execution ---

    /// Applies every side effect of an already-validated move.
    fn play(&mut self, mv: Move, piece: Piece) -> MoveOutcome {
        let color = piece.color;
        let pos = &mut self.position;

        let mut record = MoveRecord {
            from: mv.from,
            to: mv.to,
            piece,
            captured: pos.board.get(mv.to),
            prior_en_passant: pos.en_passant,
            prior_rights: pos.rights,
            en_passant_capture: None,
            castling: None,
            promotion: None,
        };

        match mv.kind {
            MoveKind::EnPassantCapture { captured } => {
                if let Some(pawn) = pos.board.take(captured) {
                    record.en_passant_capture = Some(EnPassantCapture { square: captured, pawn });
                    self.captured.by_mut(color).push(pawn);
                }
            }
            MoveKind::Castle { rook_from, rook_to } => {
                let rook = pos.board.take(rook_from);
                pos.board.set(rook_to, rook);
                record.castling = Some(CastlingMove { rook_from_col: rook_from.col, rook_to_col: rook_to.col });
            }
            _ => {}
        }

        pos.board.set(mv.from, None);
        pos.board.set(mv.to, Some(piece));
        if let Some(taken) = record.captured {
            self.captured.by_mut(color).push(taken);
            if taken.kind == PieceKind::Rook {
                pos.rights.rook_left(taken.color, mv.to);
            }
        }

        pos.en_passant = match mv.kind {
            MoveKind::DoublePawnPush => Some(Square::new((mv.from.row + mv.to.row) / 2, mv.from.col)),
            _ => None,
        };

        match piece.kind {
            PieceKind::King => pos.rights.king_moved(color),
            PieceKind::Rook => pos.rights.rook_left(color, mv.from),
            _ => {}
        }

        if let MoveKind::Promotion { .. } = mv.kind {
            debug!(%mv, "awaiting promotion choice");
            self.phase = Phase::AwaitingPromotion(PendingPromotion { record });
            return MoveOutcome::PromotionPending { square: mv.to };
        }

        self.finalize(record);
        MoveOutcome::Completed(self.status)
    }

    fn promote(&mut self, kind: PieceKind) {
        if let Phase::AwaitingPromotion(pending) = std::mem::replace(&mut self.phase, Phase::Idle) {
            let mut record = pending.record;
            record.promotion = Some(kind);
            self.position.board.set(record.to, Some(Piece::new(kind, record.piece.color)));
            self.finalize(record);
        }
    }

    /// Pushes the record, passes the turn and re-derives the status.
    fn finalize(&mut self, record: MoveRecord) {
        debug!(mv = %record, color = %record.piece.color, "move applied");
        self.history.push(record);
        self.position.turn = self.position.turn.opponent();
        self.position_keys.push(position_key(&self.position));
        self.status = evaluate(&self.position);

        if self.status.checkmate {
            info!(winner = %self.position.turn.opponent(), "checkmate");
        } else if let Some(reason) = self.status.draw {
            info!(?reason, "game drawn");
        }
    }

    fn take_back(&mut self) -> Option<MoveRecord> {
        let record = self.history.pop()?;
        let mover = record.piece.color;
        let board = &mut self.position.board;

        board.set(record.from, Some(record.piece));
        board.set(record.to, record.captured);
        if let Some(ep) = record.en_passant_capture {
            board.set(ep.square, Some(ep.pawn));
            self.captured.by_mut(mover).pop();
        }
        if let Some(castling) = record.castling {
            let row = record.from.row;
            let rook = board.take(Square::new(row, castling.rook_to_col));
            board.set(Square::new(row, castling.rook_from_col), rook);
        }
        if record.captured.is_some() {
            self.captured.by_mut(mover).pop();
        }

        self.position.en_passant = record.prior_en_passant;
        self.position.rights = record.prior_rights;
        self.position.turn = mover;
        self.position_keys.pop();
        self.clear_selection();

        self.status = GameStatus {
            check: is_in_check(&self.position, mover),
            ..GameStatus::in_play(mover)
        };
        debug!(mv = %record, "move undone");
        Some(record)
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // --- Captured Pieces ---
        for capturer in [Color::White, Color::Black] {
            write!(f, "Captured by {}: ", capturer)?;
            let mut sorted = self.captured.by(capturer).to_vec();
            sorted.sort_by_key(|p| p.value());
            for piece in sorted { write!(f, "{} ", piece)?; }
            writeln!(f)?;
        }
        writeln!(f, "---------------------")?;

        writeln!(f, "{}", self.position.board)?;

        // --- Game State Info ---
        writeln!(f, "Turn: {}", self.position.turn)?;
        let rights = &self.position.rights;
        let flag = |color, side, c: char| if rights.can_castle(color, side) { c } else { '-' };
        writeln!(f, "Castling: W:{}{}, B:{}{}",
            flag(Color::White, CastleSide::KingSide, 'K'),
            flag(Color::White, CastleSide::QueenSide, 'Q'),
            flag(Color::Black, CastleSide::KingSide, 'k'),
            flag(Color::Black, CastleSide::QueenSide, 'q'),
        )?;
        match self.position.en_passant {
            Some(ep) => writeln!(f, "En Passant Target: {}", ep)?,
            None => writeln!(f, "En Passant Target: -")?,
        }

        if !self.history.is_empty() {
            writeln!(f, "Move History:")?;
            writeln!(f, "{}", format_move_list(&self.history))?;
        }

        let reps = self.repetition_count();
        if reps > 1 { writeln!(f, "Position Repetitions: {}", reps)?; }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn play(engine: &mut Engine, from: &str, to: &str) -> MoveOutcome {
        engine.apply_move(sq(from), sq(to)).unwrap()
    }

    #[test]
    fn select_rejects_empty_and_enemy_squares() {
        let mut engine = Engine::new();
        assert_eq!(engine.select(sq("e4")), Err(EngineError::InvalidSelection(sq("e4"))));
        assert_eq!(engine.select(sq("e7")), Err(EngineError::InvalidSelection(sq("e7"))));
        assert_eq!(engine.selected(), None);

        let moves = engine.select(sq("g1")).unwrap().len();
        assert_eq!(moves, 2);
        assert_eq!(engine.selected(), Some(sq("g1")));
    }

    #[test]
    fn illegal_move_changes_nothing() {
        let mut engine = Engine::new();
        let before = *engine.position();
        assert_eq!(
            engine.apply_move(sq("e2"), sq("e5")),
            Err(EngineError::IllegalMove { from: sq("e2"), to: sq("e5") })
        );
        assert_eq!(*engine.position(), before);
        assert!(engine.move_history().is_empty());
    }

    #[test]
    fn double_push_sets_and_next_move_clears_en_passant() {
        let mut engine = Engine::new();
        play(&mut engine, "e2", "e4");
        assert_eq!(engine.en_passant_target(), Some(sq("e3")));
        play(&mut engine, "g8", "f6");
        assert_eq!(engine.en_passant_target(), None);
    }

    #[test]
    fn apply_then_undo_restores_everything() {
        let mut engine = Engine::new();
        play(&mut engine, "e2", "e4");
        play(&mut engine, "d7", "d5");
        let before = engine.clone();
        play(&mut engine, "e4", "d5");
        assert_eq!(engine.captured_pieces().by_white, vec![Piece::new(PieceKind::Pawn, Color::Black)]);

        let record = engine.undo_move().unwrap();
        assert_eq!(record.notation(), "xd5");
        assert_eq!(engine.position(), before.position());
        assert_eq!(engine.captured_pieces(), before.captured_pieces());
        assert_eq!(engine.status(), before.status());
        assert_eq!(engine.repetition_count(), 1);
    }

    #[test]
    fn undo_with_empty_history_is_rejected_without_change() {
        let mut engine = Engine::new();
        assert_eq!(engine.undo_move(), Err(EngineError::EmptyHistory));
        assert_eq!(*engine.position(), Position::initial());
    }

    #[test]
    fn rook_captured_on_corner_loses_castling_side() {
        let board = Board::from_pieces(&[("e1", 'K'), ("h1", 'R'), ("e8", 'k'), ("h8", 'r'), ("a8", 'r')]);
        let mut engine = Engine::from_board(board, Color::White);
        play(&mut engine, "h1", "h8");
        assert!(!engine.castling_rights().can_castle(Color::Black, CastleSide::KingSide));
        assert!(engine.castling_rights().can_castle(Color::Black, CastleSide::QueenSide));
        engine.undo_move().unwrap();
        assert!(engine.castling_rights().can_castle(Color::Black, CastleSide::KingSide));
    }

    #[test]
    fn commands_are_refused_after_game_over() {
        let mut engine = Engine::from_board(Board::from_pieces(&[("a1", 'K'), ("h8", 'k')]), Color::White);
        assert!(engine.status().game_over);
        assert_eq!(engine.apply_move(sq("a1"), sq("a2")), Err(EngineError::GameOver));
        assert_eq!(engine.select(sq("a1")), Err(EngineError::GameOver));
    }

    #[test]
    fn knight_shuffle_allows_threefold_claim() {
        let mut engine = Engine::new();
        assert_eq!(engine.claim_draw(), Err(EngineError::DrawClaimInvalid));
        for _ in 0..2 {
            play(&mut engine, "g1", "f3");
            play(&mut engine, "g8", "f6");
            play(&mut engine, "f3", "g1");
            play(&mut engine, "f6", "g8");
        }
        assert_eq!(engine.repetition_count(), 3);
        let status = engine.claim_draw().unwrap();
        assert_eq!(status.draw, Some(DrawReason::ThreefoldRepetition));
        assert!(status.game_over);
    }

    #[test]
    fn perft_from_start() {
        let mut engine = Engine::new();
        assert_eq!(engine.perft(1), 20);
        assert_eq!(engine.perft(2), 400);
        assert!(engine.move_history().is_empty());
        assert_eq!(*engine.position(), Position::initial());
    }

    #[test]
    fn reset_clears_pending_promotion() {
        let board = Board::from_pieces(&[("e1", 'K'), ("a8", 'k'), ("g7", 'P')]);
        let mut engine = Engine::from_board(board, Color::White);
        assert_eq!(play(&mut engine, "g7", "g8"), MoveOutcome::PromotionPending { square: sq("g8") });
        engine.reset();
        assert_eq!(engine.pending_promotion(), None);
        assert_eq!(*engine.position(), Position::initial());
    }
}
