// src/zobrist.rs
use lazy_static::lazy_static;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::legal::legal_moves;
use crate::moves::MoveKind;
use crate::position::Position;
use crate::types::{Color, Square};

lazy_static! {
    static ref ZOBRIST: ZobristTable = ZobristTable::new();
}

// --- Zobrist Hashing ---
#[derive(Debug, Clone)]
struct ZobristTable {
    // piece[color][piece_type][square]
    piece_keys: [[[u64; 64]; 6]; 2],
    // One key per castling bookkeeping flag, XORed in while the flag is set
    rights_keys: [u64; 6],
    en_passant_keys: [u64; 64],
    black_to_move_key: u64,
}

impl ZobristTable {
    fn new() -> Self {
        // Fixed seed so keys are stable between runs
        let mut rng = StdRng::seed_from_u64(0xDEADBEEFCAFEBABE);
        let mut table = ZobristTable {
            piece_keys: [[[0; 64]; 6]; 2],
            rights_keys: [0; 6],
            en_passant_keys: [0; 64],
            black_to_move_key: rng.next_u64(),
        };

        for color in table.piece_keys.iter_mut() {
            for kind in color.iter_mut() {
                for key in kind.iter_mut() {
                    *key = rng.next_u64();
                }
            }
        }
        for key in table.rights_keys.iter_mut() {
            *key = rng.next_u64();
        }
        for key in table.en_passant_keys.iter_mut() {
            *key = rng.next_u64();
        }

        table
    }
}

/// Hash of everything that makes two positions the same for repetition purposes.
pub fn position_key(pos: &Position) -> u64 {
    let zob = &*ZOBRIST;
    let mut key = 0u64;

    for (sq, piece) in pos.board.pieces() {
        key ^= zob.piece_keys[piece.color.index()][piece.kind.index()][sq.index()];
    }
    for (flag, rights_key) in pos.rights.flags().iter().zip(zob.rights_keys.iter()) {
        if *flag { key ^= rights_key; }
    }
    if let Some(ep) = pos.en_passant.filter(|ep| en_passant_capturable(pos, *ep)) {
        key ^= zob.en_passant_keys[ep.index()];
    }
    if pos.turn == Color::Black {
        key ^= zob.black_to_move_key;
    }

    key
}

/// A target nobody can capture on leaves the position unchanged.
fn en_passant_capturable(pos: &Position, target: Square) -> bool {
    let behind = -pos.turn.pawn_direction();
    [-1, 1]
        .into_iter()
        .filter_map(|d_col| target.offset(behind, d_col))
        .flat_map(|from| legal_moves(pos, from))
        .any(|mv| mv.to == target && matches!(mv.kind, MoveKind::EnPassantCapture { .. }))
}
