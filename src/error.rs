//! Error types for engine commands.
//!
//! Every rejected command leaves the engine exactly as it was before the call.

use crate::types::{PieceKind, Square};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Square is empty or holds a piece of the side not to move.
    #[error("No piece of the side to move on {0}")]
    InvalidSelection(Square),

    #[error("Illegal move: {from} to {to}")]
    IllegalMove { from: Square, to: Square },

    #[error("No promotion is pending")]
    NoPendingPromotion,

    /// Any command other than resolving the promotion while one is in flight.
    #[error("A promotion must be resolved first")]
    PromotionPending,

    #[error("Cannot promote to {0:?}")]
    InvalidPromotion(PieceKind),

    #[error("The game is over")]
    GameOver,

    #[error("No moves to undo")]
    EmptyHistory,

    #[error("Position has not occurred three times; no draw to claim")]
    DrawClaimInvalid,

    #[error("Invalid square: '{0}'")]
    InvalidSquare(String),
}

/// Failures while writing the move history to disk.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error with file '{0}': {1}")]
    Io(String, #[source] std::io::Error),
}
