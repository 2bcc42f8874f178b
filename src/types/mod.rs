//! Core types shared by the codec, the filters and the oracles.
//!
//! # Design Principles
//! - Re-export `chess` crate types as the canonical board/move types
//! - `Position` adds the move counters the `chess` crate does not track
//! - `Score` is the oracle's centipawn/mate scale

mod position;
mod score;

pub use position::Position;
pub use score::{Score, SCORE_DRAW, SCORE_INFINITY, SCORE_MATE};

// Re-export chess crate types as canonical types
pub use chess::{
    BitBoard,
    Board,
    BoardStatus,
    ChessMove as Move,
    Color,
    File,
    MoveGen,
    Piece,
    Rank,
    Square,
    EMPTY,
};

/// Centipawn value type
pub type Value = i32;

pub const PAWN_VALUE: Value = 100;
pub const KNIGHT_VALUE: Value = 320;
pub const BISHOP_VALUE: Value = 330;
pub const ROOK_VALUE: Value = 500;
pub const QUEEN_VALUE: Value = 900;
pub const KING_VALUE: Value = 20000;

/// Material value of a piece in centipawns
#[inline]
pub const fn piece_value(piece: Piece) -> Value {
    match piece {
        Piece::Pawn => PAWN_VALUE,
        Piece::Knight => KNIGHT_VALUE,
        Piece::Bishop => BISHOP_VALUE,
        Piece::Rook => ROOK_VALUE,
        Piece::Queen => QUEEN_VALUE,
        Piece::King => KING_VALUE,
    }
}
