//! Immutable game position.

use crate::error::StegoError;
use chess::{BitBoard, Board, BoardStatus, ChessMove, Color, MoveGen, Piece, EMPTY};
use std::fmt;
use std::str::FromStr;

/// Light squares (b1, d1, ..., a2, ...)
const LIGHT_SQUARES: u64 = 0x55AA_55AA_55AA_55AA;

/// Board state plus the move counters.
///
/// Playing a move produces a new `Position`; nothing is mutated in place.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Position {
    board: Board,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Position {
    /// The standard initial position
    pub fn startpos() -> Self {
        Self {
            board: Board::default(),
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Parse a FEN string. The two counter fields are optional.
    pub fn from_fen(fen: &str) -> Result<Self, StegoError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(StegoError::PositionInvalid(format!(
                "FEN needs at least 4 fields: '{fen}'"
            )));
        }
        let board = Board::from_str(&fields[..4].join(" "))
            .map_err(|e| StegoError::PositionInvalid(format!("'{fen}': {e}")))?;

        let counter = |idx: usize, default: u32| -> Result<u32, StegoError> {
            match fields.get(idx) {
                Some(s) => s.parse().map_err(|_| {
                    StegoError::PositionInvalid(format!("bad move counter '{s}' in '{fen}'"))
                }),
                None => Ok(default),
            }
        };

        Ok(Self {
            board,
            halfmove_clock: counter(4, 0)?,
            fullmove_number: counter(5, 1)?.max(1),
        })
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        *self.board.checkers() != EMPTY
    }

    #[inline]
    pub fn is_checkmate(&self) -> bool {
        self.board.status() == BoardStatus::Checkmate
    }

    /// Number of legal moves (the unfiltered branching factor)
    #[inline]
    pub fn legal_move_count(&self) -> usize {
        MoveGen::new_legal(&self.board).len()
    }

    /// Apply a legal move, producing the successor position.
    pub fn play(&self, mv: ChessMove) -> Position {
        let resets_clock = self.board.piece_on(mv.get_source()) == Some(Piece::Pawn)
            || self.board.piece_on(mv.get_dest()).is_some();
        let fullmove_number = if self.board.side_to_move() == Color::Black {
            self.fullmove_number + 1
        } else {
            self.fullmove_number
        };

        Position {
            board: self.board.make_move_new(mv),
            halfmove_clock: if resets_clock { 0 } else { self.halfmove_clock + 1 },
            fullmove_number,
        }
    }

    /// No legal continuation, or neither side can ever mate.
    pub fn is_terminal(&self) -> bool {
        self.board.status() != BoardStatus::Ongoing || self.has_insufficient_material()
    }

    /// Bare kings, a lone minor piece, or only bishops that all share a square colour.
    pub fn has_insufficient_material(&self) -> bool {
        let b = &self.board;
        let heavy = *b.pieces(Piece::Pawn) | *b.pieces(Piece::Rook) | *b.pieces(Piece::Queen);
        if heavy != EMPTY {
            return false;
        }

        let knights = b.pieces(Piece::Knight).popcnt();
        let bishops = *b.pieces(Piece::Bishop);
        if knights + bishops.popcnt() <= 1 {
            return true;
        }
        if knights > 0 {
            return false;
        }

        let light = BitBoard::new(LIGHT_SQUARES);
        (bishops & light) == EMPTY || (bishops & !light) == EMPTY
    }

    /// Full six-field FEN
    pub fn fen(&self) -> String {
        let board_fen = self.board.to_string();
        let head: Vec<&str> = board_fen.split_whitespace().take(4).collect();
        format!(
            "{} {} {}",
            head.join(" "),
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl FromStr for Position {
    type Err = StegoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fen())
    }
}
