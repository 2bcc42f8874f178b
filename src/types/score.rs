//! Score type shared by every scoring oracle.
//!
//! Centipawns from the side to move, with mate distances folded into the
//! same integer line so that "how far behind the best move" is a plain
//! subtraction.

use std::fmt;
use std::ops::{Add, Neg, Sub};

pub const SCORE_INFINITY: i32 = 32000;
pub const SCORE_MATE: i32 = 31000;
pub const SCORE_DRAW: i32 = 0;

const SCORE_MATE_IN_MAX: i32 = SCORE_MATE - 1000;
const SCORE_MATED_IN_MAX: i32 = -SCORE_MATE + 1000;

/// An oracle score.
///
/// Mate in N plies is `SCORE_MATE - N`, mated in N plies is `-SCORE_MATE + N`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Score(pub i32);

impl Score {
    #[inline]
    pub const fn cp(centipawns: i32) -> Self {
        Score(centipawns)
    }

    /// Mate in `ply` half-moves
    #[inline]
    pub const fn mate_in(ply: i32) -> Self {
        Score(SCORE_MATE - ply)
    }

    /// Mated in `ply` half-moves
    #[inline]
    pub const fn mated_in(ply: i32) -> Self {
        Score(-SCORE_MATE + ply)
    }

    #[inline]
    pub const fn draw() -> Self {
        Score(SCORE_DRAW)
    }

    #[inline]
    pub const fn infinity() -> Self {
        Score(SCORE_INFINITY)
    }

    #[inline]
    pub const fn neg_infinity() -> Self {
        Score(-SCORE_INFINITY)
    }

    /// Convert a UCI `score mate N` (moves, signed) to plies on our scale.
    #[inline]
    pub const fn from_uci_mate(moves: i32) -> Self {
        if moves > 0 {
            Score::mate_in(2 * moves - 1)
        } else {
            Score::mated_in(-2 * moves)
        }
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn is_mate(self) -> bool {
        self.0 >= SCORE_MATE_IN_MAX
    }

    #[inline]
    pub const fn is_mated(self) -> bool {
        self.0 <= SCORE_MATED_IN_MAX
    }

    /// Centipawns this score trails `best` by (never negative).
    #[inline]
    pub fn deficit_to(self, best: Score) -> i32 {
        (best.0 - self.0).max(0)
    }
}

impl Add for Score {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Score(self.0 + rhs.0)
    }
}

impl Sub for Score {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Score(self.0 - rhs.0)
    }
}

impl Neg for Score {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Score(-self.0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_mate() {
            write!(f, "mate {}", (SCORE_MATE - self.0 + 1) / 2)
        } else if self.is_mated() {
            write!(f, "mate -{}", (self.0 + SCORE_MATE + 1) / 2)
        } else {
            write!(f, "cp {}", self.0)
        }
    }
}

impl fmt::Debug for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Score({})", self)
    }
}
