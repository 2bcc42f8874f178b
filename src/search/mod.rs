//! Search module for the in-process scoring oracle.
//!
//! # Architecture
//! - `Searcher`: per-thread search state (node count, deadline, abort flag)
//! - `negamax`: alpha-beta search with quiescence
//! - `ordering`: MVV-LVA capture ordering
//! - `see`: static exchange evaluation
//! - `limits`: budgets and deadlines
//!
//! Scores are produced at a fixed depth with no shared tables, so the same
//! position always receives the same score whatever thread runs it.

mod limits;
mod negamax;
mod ordering;
mod see;

pub use limits::{Deadline, SearchBudget};

use crate::error::EngineError;
use crate::types::{Board, Move, Score};

/// Node interval between deadline checks
const CHECK_INTERVAL: u64 = 1024;

/// Search statistics collected during one root-move search
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStats {
    pub nodes: u64,
}

/// Search state for one root move
pub struct Searcher {
    deadline: Deadline,
    stats: SearchStats,
    aborted: bool,
}

impl Searcher {
    pub fn new(deadline: Deadline) -> Self {
        Self {
            deadline,
            stats: SearchStats::default(),
            aborted: false,
        }
    }

    /// Get current statistics
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    #[inline]
    pub fn aborted(&self) -> bool {
        self.aborted
    }

    /// Check the deadline periodically; latches once it fires.
    #[inline]
    pub fn should_stop(&mut self) -> bool {
        if !self.aborted && self.stats.nodes % CHECK_INTERVAL == 0 && self.deadline.expired() {
            self.aborted = true;
        }
        self.aborted
    }

    #[inline]
    pub fn inc_nodes(&mut self) {
        self.stats.nodes += 1;
    }

    /// Exact score of `mv` from the side to move at `board`, searched to
    /// `depth` plies including the move itself.
    pub fn score_root_move(&mut self, board: &Board, mv: Move, depth: u32) -> Result<Score, EngineError> {
        let child = board.make_move_new(mv);
        let score = -negamax::search(
            self,
            &child,
            depth.saturating_sub(1),
            1,
            Score::neg_infinity(),
            Score::infinity(),
        );
        if self.aborted {
            return Err(EngineError::Timeout(self.deadline.limit()));
        }
        Ok(score)
    }
}
