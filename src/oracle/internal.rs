//! In-process scoring oracle.

use super::ScoringOracle;
use crate::error::EngineError;
use crate::search::{Deadline, SearchBudget, Searcher};
use crate::types::{Move, Position, Score};
use rayon::prelude::*;
use tracing::trace;

/// Fixed-depth alpha-beta over each candidate, one rayon task per move.
///
/// Each move gets its own `Searcher` and nothing is shared between them,
/// so scores depend only on the position, the move and the depth.
/// `movetime_ms` and `nodes` are ignored: both would make scores depend on
/// machine speed.
#[derive(Debug, Clone, Copy, Default)]
pub struct InternalOracle;

impl InternalOracle {
    pub fn new() -> Self {
        InternalOracle
    }
}

impl ScoringOracle for InternalOracle {
    fn score_moves(
        &mut self,
        position: &Position,
        moves: &[Move],
        budget: &SearchBudget,
    ) -> Result<Vec<Score>, EngineError> {
        let deadline = Deadline::start(budget.timeout);
        let board = position.board();

        let results: Vec<(Score, u64)> = moves
            .par_iter()
            .map(|&m| {
                let mut searcher = Searcher::new(deadline);
                let score = searcher.score_root_move(board, m, budget.depth)?;
                Ok((score, searcher.stats().nodes))
            })
            .collect::<Result<_, EngineError>>()?;

        let nodes: u64 = results.iter().map(|(_, n)| n).sum();
        trace!(moves = moves.len(), depth = budget.depth, nodes, elapsed = ?deadline.elapsed(), "internal oracle scored moves");
        Ok(results.into_iter().map(|(s, _)| s).collect())
    }
}
