//! Quality filter: drop moves an oracle judges clearly worse than the best.

use crate::config::QualityConfig;
use crate::error::EngineError;
use crate::moves::CandidateList;
use crate::oracle::{self, ScoringOracle};
use crate::search::SearchBudget;
use crate::types::{Position, Score};
use tracing::trace;

/// Keeps a candidate when it ties the best score or trails it by strictly
/// less than `threshold_cp`. Output is an order-preserving subsequence of
/// the input.
pub struct QualityFilter {
    oracle: Box<dyn ScoringOracle>,
    budget: SearchBudget,
    threshold_cp: i32,
    widen_below_two: bool,
}

impl QualityFilter {
    pub fn new(oracle: Box<dyn ScoringOracle>, config: &QualityConfig) -> Self {
        Self {
            oracle,
            budget: config.budget(),
            threshold_cp: config.threshold_cp,
            widen_below_two: config.widen_below_two,
        }
    }

    /// Acquire the configured oracle and wrap it.
    pub fn from_config(config: &QualityConfig) -> Result<Self, EngineError> {
        let oracle = oracle::open(&config.engine, config.timeout())?;
        Ok(Self::new(oracle, config))
    }

    pub fn filter(
        &mut self,
        position: &Position,
        candidates: &CandidateList,
    ) -> Result<CandidateList, EngineError> {
        if candidates.len() < 2 {
            return Ok(candidates.clone());
        }

        let moves = candidates.moves();
        let scores = self.oracle.score_moves(position, &moves, &self.budget)?;
        if scores.len() != moves.len() {
            return Err(EngineError::Protocol(format!(
                "oracle returned {} scores for {} moves",
                scores.len(),
                moves.len()
            )));
        }

        let keep = acceptable(&scores, self.threshold_cp);
        let kept = candidates.retain_flags(&keep);
        trace!(
            input = candidates.len(),
            kept = kept.len(),
            best = %scores.iter().copied().max().unwrap_or_default(),
            "quality filter"
        );

        if kept.len() < 2 && self.widen_below_two {
            return Ok(candidates.clone());
        }
        Ok(kept)
    }
}

/// Acceptance flags: tie with the best, or less than `threshold_cp` behind.
pub fn acceptable(scores: &[Score], threshold_cp: i32) -> Vec<bool> {
    let Some(best) = scores.iter().copied().max() else {
        return Vec::new();
    };
    scores
        .iter()
        .map(|&s| s == best || s.deficit_to(best) < threshold_cp)
        .collect()
}
