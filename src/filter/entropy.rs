//! Entropy filter: prefer moves that leave the game wide open.
//!
//! Each candidate is weighed by the branching factor of the position it
//! leads to, since a wider next step carries more bits per move.

use super::QualityFilter;
use crate::config::{BranchingMeasure, EntropyConfig, EntropyMode};
use crate::error::StegoError;
use crate::moves::{CandidateList, MoveEnumerator};
use crate::types::Position;
use rayon::prelude::*;
use tracing::trace;

#[derive(Debug, Clone, Copy)]
pub struct EntropyFilter {
    mode: EntropyMode,
    measure: BranchingMeasure,
}

impl EntropyFilter {
    pub fn new(config: &EntropyConfig) -> Self {
        Self {
            mode: config.mode,
            measure: config.branching,
        }
    }

    /// Order-preserving subsequence of `candidates`, or `candidates` itself
    /// when fewer than two moves would survive.
    ///
    /// `quality` is used to measure successors only when the branching
    /// measure asks for it.
    pub fn filter(
        &self,
        enumerator: &MoveEnumerator,
        position: &Position,
        candidates: &CandidateList,
        quality: Option<&mut QualityFilter>,
    ) -> Result<CandidateList, StegoError> {
        if candidates.len() < 2 {
            return Ok(candidates.clone());
        }

        let widths = self.branching(enumerator, position, candidates, quality)?;
        let keep = keep_flags(self.mode, &widths);
        let kept = candidates.retain_flags(&keep);
        trace!(
            input = candidates.len(),
            kept = kept.len(),
            ?widths,
            "entropy filter"
        );

        if kept.len() < 2 {
            return Ok(candidates.clone());
        }
        Ok(kept)
    }

    /// Successor branching factor per candidate, in candidate order.
    fn branching(
        &self,
        enumerator: &MoveEnumerator,
        position: &Position,
        candidates: &CandidateList,
        quality: Option<&mut QualityFilter>,
    ) -> Result<Vec<usize>, StegoError> {
        match (self.measure, quality) {
            (BranchingMeasure::Quality, Some(quality)) => {
                // Sequential: the oracle is a single engine
                let mut widths = Vec::with_capacity(candidates.len());
                for c in candidates.iter() {
                    let next = enumerator.apply(position, c.mv);
                    let options = enumerator.candidates(&next);
                    widths.push(quality.filter(&next, &options)?.len());
                }
                Ok(widths)
            }
            _ => {
                let moves = candidates.moves();
                Ok(moves
                    .par_iter()
                    .map(|&mv| enumerator.branching(&enumerator.apply(position, mv)))
                    .collect())
            }
        }
    }
}

/// Which widths survive `mode`.
pub fn keep_flags(mode: EntropyMode, widths: &[usize]) -> Vec<bool> {
    match mode {
        EntropyMode::AboveMean { percent } => {
            // Weak when width / mean < percent / 100
            let n = widths.len() as u128;
            let total: u128 = widths.iter().map(|&w| w as u128).sum();
            if total == 0 {
                return vec![true; widths.len()];
            }
            widths
                .iter()
                .map(|&w| (w as u128) * n * 100 >= percent as u128 * total)
                .collect()
        }
        EntropyMode::MinBranching { min } => widths.iter().map(|&w| w >= min).collect(),
        EntropyMode::TopK { k } => {
            let mut sorted = widths.to_vec();
            sorted.sort_unstable_by(|a, b| b.cmp(a));
            let cut = match k.min(sorted.len()).checked_sub(1) {
                Some(i) => sorted[i],
                None => return vec![false; widths.len()],
            };
            widths.iter().map(|&w| w >= cut).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_above_mean() {
        // Mean 20, so 90% is 18
        let widths = [10, 18, 17, 35, 20];
        assert_eq!(
            keep_flags(EntropyMode::AboveMean { percent: 90 }, &widths),
            [false, true, false, true, true]
        );
        assert_eq!(
            keep_flags(EntropyMode::AboveMean { percent: 90 }, &[0, 0]),
            [true, true]
        );
    }

    #[test]
    fn test_min_branching_and_top_k() {
        let widths = [10, 30, 20, 30, 5];
        assert_eq!(
            keep_flags(EntropyMode::MinBranching { min: 20 }, &widths),
            [false, true, true, true, false]
        );
        // Ties with the k-th widest are kept
        assert_eq!(
            keep_flags(EntropyMode::TopK { k: 1 }, &widths),
            [false, true, false, true, false]
        );
        assert_eq!(
            keep_flags(EntropyMode::TopK { k: 3 }, &widths),
            [false, true, true, true, false]
        );
        assert_eq!(keep_flags(EntropyMode::TopK { k: 99 }, &widths), [true; 5]);
    }

    #[test]
    fn test_filter_on_real_position() {
        let e = MoveEnumerator::new();
        let pos = Position::from_fen(
            "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5Q2/PPPP1PPP/RNB1K1NR w KQkq - 4 4",
        )
        .unwrap();
        let all = e.candidates(&pos);
        assert_eq!(all.len(), 41);

        let filter = EntropyFilter::new(&EntropyConfig::default());
        let kept = filter.filter(&e, &pos, &all, None).unwrap();
        assert!(kept.is_subsequence_of(&all));
        // Bxf7+ leaves a single reply and Qf6 blocks the queen in
        assert_eq!(kept.len(), 39);
        assert!(!kept.sans().contains(&"Bxf7+"));
        assert!(!kept.sans().contains(&"Qf6"));
    }

    #[test]
    fn test_falls_back_below_two() {
        let e = MoveEnumerator::new();
        let pos = Position::startpos();
        let all = e.candidates(&pos);
        let filter = EntropyFilter::new(&EntropyConfig {
            mode: EntropyMode::MinBranching { min: 1000 },
            ..Default::default()
        });
        assert_eq!(filter.filter(&e, &pos, &all, None).unwrap(), all);
    }
}
