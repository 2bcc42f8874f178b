//! Per-step candidate pipeline.
//!
//! enumerate → quality (optional) → entropy (optional). Each stage returns
//! an order-preserving subsequence of its input, so the final list keeps the
//! canonical order and the radix can only shrink along the way.

mod entropy;
mod quality;

pub use entropy::{keep_flags, EntropyFilter};
pub use quality::{acceptable, QualityFilter};

use crate::config::StegoConfig;
use crate::error::StegoError;
use crate::moves::{CandidateList, MoveEnumerator};
use crate::types::{Move, Position};
use tracing::trace;

/// The candidate lists at every stage for one step.
#[derive(Debug, Clone)]
pub struct Tiers {
    pub unfiltered: CandidateList,
    pub quality: Option<CandidateList>,
    pub entropy: Option<CandidateList>,
}

impl Tiers {
    /// The list digits are taken from.
    pub fn selected(&self) -> &CandidateList {
        self.entropy
            .as_ref()
            .or(self.quality.as_ref())
            .unwrap_or(&self.unfiltered)
    }

    pub fn into_selected(self) -> CandidateList {
        self.entropy.or(self.quality).unwrap_or(self.unfiltered)
    }
}

/// Enumerator plus the configured filters. Owns the scoring oracle, if any,
/// for the lifetime of one encode or decode call.
pub struct FilterPipeline {
    enumerator: MoveEnumerator,
    quality: Option<QualityFilter>,
    entropy: Option<EntropyFilter>,
}

impl FilterPipeline {
    pub fn new(
        enumerator: MoveEnumerator,
        quality: Option<QualityFilter>,
        entropy: Option<EntropyFilter>,
    ) -> Self {
        Self {
            enumerator,
            quality,
            entropy,
        }
    }

    /// Plain enumeration, no filters.
    pub fn unfiltered() -> Self {
        Self::new(MoveEnumerator::new(), None, None)
    }

    /// Build the pipeline `config` describes, starting the oracle if needed.
    pub fn from_config(config: &StegoConfig) -> Result<Self, StegoError> {
        let quality = match &config.quality {
            Some(q) => Some(QualityFilter::from_config(q)?),
            None => None,
        };
        let entropy = config.entropy.as_ref().map(EntropyFilter::new);
        Ok(Self::new(MoveEnumerator::new(), quality, entropy))
    }

    pub fn enumerator(&self) -> &MoveEnumerator {
        &self.enumerator
    }

    #[inline]
    pub fn apply(&self, position: &Position, mv: Move) -> Position {
        self.enumerator.apply(position, mv)
    }

    /// Every stage's list for `position`.
    pub fn tiers(&mut self, position: &Position) -> Result<Tiers, StegoError> {
        let unfiltered = self.enumerator.candidates(position);

        let quality = match self.quality.as_mut() {
            Some(q) => Some(q.filter(position, &unfiltered)?),
            None => None,
        };

        let entropy = match &self.entropy {
            Some(e) => {
                let input = quality.as_ref().unwrap_or(&unfiltered);
                Some(e.filter(&self.enumerator, position, input, self.quality.as_mut())?)
            }
            None => None,
        };

        trace!(
            unfiltered = unfiltered.len(),
            quality = ?quality.as_ref().map(CandidateList::len),
            entropy = ?entropy.as_ref().map(CandidateList::len),
            "candidate tiers"
        );
        Ok(Tiers {
            unfiltered,
            quality,
            entropy,
        })
    }

    /// The final candidate list for `position`.
    pub fn candidates(&mut self, position: &Position) -> Result<CandidateList, StegoError> {
        Ok(self.tiers(position)?.into_selected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EntropyConfig, QualityConfig};

    #[test]
    fn test_unfiltered_pipeline() {
        let mut p = FilterPipeline::unfiltered();
        let tiers = p.tiers(&Position::startpos()).unwrap();
        assert!(tiers.quality.is_none() && tiers.entropy.is_none());
        assert_eq!(tiers.selected().len(), 20);
    }

    #[test]
    fn test_tiers_shrink_monotonically() {
        let config = StegoConfig {
            quality: Some(QualityConfig {
                depth: 1,
                threshold_cp: 100,
                ..Default::default()
            }),
            entropy: Some(EntropyConfig::default()),
            ..Default::default()
        };
        let mut p = FilterPipeline::from_config(&config).unwrap();
        let pos = Position::from_fen(
            "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5Q2/PPPP1PPP/RNB1K1NR w KQkq - 4 4",
        )
        .unwrap();
        let tiers = p.tiers(&pos).unwrap();
        let q = tiers.quality.as_ref().unwrap();
        let e = tiers.entropy.as_ref().unwrap();

        assert!(e.len() <= q.len() && q.len() <= tiers.unfiltered.len());
        assert!(q.is_subsequence_of(&tiers.unfiltered));
        assert!(e.is_subsequence_of(q));
        assert_eq!(tiers.selected(), e);
    }
}
