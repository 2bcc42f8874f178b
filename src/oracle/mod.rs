//! Scoring oracles consumed by the quality filter.
//!
//! An oracle scores a set of candidate moves in one position under a
//! budget. Any failure (no process, timeout, missing scores) is an error:
//! a filter must never quietly keep moves it could not score, since the
//! decoder would then see a different radix.

mod internal;
mod uci;

pub use internal::InternalOracle;
pub use uci::{EngineLine, InfoLine, UciEngine};

use crate::config::EngineSpec;
use crate::error::EngineError;
use crate::search::SearchBudget;
use crate::types::{Move, Position, Score};
use std::time::Duration;
use tracing::info;

/// Capability to score moves.
pub trait ScoringOracle {
    /// One score per entry of `moves`, in the same order, from the point of
    /// view of the side to move in `position`.
    fn score_moves(
        &mut self,
        position: &Position,
        moves: &[Move],
        budget: &SearchBudget,
    ) -> Result<Vec<Score>, EngineError>;
}

impl<T: ScoringOracle + ?Sized> ScoringOracle for Box<T> {
    fn score_moves(
        &mut self,
        position: &Position,
        moves: &[Move],
        budget: &SearchBudget,
    ) -> Result<Vec<Score>, EngineError> {
        (**self).score_moves(position, moves, budget)
    }
}

/// Acquire the oracle described by `spec`. Dropping it releases the engine.
pub fn open(spec: &EngineSpec, timeout: Duration) -> Result<Box<dyn ScoringOracle>, EngineError> {
    match spec {
        EngineSpec::Internal => {
            info!("using internal scoring oracle");
            Ok(Box::new(InternalOracle::new()))
        }
        EngineSpec::Uci {
            path,
            args,
            options,
        } => {
            let engine = UciEngine::spawn(path, args, options, timeout)?;
            info!(path = %path, name = ?engine.name(), "using UCI engine");
            Ok(Box::new(engine))
        }
    }
}
