//! Board evaluation module.
//!
//! Static evaluation for the in-process oracle's search. The hand-crafted
//! evaluator is pure, so identical boards always score identically.

mod hce;

use crate::types::{Board, Score};

/// Evaluate the position from the side to move's point of view.
#[inline]
pub fn evaluate(board: &Board) -> Score {
    hce::evaluate(board)
}
