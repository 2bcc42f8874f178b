//! Move enumeration in canonical order.
//!
//! The enumerator is the codec's only view of the rules. It is a pure
//! function of the position: the same position always yields the same list,
//! whatever thread asks or whatever was asked before.

mod candidates;

pub use candidates::{Candidate, CandidateList};

use crate::notation::san_all;
use crate::types::{Move, MoveGen, Position};

/// Stateless front end over the rules engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveEnumerator;

impl MoveEnumerator {
    pub fn new() -> Self {
        MoveEnumerator
    }

    /// Every legal move, SAN-sorted.
    pub fn legal_moves(&self, position: &Position) -> CandidateList {
        CandidateList::from_unordered(
            san_all(position.board())
                .into_iter()
                .map(|(mv, san)| Candidate { mv, san })
                .collect(),
        )
    }

    /// Legal moves that keep the game going, SAN-sorted.
    ///
    /// A move whose successor is terminal is never a candidate, so a radix of
    /// zero means every continuation ends the game.
    pub fn candidates(&self, position: &Position) -> CandidateList {
        if position.is_terminal() {
            return CandidateList::default();
        }
        CandidateList::from_unordered(
            san_all(position.board())
                .into_iter()
                .filter(|(mv, _)| !position.play(*mv).is_terminal())
                .map(|(mv, san)| Candidate { mv, san })
                .collect(),
        )
    }

    /// Number of candidates without building their SAN.
    pub fn branching(&self, position: &Position) -> usize {
        if position.is_terminal() {
            return 0;
        }
        MoveGen::new_legal(position.board())
            .filter(|mv| !position.play(*mv).is_terminal())
            .count()
    }

    #[inline]
    pub fn apply(&self, position: &Position, mv: Move) -> Position {
        position.play(mv)
    }

    #[inline]
    pub fn is_terminal(&self, position: &Position) -> bool {
        position.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_candidates() {
        let e = MoveEnumerator::new();
        let list = e.candidates(&Position::startpos());
        assert_eq!(list.radix(), 20);
        assert_eq!(list.get(0).map(|c| c.san.as_str()), Some("Na3"));
        assert_eq!(list.get(19).map(|c| c.san.as_str()), Some("h4"));
        assert_eq!(e.branching(&Position::startpos()), 20);
    }

    #[test]
    fn test_deterministic() {
        let e = MoveEnumerator::new();
        let pos = Position::from_fen(
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
        )
        .unwrap();
        assert_eq!(e.candidates(&pos), e.candidates(&pos.clone()));
    }

    #[test]
    fn test_game_ending_moves_excluded() {
        let e = MoveEnumerator::new();
        // Ra8 mates; it is legal but not a candidate
        let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        assert!(e.legal_moves(&pos).sans().contains(&"Ra8#"));
        assert!(!e.candidates(&pos).sans().iter().any(|s| s.starts_with("Ra8")));
        assert_eq!(e.candidates(&pos).radix(), e.legal_moves(&pos).radix() - 1);
        assert_eq!(e.branching(&pos), e.candidates(&pos).radix());
    }

    #[test]
    fn test_capture_into_bare_kings_excluded() {
        let e = MoveEnumerator::new();
        // Kxb2 leaves two bare kings
        let pos = Position::from_fen("4k3/8/8/8/8/8/1p6/K7 w - - 0 1").unwrap();
        let sans = e.candidates(&pos).sans().join(" ");
        assert!(!sans.contains("Kxb2"));
        assert!(e.legal_moves(&pos).sans().contains(&"Kxb2"));
    }

    #[test]
    fn test_terminal_has_no_candidates() {
        let e = MoveEnumerator::new();
        let stalemate = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(e.is_terminal(&stalemate));
        assert!(e.candidates(&stalemate).is_empty());
        assert_eq!(e.branching(&stalemate), 0);
    }
}
