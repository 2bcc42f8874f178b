//! Canonically ordered candidate lists.

use crate::types::Move;

/// One selectable move and its SAN (the sort key).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub mv: Move,
    pub san: String,
}

/// Moves available at one step, sorted by SAN byte order.
///
/// Its length is the step's radix. Filters only ever remove entries, so a
/// filtered list is always a subsequence of the list it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateList {
    entries: Vec<Candidate>,
}

impl CandidateList {
    /// Build from unordered candidates, sorting into canonical order.
    pub fn from_unordered(mut entries: Vec<Candidate>) -> Self {
        entries.sort_by(|a, b| a.san.as_bytes().cmp(b.san.as_bytes()));
        Self { entries }
    }

    #[inline]
    pub fn radix(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.iter()
    }

    pub fn moves(&self) -> Vec<Move> {
        self.entries.iter().map(|c| c.mv).collect()
    }

    pub fn sans(&self) -> Vec<&str> {
        self.entries.iter().map(|c| c.san.as_str()).collect()
    }

    /// Index of `mv`, i.e. the digit it encodes.
    pub fn index_of(&self, mv: Move) -> Option<usize> {
        self.entries.iter().position(|c| c.mv == mv)
    }

    /// Keep the entries whose flag is set, preserving order.
    pub fn retain_flags(&self, keep: &[bool]) -> CandidateList {
        debug_assert_eq!(keep.len(), self.entries.len());
        CandidateList {
            entries: self
                .entries
                .iter()
                .zip(keep)
                .filter(|(_, &k)| k)
                .map(|(c, _)| c.clone())
                .collect(),
        }
    }

    /// True if every entry of `self` appears in `other` in the same order.
    pub fn is_subsequence_of(&self, other: &CandidateList) -> bool {
        let mut rest = other.entries.iter();
        self.entries
            .iter()
            .all(|c| rest.by_ref().any(|o| o.mv == c.mv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Square;

    fn cand(from: Square, to: Square, san: &str) -> Candidate {
        Candidate {
            mv: Move::new(from, to, None),
            san: san.to_string(),
        }
    }

    #[test]
    fn test_sorted_by_san_bytes() {
        let list = CandidateList::from_unordered(vec![
            cand(Square::E2, Square::E4, "e4"),
            cand(Square::G1, Square::F3, "Nf3"),
            cand(Square::A2, Square::A3, "a3"),
        ]);
        assert_eq!(list.sans(), ["Nf3", "a3", "e4"]);
        assert_eq!(list.index_of(Move::new(Square::E2, Square::E4, None)), Some(2));
    }

    #[test]
    fn test_retain_is_subsequence() {
        let list = CandidateList::from_unordered(vec![
            cand(Square::A2, Square::A3, "a3"),
            cand(Square::B2, Square::B3, "b3"),
            cand(Square::C2, Square::C3, "c3"),
        ]);
        let kept = list.retain_flags(&[true, false, true]);
        assert_eq!(kept.sans(), ["a3", "c3"]);
        assert!(kept.is_subsequence_of(&list));
        assert!(!list.is_subsequence_of(&kept));

        let reversed = CandidateList {
            entries: vec![list.get(2).unwrap().clone(), list.get(0).unwrap().clone()],
        };
        assert!(!reversed.is_subsequence_of(&list));
    }
}
