//! Move ordering heuristics.
//!
//! Good ordering is what makes alpha-beta prune. Captures go first by
//! MVV-LVA, then promotions, then quiet moves in generator order. Ties keep
//! generator order, which keeps the search deterministic.

use super::see;
use crate::types::{piece_value, Board, Move};

const PROMOTION_BONUS: i32 = 100_000;
const GOOD_CAPTURE_BONUS: i32 = 60_000;
const BAD_CAPTURE_PENALTY: i32 = -10_000;

/// MVV-LVA score for capture ordering
#[inline]
fn mvv_lva_score(board: &Board, m: Move) -> i32 {
    match (board.piece_on(m.get_dest()), board.piece_on(m.get_source())) {
        (Some(victim), Some(attacker)) => piece_value(victim) * 10 - piece_value(attacker),
        _ => 0,
    }
}

/// Score a move for ordering (higher = search first)
#[inline]
fn score_move(board: &Board, m: Move) -> i32 {
    let mut score = 0;

    if let Some(promo) = m.get_promotion() {
        score += piece_value(promo) + PROMOTION_BONUS;
    }

    if board.piece_on(m.get_dest()).is_some() {
        score += mvv_lva_score(board, m);
        score += if see::is_good_capture(board, m) {
            GOOD_CAPTURE_BONUS
        } else {
            BAD_CAPTURE_PENALTY
        };
    }

    score
}

/// Sort moves best-first for the main search (stable)
pub fn order_moves(board: &Board, moves: &mut [Move]) {
    moves.sort_by_cached_key(|&m| -score_move(board, m));
}

/// Sort captures by MVV-LVA for quiescence (stable)
pub fn order_captures(board: &Board, moves: &mut [Move]) {
    moves.sort_by_cached_key(|&m| -mvv_lva_score(board, m));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MoveGen, Square};
    use std::str::FromStr;

    #[test]
    fn test_captures_first() {
        // Pawn can take a queen, knight can take a pawn
        let board = Board::from_str("4k3/8/8/3q4/4P3/2p5/8/1N2K3 w - - 0 1").unwrap();
        let mut moves: Vec<Move> = MoveGen::new_legal(&board).collect();
        order_moves(&board, &mut moves);
        assert_eq!(moves[0], Move::new(Square::E4, Square::D5, None));
        assert_eq!(moves[1], Move::new(Square::B1, Square::C3, None));
    }

    #[test]
    fn test_capture_ordering_by_victim() {
        let board = Board::from_str("4k3/8/8/3q4/4P3/2p5/8/1N2K3 w - - 0 1").unwrap();
        let mut caps = vec![
            Move::new(Square::B1, Square::C3, None),
            Move::new(Square::E4, Square::D5, None),
        ];
        order_captures(&board, &mut caps);
        assert_eq!(caps[0].get_dest(), Square::D5);
    }
}
