//! Negamax alpha-beta search with quiescence.
//!
//! - Fail-hard alpha-beta over legal moves
//! - Mate scores relative to the root ply
//! - Quiescence over captures at the horizon, SEE-pruned

use super::{ordering, see, Searcher};
use crate::eval;
use crate::types::{Board, BoardStatus, Move, MoveGen, Score};

/// Full-width search to `depth`, then quiescence.
pub fn search(
    searcher: &mut Searcher,
    board: &Board,
    depth: u32,
    ply: i32,
    mut alpha: Score,
    beta: Score,
) -> Score {
    searcher.inc_nodes();
    if searcher.should_stop() {
        return Score::draw();
    }

    match board.status() {
        BoardStatus::Checkmate => return Score::mated_in(ply),
        BoardStatus::Stalemate => return Score::draw(),
        BoardStatus::Ongoing => {}
    }

    if depth == 0 {
        return quiescence(searcher, board, ply, alpha, beta);
    }

    let mut moves: Vec<Move> = MoveGen::new_legal(board).collect();
    ordering::order_moves(board, &mut moves);

    for m in moves {
        let child = board.make_move_new(m);
        let score = -search(searcher, &child, depth - 1, ply + 1, -beta, -alpha);

        if searcher.aborted() {
            return Score::draw();
        }
        if score >= beta {
            return beta;
        }
        if score > alpha {
            alpha = score;
        }
    }

    alpha
}

/// Quiescence search - captures only, to avoid the horizon effect
fn quiescence(
    searcher: &mut Searcher,
    board: &Board,
    ply: i32,
    mut alpha: Score,
    beta: Score,
) -> Score {
    searcher.inc_nodes();
    if searcher.should_stop() {
        return Score::draw();
    }

    // Stand pat
    let stand_pat = eval::evaluate(board);
    if stand_pat >= beta {
        return beta;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }

    let targets = *board.color_combined(!board.side_to_move());
    let mut moves = MoveGen::new_legal(board);
    moves.set_iterator_mask(targets);
    let mut captures: Vec<Move> = moves
        .filter(|&m| see::is_good_capture(board, m))
        .collect();
    ordering::order_captures(board, &mut captures);

    for m in captures {
        let child = board.make_move_new(m);
        let score = -quiescence(searcher, &child, ply + 1, -beta, -alpha);

        if searcher.aborted() {
            return Score::draw();
        }
        if score >= beta {
            return beta;
        }
        if score > alpha {
            alpha = score;
        }
    }

    alpha
}
