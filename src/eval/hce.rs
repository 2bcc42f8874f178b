//! Hand-crafted evaluation.
//!
//! Tapered between midgame and endgame by non-pawn material:
//! material, piece-square tables, bishop pair, pawn structure and rooks on
//! open files.

use crate::types::{BitBoard, Board, Color, Piece, Rank, Score, Square, EMPTY};

/// Midgame/endgame material, indexed by `Piece::to_index` (king unused)
const MATERIAL: [(i32, i32); 6] = [
    (100, 120),
    (320, 300),
    (330, 320),
    (500, 550),
    (900, 950),
    (0, 0),
];

// Piece-square tables, rank 8 first, read through `pst_index`.

#[rustfmt::skip]
const PAWN_MG: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const PAWN_EG: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    80, 80, 80, 80, 80, 80, 80, 80,
    50, 50, 50, 50, 50, 50, 50, 50,
    30, 30, 30, 30, 30, 30, 30, 30,
    20, 20, 20, 20, 20, 20, 20, 20,
    10, 10, 10, 10, 10, 10, 10, 10,
     5,  5,  5,  5,  5,  5,  5,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT: [i32; 64] = [
   -50,-40,-30,-30,-30,-30,-40,-50,
   -40,-20,  0,  0,  0,  0,-20,-40,
   -30,  0, 10, 15, 15, 10,  0,-30,
   -30,  5, 15, 20, 20, 15,  5,-30,
   -30,  0, 15, 20, 20, 15,  0,-30,
   -30,  5, 10, 15, 15, 10,  5,-30,
   -40,-20,  0,  5,  5,  0,-20,-40,
   -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP: [i32; 64] = [
   -20,-10,-10,-10,-10,-10,-10,-20,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -10,  0,  5, 10, 10,  5,  0,-10,
   -10,  5,  5, 10, 10,  5,  5,-10,
   -10,  0, 10, 10, 10, 10,  0,-10,
   -10, 10, 10, 10, 10, 10, 10,-10,
   -10,  5,  0,  0,  0,  0,  5,-10,
   -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN: [i32; 64] = [
   -20,-10,-10, -5, -5,-10,-10,-20,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -10,  0,  5,  5,  5,  5,  0,-10,
    -5,  0,  5,  5,  5,  5,  0, -5,
     0,  0,  5,  5,  5,  5,  0, -5,
   -10,  5,  5,  5,  5,  5,  0,-10,
   -10,  0,  5,  0,  0,  0,  0,-10,
   -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_MG: [i32; 64] = [
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -20,-30,-30,-40,-40,-30,-30,-20,
   -10,-20,-20,-20,-20,-20,-20,-10,
    20, 20,  0,  0,  0,  0, 20, 20,
    20, 30, 10,  0,  0, 10, 30, 20,
];

#[rustfmt::skip]
const KING_EG: [i32; 64] = [
   -50,-40,-30,-20,-20,-30,-40,-50,
   -30,-20,-10,  0,  0,-10,-20,-30,
   -30,-10, 20, 30, 30, 20,-10,-30,
   -30,-10, 30, 40, 40, 30,-10,-30,
   -30,-10, 30, 40, 40, 30,-10,-30,
   -30,-10, 20, 30, 30, 20,-10,-30,
   -30,-30,  0,  0,  0,  0,-30,-30,
   -50,-30,-30,-30,-30,-30,-30,-50,
];

const BISHOP_PAIR: i32 = 30;
const DOUBLED_PAWN: i32 = -10;
const ISOLATED_PAWN: i32 = -20;
/// Passed pawn bonus by relative rank
const PASSED_PAWN: [i32; 8] = [0, 10, 20, 40, 60, 90, 130, 0];
const ROOK_OPEN_FILE: i32 = 20;
const ROOK_SEMI_OPEN_FILE: i32 = 10;
const ROOK_ON_SEVENTH: i32 = 30;

/// Phase weights of knight, bishop, rook, queen
const PHASE_WEIGHTS: [i32; 4] = [1, 1, 2, 4];
const PHASE_TOTAL: i32 = 24;

const FILE_A: u64 = 0x0101_0101_0101_0101;

/// Midgame and endgame sums, White positive
#[derive(Debug, Default, Clone, Copy)]
struct Terms {
    mg: i32,
    eg: i32,
}

impl Terms {
    #[inline]
    fn add(&mut self, sign: i32, mg: i32, eg: i32) {
        self.mg += sign * mg;
        self.eg += sign * eg;
    }

    #[inline]
    fn add_both(&mut self, sign: i32, v: i32) {
        self.add(sign, v, v);
    }
}

/// 256 with all pieces on the board, 0 with only kings and pawns.
fn game_phase(board: &Board) -> i32 {
    let phase: i32 = [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen]
        .iter()
        .zip(PHASE_WEIGHTS)
        .map(|(&p, w)| board.pieces(p).popcnt() as i32 * w)
        .sum();
    (phase.min(PHASE_TOTAL) * 256 + PHASE_TOTAL / 2) / PHASE_TOTAL
}

#[inline]
fn taper(terms: Terms, phase: i32) -> i32 {
    (terms.mg * phase + terms.eg * (256 - phase)) / 256
}

/// Table index for `sq`, mirrored so both colours read the same table
#[inline]
fn pst_index(sq: Square, color: Color) -> usize {
    match color {
        Color::White => sq.to_index() ^ 56,
        Color::Black => sq.to_index(),
    }
}

#[inline]
fn file_mask(file: usize) -> BitBoard {
    BitBoard::new(FILE_A << file)
}

#[inline]
fn adjacent_files(file: usize) -> BitBoard {
    let mut mask = 0u64;
    if file > 0 {
        mask |= FILE_A << (file - 1);
    }
    if file < 7 {
        mask |= FILE_A << (file + 1);
    }
    BitBoard::new(mask)
}

/// Squares strictly ahead of `rank` from `color`'s point of view
#[inline]
fn ranks_ahead(rank: usize, color: Color) -> BitBoard {
    match color {
        Color::White if rank >= 7 => EMPTY,
        Color::White => BitBoard::new(!0u64 << ((rank + 1) * 8)),
        Color::Black => BitBoard::new((1u64 << (rank * 8)) - 1),
    }
}

fn pawn_terms(board: &Board, color: Color, sign: i32, terms: &mut Terms) {
    let ours = *board.pieces(Piece::Pawn) & *board.color_combined(color);
    let theirs = *board.pieces(Piece::Pawn) & *board.color_combined(!color);

    for sq in ours {
        let idx = pst_index(sq, color);
        terms.add(sign, PAWN_MG[idx], PAWN_EG[idx]);

        let file = sq.get_file().to_index();
        let rank = sq.get_rank().to_index();

        if (ours & file_mask(file)).popcnt() > 1 {
            terms.add_both(sign, DOUBLED_PAWN);
        }
        if ours & adjacent_files(file) == EMPTY {
            terms.add_both(sign, ISOLATED_PAWN);
        }

        let span = (file_mask(file) | adjacent_files(file)) & ranks_ahead(rank, color);
        if theirs & span == EMPTY {
            let relative = match color {
                Color::White => rank,
                Color::Black => 7 - rank,
            };
            let bonus = PASSED_PAWN[relative];
            terms.add(sign, bonus / 2, bonus);
        }
    }
}

fn piece_terms(board: &Board, color: Color, sign: i32, terms: &mut Terms) {
    let mine = *board.color_combined(color);
    let all_pawns = *board.pieces(Piece::Pawn);
    let our_pawns = all_pawns & mine;
    let seventh = match color {
        Color::White => Rank::Seventh,
        Color::Black => Rank::Second,
    };

    for sq in *board.pieces(Piece::Knight) & mine {
        terms.add_both(sign, KNIGHT[pst_index(sq, color)]);
    }

    let bishops = *board.pieces(Piece::Bishop) & mine;
    for sq in bishops {
        terms.add_both(sign, BISHOP[pst_index(sq, color)]);
    }
    if bishops.popcnt() >= 2 {
        terms.add_both(sign, BISHOP_PAIR);
    }

    for sq in *board.pieces(Piece::Rook) & mine {
        terms.add_both(sign, ROOK[pst_index(sq, color)]);
        let file = file_mask(sq.get_file().to_index());
        if all_pawns & file == EMPTY {
            terms.add_both(sign, ROOK_OPEN_FILE);
        } else if our_pawns & file == EMPTY {
            terms.add_both(sign, ROOK_SEMI_OPEN_FILE);
        }
        if sq.get_rank() == seventh {
            terms.add_both(sign, ROOK_ON_SEVENTH);
        }
    }

    for sq in *board.pieces(Piece::Queen) & mine {
        terms.add_both(sign, QUEEN[pst_index(sq, color)]);
    }

    let king = pst_index(board.king_square(color), color);
    terms.add(sign, KING_MG[king], KING_EG[king]);
}

/// Evaluate from the side to move's point of view
pub fn evaluate(board: &Board) -> Score {
    let mut terms = Terms::default();

    for (color, sign) in [(Color::White, 1), (Color::Black, -1)] {
        let mine = *board.color_combined(color);
        for piece in [Piece::Pawn, Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
            let count = (*board.pieces(piece) & mine).popcnt() as i32;
            let (mg, eg) = MATERIAL[piece.to_index()];
            terms.add(sign, mg * count, eg * count);
        }
        pawn_terms(board, color, sign, &mut terms);
        piece_terms(board, color, sign, &mut terms);
    }

    let white = taper(terms, game_phase(board));
    match board.side_to_move() {
        Color::White => Score::cp(white),
        Color::Black => Score::cp(-white),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_starting_position() {
        let score = evaluate(&Board::default());
        assert_eq!(score, Score::cp(0));
        assert_eq!(game_phase(&Board::default()), 256);
    }

    #[test]
    fn test_material_advantage() {
        // White up a queen
        let board =
            Board::from_str("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
        assert!(evaluate(&board).raw() > 800);

        let board =
            Board::from_str("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1").unwrap();
        assert!(evaluate(&board).raw() < -800);
    }

    #[test]
    fn test_passed_pawn_in_endgame() {
        let board = Board::from_str("4k3/8/1P6/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(game_phase(&board), 0);
        assert!(evaluate(&board).raw() > 120);
    }

    #[test]
    fn test_symmetric_position_is_balanced() {
        let board = Board::from_str(
            "r1bqkb1r/pppp1ppp/2n2n2/4p3/4P3/2N2N2/PPPP1PPP/R1BQKB1R w KQkq - 4 4",
        )
        .unwrap();
        assert_eq!(evaluate(&board), Score::cp(0));
    }
}
