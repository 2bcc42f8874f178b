//! Static Exchange Evaluation (SEE)
//!
//! Estimates the material outcome of a capture sequence on one square.
//! Quiescence uses it to skip captures that lose material.

use crate::types::{BitBoard, Board, Color, Move, Piece, Square, EMPTY};

/// Piece values for SEE (minor pieces equal)
const SEE_VALUES: [i32; 6] = [100, 300, 300, 500, 900, 20000]; // P, N, B, R, Q, K

const LVA_ORDER: [Piece; 6] = [
    Piece::Pawn,
    Piece::Knight,
    Piece::Bishop,
    Piece::Rook,
    Piece::Queen,
    Piece::King,
];

#[inline]
fn see_piece_value(piece: Piece) -> i32 {
    SEE_VALUES[piece.to_index()]
}

/// Pieces of `side` and kind `piece` attacking `target` given `occupied`
fn attackers_of(board: &Board, target: Square, piece: Piece, side: Color, occupied: BitBoard) -> BitBoard {
    let ours = *board.pieces(piece) & *board.color_combined(side) & occupied;
    let reach = match piece {
        Piece::Pawn => chess::get_pawn_attacks(target, !side, !EMPTY),
        Piece::Knight => chess::get_knight_moves(target),
        Piece::Bishop => chess::get_bishop_moves(target, occupied),
        Piece::Rook => chess::get_rook_moves(target, occupied),
        Piece::Queen => chess::get_bishop_moves(target, occupied) | chess::get_rook_moves(target, occupied),
        Piece::King => chess::get_king_moves(target),
    };
    ours & reach
}

/// Least valuable attacker of `target` for `side`
fn least_valuable_attacker(
    board: &Board,
    target: Square,
    side: Color,
    occupied: BitBoard,
) -> Option<(Square, Piece)> {
    LVA_ORDER.iter().find_map(|&piece| {
        let attackers = attackers_of(board, target, piece, side, occupied);
        (attackers != EMPTY).then(|| (attackers.to_square(), piece))
    })
}

/// Material balance of the exchange started by `mv`, from the mover's side
pub fn see(board: &Board, mv: Move) -> i32 {
    let from = mv.get_source();
    let to = mv.get_dest();

    let attacker = match board.piece_on(from) {
        Some(p) => p,
        None => return 0,
    };
    let mut gain = match board.piece_on(to) {
        Some(victim) => see_piece_value(victim),
        // En passant
        None if attacker == Piece::Pawn && from.get_file() != to.get_file() => {
            see_piece_value(Piece::Pawn)
        }
        None => return 0,
    };

    let mut on_square = attacker;
    if let Some(promo) = mv.get_promotion() {
        gain += see_piece_value(promo) - see_piece_value(Piece::Pawn);
        on_square = promo;
    }

    let mut gains = vec![gain];
    let mut occupied = *board.combined() ^ BitBoard::from_square(from);
    let mut side = !board.side_to_move();
    let mut last_value = see_piece_value(on_square);

    while let Some((sq, piece)) = least_valuable_attacker(board, to, side, occupied) {
        occupied ^= BitBoard::from_square(sq);
        gains.push(last_value);
        last_value = see_piece_value(piece);
        side = !side;
        if piece == Piece::King {
            break;
        }
    }

    // Fold from the end: each side may stop capturing
    while gains.len() > 1 {
        let theirs = gains.pop().unwrap_or(0);
        if let Some(ours) = gains.last_mut() {
            *ours -= theirs.max(0);
        }
    }
    gains.pop().unwrap_or(0)
}

/// Check if a capture does not lose material (SEE >= 0)
#[inline]
pub fn is_good_capture(board: &Board, mv: Move) -> bool {
    see(board, mv) >= 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_free_pawn() {
        let board = Board::from_str("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let mv = Move::new(Square::E4, Square::D5, None);
        assert_eq!(see(&board, mv), 100);
        assert!(is_good_capture(&board, mv));
    }

    #[test]
    fn test_defended_pawn_with_queen() {
        // Qxd5 loses the queen to the e6 pawn
        let board = Board::from_str("4k3/8/4p3/3p4/8/8/3Q4/4K3 w - - 0 1").unwrap();
        let mv = Move::new(Square::D2, Square::D5, None);
        assert_eq!(see(&board, mv), 100 - 900);
        assert!(!is_good_capture(&board, mv));
    }

    #[test]
    fn test_quiet_move_is_zero() {
        let board = Board::default();
        assert_eq!(see(&board, Move::new(Square::E2, Square::E4, None)), 0);
    }
}
