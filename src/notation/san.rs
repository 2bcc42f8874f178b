//! Standard algebraic notation and UCI coordinate moves.
//!
//! SAN strings are the sort key of the canonical move order, so the rendering
//! here must match the reference games byte for byte: minimal disambiguation
//! (file first, then rank), `x` on captures including en passant, `=Q`
//! promotions, `O-O`/`O-O-O`, and a `+`/`#` suffix.

use crate::error::NotationError;
use crate::types::{Board, BoardStatus, File, Move, MoveGen, Piece, Square, EMPTY};

#[inline]
fn piece_letter(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'P',
        Piece::Knight => 'N',
        Piece::Bishop => 'B',
        Piece::Rook => 'R',
        Piece::Queen => 'Q',
        Piece::King => 'K',
    }
}

#[inline]
fn file_char(sq: Square) -> char {
    (b'a' + sq.get_file().to_index() as u8) as char
}

#[inline]
fn rank_char(sq: Square) -> char {
    (b'1' + sq.get_rank().to_index() as u8) as char
}

/// SAN for a single legal move.
pub fn san(board: &Board, mv: Move) -> String {
    let legal: Vec<Move> = MoveGen::new_legal(board).collect();
    san_among(board, mv, &legal)
}

/// SAN for every legal move, in move generator order.
pub fn san_all(board: &Board) -> Vec<(Move, String)> {
    let legal: Vec<Move> = MoveGen::new_legal(board).collect();
    legal
        .iter()
        .map(|&m| (m, san_among(board, m, &legal)))
        .collect()
}

/// SAN for `mv` given the full legal move list (used for disambiguation).
pub fn san_among(board: &Board, mv: Move, legal: &[Move]) -> String {
    let from = mv.get_source();
    let to = mv.get_dest();
    let piece = match board.piece_on(from) {
        Some(p) => p,
        None => return format_uci(mv),
    };

    let mut out = String::with_capacity(8);
    let file_delta = from.get_file().to_index() as i32 - to.get_file().to_index() as i32;

    if piece == Piece::King && file_delta.abs() == 2 {
        out.push_str(if to.get_file() == File::G { "O-O" } else { "O-O-O" });
    } else {
        let capture = board.piece_on(to).is_some() || (piece == Piece::Pawn && file_delta != 0);

        if piece == Piece::Pawn {
            if capture {
                out.push(file_char(from));
                out.push('x');
            }
            out.push(file_char(to));
            out.push(rank_char(to));
            if let Some(promo) = mv.get_promotion() {
                out.push('=');
                out.push(piece_letter(promo));
            }
        } else {
            out.push(piece_letter(piece));

            let mut same_rank = false;
            let mut same_file = false;
            let mut ambiguous = false;
            for other in legal {
                let src = other.get_source();
                if other.get_dest() == to && src != from && board.piece_on(src) == Some(piece) {
                    ambiguous = true;
                    same_rank |= src.get_rank() == from.get_rank();
                    same_file |= src.get_file() == from.get_file();
                }
            }
            if ambiguous {
                if same_rank || !same_file {
                    out.push(file_char(from));
                }
                if same_file {
                    out.push(rank_char(from));
                }
            }

            if capture {
                out.push('x');
            }
            out.push(file_char(to));
            out.push(rank_char(to));
        }
    }

    let after = board.make_move_new(mv);
    if *after.checkers() != EMPTY {
        out.push(if after.status() == BoardStatus::Checkmate { '#' } else { '+' });
    }
    out
}

/// Strip check marks and annotation glyphs, and accept `0-0` castling.
pub fn normalize_san(token: &str) -> String {
    let trimmed = token.trim_end_matches(['+', '#', '!', '?']);
    match trimmed {
        "0-0" => "O-O".to_string(),
        "0-0-0" => "O-O-O".to_string(),
        other => other.replace("e.p.", ""),
    }
}

/// Resolve a SAN token (or a UCI coordinate move) against the legal moves.
pub fn parse_san(board: &Board, token: &str) -> Result<Move, NotationError> {
    let wanted = normalize_san(token);
    if let Some((mv, _)) = san_all(board)
        .into_iter()
        .find(|(_, s)| normalize_san(s) == wanted)
    {
        return Ok(mv);
    }

    parse_uci(board, token).ok_or_else(|| NotationError::UnknownMove {
        token: token.to_string(),
        fen: board.to_string(),
    })
}

/// Parse a UCI move string (e.g., "e2e4", "e7e8q") into a legal move
pub fn parse_uci(board: &Board, move_str: &str) -> Option<Move> {
    let move_str = move_str.trim();
    if !(4..=5).contains(&move_str.len()) || !move_str.is_ascii() {
        return None;
    }

    let from: Square = move_str[0..2].parse().ok()?;
    let to: Square = move_str[2..4].parse().ok()?;

    let promo = match move_str.chars().nth(4) {
        None => None,
        Some('q' | 'Q') => Some(Piece::Queen),
        Some('r' | 'R') => Some(Piece::Rook),
        Some('b' | 'B') => Some(Piece::Bishop),
        Some('n' | 'N') => Some(Piece::Knight),
        Some(_) => return None,
    };

    MoveGen::new_legal(board)
        .find(|m| m.get_source() == from && m.get_dest() == to && m.get_promotion() == promo)
}

/// Format a move in UCI notation (e.g., "e2e4", "e7e8q")
pub fn format_uci(m: Move) -> String {
    let mut s = format!("{}{}", m.get_source(), m.get_dest());
    if let Some(promo) = m.get_promotion() {
        s.push(piece_letter(promo).to_ascii_lowercase());
    }
    s
}
