//! Move notation: SAN, UCI coordinates and PGN.
//!
//! SAN is both the interchange format and the canonical sort key, so the
//! formatter here is part of the codec's compatibility contract.

mod pgn;
mod san;

pub use pgn::{parse_pgn, render_movetext, render_pgn, GameResult, ParsedGame};
pub use san::{format_uci, normalize_san, parse_san, parse_uci, san, san_all, san_among};
