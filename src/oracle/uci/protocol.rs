//! UCI wire format: the commands we send and the engine lines we read.

use crate::notation::format_uci;
use crate::search::SearchBudget;
use crate::types::{Move, Position, Score};

/// One parsed engine output line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineLine {
    /// "id name X"
    IdName(String),
    UciOk,
    ReadyOk,
    Info(InfoLine),
    /// "bestmove X [ponder Y]"
    BestMove(String),
    /// Anything else (option declarations, copyright banners, ...)
    Other,
}

/// The fields of an `info` line the scorer needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoLine {
    pub depth: Option<u32>,
    pub multipv: u32,
    pub score: Option<Score>,
    /// Score is only a `lowerbound`/`upperbound`
    pub bound: bool,
    /// First move of the principal variation, UCI coordinates
    pub pv_move: Option<String>,
}

/// Parse a line of engine output
pub fn parse_line(line: &str) -> EngineLine {
    let line = line.trim();
    let mut parts = line.split_whitespace();

    match parts.next() {
        Some("uciok") => EngineLine::UciOk,
        Some("readyok") => EngineLine::ReadyOk,
        Some("bestmove") => EngineLine::BestMove(parts.next().unwrap_or("").to_string()),
        Some("id") => match parts.next() {
            Some("name") => EngineLine::IdName(parts.collect::<Vec<_>>().join(" ")),
            _ => EngineLine::Other,
        },
        Some("info") => parse_info(parts),
        _ => EngineLine::Other,
    }
}

fn parse_info<'a>(parts: impl Iterator<Item = &'a str>) -> EngineLine {
    let tokens: Vec<&str> = parts.collect();
    let mut info = InfoLine {
        multipv: 1,
        ..Default::default()
    };

    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            // Free text runs to the end of the line
            "string" => return EngineLine::Other,
            "depth" => {
                i += 1;
                info.depth = tokens.get(i).and_then(|t| t.parse().ok());
            }
            "multipv" => {
                i += 1;
                info.multipv = tokens.get(i).and_then(|t| t.parse().ok()).unwrap_or(1);
            }
            "score" => {
                let kind = tokens.get(i + 1).copied();
                let value: Option<i32> = tokens.get(i + 2).and_then(|t| t.parse().ok());
                info.score = match (kind, value) {
                    (Some("cp"), Some(v)) => Some(Score::cp(v)),
                    (Some("mate"), Some(v)) => Some(Score::from_uci_mate(v)),
                    _ => None,
                };
                i += 2;
            }
            "lowerbound" | "upperbound" => info.bound = true,
            "pv" => {
                info.pv_move = tokens.get(i + 1).map(|t| t.to_string());
                break;
            }
            _ => {}
        }
        i += 1;
    }

    EngineLine::Info(info)
}

/// "position fen ..." for `position`
pub fn position_command(position: &Position) -> String {
    format!("position fen {}", position.fen())
}

/// "go ..." restricted to `moves`
pub fn go_command(budget: &SearchBudget, moves: &[Move]) -> String {
    let mut cmd = format!("go depth {}", budget.depth);
    if let Some(ms) = budget.movetime_ms {
        cmd.push_str(&format!(" movetime {ms}"));
    }
    if let Some(nodes) = budget.nodes {
        cmd.push_str(&format!(" nodes {nodes}"));
    }
    if !moves.is_empty() {
        cmd.push_str(" searchmoves");
        for &m in moves {
            cmd.push(' ');
            cmd.push_str(&format_uci(m));
        }
    }
    cmd
}

/// "setoption name X value Y"
pub fn setoption_command(name: &str, value: impl std::fmt::Display) -> String {
    format!("setoption name {name} value {value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Square;

    #[test]
    fn test_parse_info() {
        let line = "info depth 12 seldepth 17 multipv 3 score cp -24 nodes 91234 nps 1000 pv g1f3 d7d5 d2d4";
        match parse_line(line) {
            EngineLine::Info(info) => {
                assert_eq!(info.depth, Some(12));
                assert_eq!(info.multipv, 3);
                assert_eq!(info.score, Some(Score::cp(-24)));
                assert!(!info.bound);
                assert_eq!(info.pv_move.as_deref(), Some("g1f3"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_mate_and_bounds() {
        let EngineLine::Info(info) =
            parse_line("info depth 5 score mate -2 upperbound pv e1e2")
        else {
            panic!("not an info line");
        };
        assert_eq!(info.score, Some(Score::mated_in(4)));
        assert!(info.bound);
        assert_eq!(info.multipv, 1);
    }

    #[test]
    fn test_parse_misc_lines() {
        assert_eq!(parse_line("uciok"), EngineLine::UciOk);
        assert_eq!(parse_line("readyok\n"), EngineLine::ReadyOk);
        assert_eq!(
            parse_line("id name Stockfish 16"),
            EngineLine::IdName("Stockfish 16".into())
        );
        assert_eq!(
            parse_line("bestmove e2e4 ponder e7e5"),
            EngineLine::BestMove("e2e4".into())
        );
        assert_eq!(parse_line("info string NNUE enabled"), EngineLine::Other);
        assert_eq!(parse_line("option name Hash type spin"), EngineLine::Other);
    }

    #[test]
    fn test_go_command() {
        let budget = SearchBudget {
            depth: 8,
            movetime_ms: Some(500),
            nodes: None,
            ..Default::default()
        };
        let moves = [
            Move::new(Square::E2, Square::E4, None),
            Move::new(Square::G1, Square::F3, None),
        ];
        assert_eq!(
            go_command(&budget, &moves),
            "go depth 8 movetime 500 searchmoves e2e4 g1f3"
        );
        assert_eq!(setoption_command("MultiPV", 2), "setoption name MultiPV value 2");
        assert_eq!(
            position_command(&Position::startpos()),
            "position fen rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
    }
}
