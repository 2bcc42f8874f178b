//! PGN movetext rendering and parsing.

use super::san::parse_san;
use crate::error::{NotationError, StegoError};
use crate::types::{Color, Move, Position};
use std::fmt;

/// Result marker ending the movetext
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    #[default]
    Ongoing,
}

impl GameResult {
    pub fn as_str(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
            GameResult::Ongoing => "*",
        }
    }

    fn parse(token: &str) -> Option<Self> {
        match token {
            "1-0" => Some(GameResult::WhiteWins),
            "0-1" => Some(GameResult::BlackWins),
            "1/2-1/2" => Some(GameResult::Draw),
            "*" => Some(GameResult::Ongoing),
            _ => None,
        }
    }

    /// Result implied by a final position
    pub fn of(position: &Position) -> Self {
        if position.is_checkmate() {
            match position.side_to_move() {
                Color::White => GameResult::BlackWins,
                Color::Black => GameResult::WhiteWins,
            }
        } else if position.is_terminal() {
            GameResult::Draw
        } else {
            GameResult::Ongoing
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numbered movetext: `1. e4 e5 2. Nf3 *`, or `7... Kf8 8. Qd1 *` when
/// Black moves first.
pub fn render_movetext(start: &Position, sans: &[String], result: GameResult) -> String {
    movetext_tokens(start, sans, result).join(" ")
}

fn movetext_tokens(start: &Position, sans: &[String], result: GameResult) -> Vec<String> {
    let mut tokens = Vec::with_capacity(sans.len() * 3 / 2 + 2);
    let mut number = start.fullmove_number();
    let mut white_to_move = start.side_to_move() == Color::White;

    for (i, san) in sans.iter().enumerate() {
        if white_to_move {
            tokens.push(format!("{number}."));
        } else if i == 0 {
            tokens.push(format!("{number}..."));
        }
        tokens.push(san.clone());
        if !white_to_move {
            number += 1;
        }
        white_to_move = !white_to_move;
    }
    tokens.push(result.as_str().to_string());

    // Glue each move number to the move that follows it
    let mut glued = Vec::with_capacity(tokens.len());
    let mut pending: Option<String> = None;
    for t in tokens {
        if t.ends_with('.') {
            pending = Some(t);
        } else if let Some(num) = pending.take() {
            glued.push(format!("{num} {t}"));
        } else {
            glued.push(t);
        }
    }
    glued
}

/// Full PGN with the seven tag roster, wrapped at 80 columns.
pub fn render_pgn(start: &Position, sans: &[String], result: GameResult) -> String {
    let mut out = String::new();
    for (key, value) in [
        ("Event", "?"),
        ("Site", "?"),
        ("Date", "????.??.??"),
        ("Round", "?"),
        ("White", "?"),
        ("Black", "?"),
        ("Result", result.as_str()),
    ] {
        out.push_str(&format!("[{key} \"{value}\"]\n"));
    }
    if *start != Position::startpos() {
        out.push_str("[SetUp \"1\"]\n");
        out.push_str(&format!("[FEN \"{}\"]\n", start.fen()));
    }
    out.push('\n');

    let mut line_len = 0;
    for chunk in movetext_tokens(start, sans, result) {
        for word in chunk.split(' ') {
            if line_len > 0 && line_len + 1 + word.len() > 80 {
                out.push('\n');
                line_len = 0;
            } else if line_len > 0 {
                out.push(' ');
                line_len += 1;
            }
            out.push_str(word);
            line_len += word.len();
        }
    }
    out.push('\n');
    out
}

/// First game of a PGN document, with its moves resolved.
#[derive(Debug, Clone)]
pub struct ParsedGame {
    pub tags: Vec<(String, String)>,
    pub start: Position,
    pub moves: Vec<Move>,
    pub result: GameResult,
}

impl ParsedGame {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn parse_tag(line: &str) -> Result<(String, String), NotationError> {
    let inner = line
        .strip_prefix('[')
        .and_then(|l| l.strip_suffix(']'))
        .ok_or_else(|| NotationError::BadTag(line.to_string()))?;
    let (key, rest) = inner
        .trim()
        .split_once(char::is_whitespace)
        .ok_or_else(|| NotationError::BadTag(line.to_string()))?;
    let value = rest
        .trim()
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or_else(|| NotationError::BadTag(line.to_string()))?;
    Ok((key.to_string(), value.replace("\\\"", "\"")))
}

/// Split movetext into move tokens, dropping numbers, comments, NAGs and
/// variations. Returns the tokens and the result marker if one was seen.
fn movetext_moves(text: &str) -> (Vec<String>, Option<GameResult>) {
    let mut moves = Vec::new();
    let mut result = None;
    let mut depth = 0usize;
    let mut chars = text.chars().peekable();
    let mut word = String::new();

    let mut flush = |word: &mut String, depth: usize, moves: &mut Vec<String>| {
        if word.is_empty() {
            return;
        }
        let w = std::mem::take(word);
        if depth > 0 || w.starts_with('$') {
            return;
        }
        if let Some(r) = GameResult::parse(&w) {
            result = Some(r);
            return;
        }
        // "12." / "12..." / "12.e4", but not "0-0"
        let rest = w.trim_start_matches(|c: char| c.is_ascii_digit());
        let mv = if rest.len() < w.len() && rest.starts_with('.') {
            rest.trim_start_matches('.')
        } else {
            w.as_str()
        };
        if !mv.is_empty() {
            moves.push(mv.to_string());
        }
    };

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                flush(&mut word, depth, &mut moves);
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                }
            }
            ';' => {
                flush(&mut word, depth, &mut moves);
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '(' => {
                flush(&mut word, depth, &mut moves);
                depth += 1;
            }
            ')' => {
                flush(&mut word, depth, &mut moves);
                depth = depth.saturating_sub(1);
            }
            c if c.is_whitespace() => flush(&mut word, depth, &mut moves),
            c => word.push(c),
        }
    }
    flush(&mut word, depth, &mut moves);
    (moves, result)
}

/// Whether a `{` comment is still open at the end of `line`.
fn comment_open_after(line: &str, mut open: bool) -> bool {
    for c in line.chars() {
        match c {
            '}' if open => open = false,
            '{' if !open => open = true,
            ';' if !open => break,
            _ => {}
        }
    }
    open
}

/// Parse the first game of a PGN document (tags optional).
pub fn parse_pgn(text: &str) -> Result<ParsedGame, StegoError> {
    if text.trim().is_empty() {
        return Err(NotationError::Empty.into());
    }
    let mut tags = Vec::new();
    let mut movetext = String::new();
    let mut in_comment = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if in_comment {
            movetext.push_str(line);
            movetext.push('\n');
        } else if trimmed.starts_with('[') && movetext.trim().is_empty() {
            tags.push(parse_tag(trimmed)?);
            continue;
        } else if trimmed.starts_with('[') {
            // Next game's tag section
            break;
        } else if !trimmed.starts_with('%') {
            movetext.push_str(line);
            movetext.push('\n');
        } else {
            continue;
        }
        in_comment = comment_open_after(line, in_comment);
    }

    let start = match tags.iter().find(|(k, _)| k == "FEN") {
        Some((_, fen)) => Position::from_fen(fen)?,
        None => Position::startpos(),
    };

    let (tokens, result) = movetext_moves(&movetext);
    let mut position = start;
    let mut moves = Vec::with_capacity(tokens.len());
    for token in &tokens {
        let mv = parse_san(position.board(), token)?;
        position = position.play(mv);
        moves.push(mv);
    }

    let result = result
        .or_else(|| {
            tags.iter()
                .find(|(k, _)| k == "Result")
                .and_then(|(_, v)| GameResult::parse(v))
        })
        .unwrap_or_default();

    Ok(ParsedGame {
        tags,
        start,
        moves,
        result,
    })
}
