//! The encoded artifact: a start position plus the moves played from it.

use crate::error::{NotationError, StegoError};
use crate::notation::{self, format_uci, parse_pgn, GameResult};
use crate::types::{Move, MoveGen, Position};

/// One played move and the position it was played from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub before: Position,
    pub mv: Move,
    pub san: String,
}

/// Ordered moves from a start position, renderable as PGN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSequence {
    start: Position,
    current: Position,
    steps: Vec<Step>,
}

impl MoveSequence {
    pub fn new(start: Position) -> Self {
        Self {
            start,
            current: start,
            steps: Vec::new(),
        }
    }

    /// Replay `moves` from `start`, rejecting the first illegal one.
    pub fn from_moves(start: Position, moves: &[Move]) -> Result<Self, StegoError> {
        let mut seq = Self::new(start);
        for &mv in moves {
            let board = *seq.current.board();
            if !MoveGen::new_legal(&board).any(|m| m == mv) {
                return Err(NotationError::UnknownMove {
                    token: format_uci(mv),
                    fen: seq.current.fen(),
                }
                .into());
            }
            let san = notation::san(&board, mv);
            seq.push(mv, san);
        }
        Ok(seq)
    }

    /// First game of a PGN document.
    pub fn from_pgn(text: &str) -> Result<Self, StegoError> {
        let game = parse_pgn(text)?;
        Self::from_moves(game.start, &game.moves)
    }

    /// Append a move already known to be legal in the current position.
    pub(crate) fn push(&mut self, mv: Move, san: String) {
        let before = self.current;
        self.current = before.play(mv);
        self.steps.push(Step { before, mv, san });
    }

    pub fn start(&self) -> &Position {
        &self.start
    }

    pub fn final_position(&self) -> &Position {
        &self.current
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn moves(&self) -> Vec<Move> {
        self.steps.iter().map(|s| s.mv).collect()
    }

    pub fn sans(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.san.clone()).collect()
    }

    pub fn result(&self) -> GameResult {
        GameResult::of(&self.current)
    }

    /// `1. e4 e5 2. Nf3 *`
    pub fn movetext(&self) -> String {
        notation::render_movetext(&self.start, &self.sans(), self.result())
    }

    /// Tagged PGN document.
    pub fn to_pgn(&self) -> String {
        notation::render_pgn(&self.start, &self.sans(), self.result())
    }
}
