//! Error types.
//!
//! Every failure mode of an encode/decode walk is fatal: the codec never
//! guesses a move, truncates a payload or retries an engine call on its own.

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the encoder, decoder and their collaborators.
#[derive(Debug, Error)]
pub enum StegoError {
    /// The starting position is malformed or cannot be located.
    #[error("invalid starting position: {0}")]
    PositionInvalid(String),

    /// The game ended (or hit its ply bound) before every digit was emitted.
    #[error("game exhausted at ply {ply} with {remaining_bits} payload bits left")]
    GameExhausted { ply: usize, remaining_bits: u64 },

    /// Fewer than two candidates remained and no fallback tier applies.
    #[error("radix {radix} at ply {ply} is too small to carry a digit")]
    RadixTooSmall { ply: usize, radix: usize },

    /// The scoring oracle failed.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A recorded move is not in the recomputed candidate list.
    #[error("move {san} at ply {ply} is not a candidate: {reason}")]
    DecodeMismatch {
        ply: usize,
        san: String,
        reason: String,
    },

    /// Move text could not be read.
    #[error(transparent)]
    Notation(#[from] NotationError),

    /// Payload length does not fit the length header.
    #[error("payload of {0} bytes exceeds the length header")]
    PayloadTooLarge(usize),

    /// The reconstructed integer does not match its own framing.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// Configuration could not be read or is inconsistent.
    #[error("config error: {0}")]
    Config(String),
}

/// Errors from a scoring oracle.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine {path}: {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("engine i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("engine did not answer within {0:?}")]
    Timeout(Duration),

    #[error("engine closed its output")]
    Closed,

    #[error("unexpected engine output: {0}")]
    Protocol(String),

    /// The engine returned no score for some requested moves.
    #[error("engine returned no score for {0:?}")]
    Incomplete(Vec<String>),

    #[error("search aborted: {0}")]
    Search(String),
}

/// Errors while reading SAN, UCI moves or PGN.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("no legal move matches '{token}' in {fen}")]
    UnknownMove { token: String, fen: String },

    #[error("malformed tag line: {0}")]
    BadTag(String),

    #[error("game contains no moves")]
    Empty,
}

pub type Result<T, E = StegoError> = std::result::Result<T, E>;
