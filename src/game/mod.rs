//! The encode/decode walk.
//!
//! Both directions step through the same positions and rebuild the same
//! candidate list at every step; the payload only decides which entry is
//! played. Steps are strictly sequential: each list depends on the position
//! the previous move produced.

mod sequence;

pub use sequence::{MoveSequence, Step};

use crate::codec::{DigitCollector, DigitExtractor};
use crate::config::{ForcedMovePolicy, StegoConfig};
use crate::error::StegoError;
use crate::filter::FilterPipeline;
use crate::types::Position;
use tracing::{debug, info, instrument, trace};

/// Turns payloads into games and back under one configuration.
#[derive(Debug, Clone, Default)]
pub struct GameAssembler {
    config: StegoConfig,
}

impl GameAssembler {
    pub fn new(config: StegoConfig) -> Result<Self, StegoError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StegoConfig {
        &self.config
    }

    /// Encode from the configured start position.
    pub fn encode(&self, payload: &[u8]) -> Result<MoveSequence, StegoError> {
        let start = self.config.start_position()?;
        self.encode_from(payload, &start)
    }

    /// Encode from an explicit start position.
    pub fn encode_from(&self, payload: &[u8], start: &Position) -> Result<MoveSequence, StegoError> {
        let mut pipeline = FilterPipeline::from_config(&self.config)?;
        self.encode_with(&mut pipeline, payload, start)
    }

    /// Encode using a caller-built pipeline.
    #[instrument(skip_all, fields(bytes = payload.len(), start = %start))]
    pub fn encode_with(
        &self,
        pipeline: &mut FilterPipeline,
        payload: &[u8],
        start: &Position,
    ) -> Result<MoveSequence, StegoError> {
        let mut digits = DigitExtractor::from_payload(payload, self.config.framing)?;
        if start.is_terminal() {
            return Err(StegoError::GameExhausted {
                ply: 0,
                remaining_bits: digits.remaining_bits(),
            });
        }

        let mut seq = MoveSequence::new(*start);
        loop {
            let ply = seq.len();
            let carrying = !digits.is_exhausted();
            if !carrying && ply >= self.config.min_plies {
                break;
            }
            if self.config.max_plies.is_some_and(|max| ply >= max) {
                if carrying {
                    return Err(StegoError::GameExhausted {
                        ply,
                        remaining_bits: digits.remaining_bits(),
                    });
                }
                break;
            }

            let position = *seq.final_position();
            let candidates = pipeline.candidates(&position)?;
            let index = match candidates.radix() {
                0 if carrying => {
                    return Err(StegoError::GameExhausted {
                        ply,
                        remaining_bits: digits.remaining_bits(),
                    })
                }
                0 => break,
                1 => match (self.config.forced_moves, carrying) {
                    (ForcedMovePolicy::Play, _) => 0,
                    (ForcedMovePolicy::Reject, true) => {
                        return Err(StegoError::RadixTooSmall { ply, radix: 1 })
                    }
                    // Padding never records a digitless step under reject
                    (ForcedMovePolicy::Reject, false) => break,
                },
                radix if carrying => digits.next_digit(radix, ply)?.value as usize,
                _ => 0,
            };

            let Some(chosen) = candidates.get(index) else {
                return Err(StegoError::RadixTooSmall {
                    ply,
                    radix: candidates.radix(),
                });
            };
            trace!(ply, radix = candidates.radix(), index, san = %chosen.san, "encode step");
            seq.push(chosen.mv, chosen.san.clone());
        }

        info!(
            plies = seq.len(),
            digits = digits.emitted(),
            "payload encoded"
        );
        Ok(seq)
    }

    /// Decode from the configured start position, or from the game's own
    /// start when none is configured.
    pub fn decode(&self, game: &MoveSequence) -> Result<Vec<u8>, StegoError> {
        let start = match &self.config.start_fen {
            Some(_) => self.config.start_position()?,
            None => *game.start(),
        };
        self.decode_from(game, &start)
    }

    /// Decode the first game of a PGN document.
    pub fn decode_pgn(&self, text: &str) -> Result<Vec<u8>, StegoError> {
        let game = MoveSequence::from_pgn(text)?;
        debug!(plies = game.len(), "parsed game");
        self.decode(&game)
    }

    /// Decode the moves of `game` played after `start` is reached.
    pub fn decode_from(&self, game: &MoveSequence, start: &Position) -> Result<Vec<u8>, StegoError> {
        let mut pipeline = FilterPipeline::from_config(&self.config)?;
        self.decode_with(&mut pipeline, game, start)
    }

    /// Decode using a caller-built pipeline.
    #[instrument(skip_all, fields(plies = game.len(), start = %start))]
    pub fn decode_with(
        &self,
        pipeline: &mut FilterPipeline,
        game: &MoveSequence,
        start: &Position,
    ) -> Result<Vec<u8>, StegoError> {
        let offset = locate(game, start)?;
        if offset > 0 {
            debug!(offset, "start position reached inside the game");
        }

        let mut collector = DigitCollector::new();
        for (ply, step) in game.steps()[offset..].iter().enumerate() {
            let candidates = pipeline.candidates(&step.before)?;
            let index = candidates
                .index_of(step.mv)
                .ok_or_else(|| StegoError::DecodeMismatch {
                    ply,
                    san: step.san.clone(),
                    reason: format!("not among {} candidates", candidates.len()),
                })?;

            match candidates.radix() {
                1 if self.config.forced_moves == ForcedMovePolicy::Reject => {
                    return Err(StegoError::RadixTooSmall { ply, radix: 1 })
                }
                1 => trace!(ply, san = %step.san, "forced move"),
                radix => {
                    trace!(ply, radix, index, san = %step.san, "decode step");
                    collector.push(radix, index, ply)?;
                }
            }
        }

        let digits = collector.len();
        let payload = self.config.framing.unpack(&collector.finish())?;
        info!(digits, bytes = payload.len(), "payload decoded");
        Ok(payload)
    }
}

/// Index of the first step played from `start`, or the game length when
/// `start` is the final position. Move counters are not compared.
fn locate(game: &MoveSequence, start: &Position) -> Result<usize, StegoError> {
    let board = start.board();
    if let Some(i) = game.steps().iter().position(|s| s.before.board() == board) {
        return Ok(i);
    }
    if game.final_position().board() == board {
        return Ok(game.len());
    }
    Err(StegoError::PositionInvalid(format!(
        "position {start} never occurs in the game"
    )))
}

/// Encode `payload` as a game from `start`.
pub fn encode(payload: &[u8], start: &Position, config: &StegoConfig) -> Result<MoveSequence, StegoError> {
    GameAssembler::new(config.clone())?.encode_from(payload, start)
}

/// Recover the payload of a game encoded from `start`.
pub fn decode(game: &MoveSequence, start: &Position, config: &StegoConfig) -> Result<Vec<u8>, StegoError> {
    GameAssembler::new(config.clone())?.decode_from(game, start)
}
