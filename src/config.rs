//! Codec configuration.
//!
//! Encoder and decoder must agree on every field here: two configurations
//! that differ in any of them describe different move trees.

use crate::codec::Framing;
use crate::error::StegoError;
use crate::search::SearchBudget;
use crate::types::Position;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// What to do with a step that has exactly one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForcedMovePolicy {
    /// Play it without consuming a digit.
    #[default]
    Play,
    /// Fail with `RadixTooSmall`.
    Reject,
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StegoConfig {
    /// Starting position as FEN; the standard initial position when unset.
    pub start_fen: Option<String>,

    /// Payload framing.
    pub framing: Framing,

    /// Handling of single-candidate steps.
    pub forced_moves: ForcedMovePolicy,

    /// Pad with index-0 moves until the game has at least this many plies.
    pub min_plies: usize,

    /// Fail with `GameExhausted` rather than play more plies than this.
    pub max_plies: Option<usize>,

    /// Engine-based pruning of weak moves.
    pub quality: Option<QualityConfig>,

    /// Pruning of moves that lead to narrow positions.
    pub entropy: Option<EntropyConfig>,
}

impl StegoConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StegoError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| StegoError::Config(format!("failed to read config file: {e}")))?;
        let config = Self::from_toml_str(&content)?;
        info!(
            quality = config.quality.is_some(),
            entropy = config.entropy.is_some(),
            "Config loaded"
        );
        Ok(config)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, StegoError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| StegoError::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, StegoError> {
        toml::to_string_pretty(self)
            .map_err(|e| StegoError::Config(format!("failed to render config: {e}")))
    }

    /// Rejects settings no walk could honour.
    pub fn validate(&self) -> Result<(), StegoError> {
        if let Some(max) = self.max_plies {
            if max < self.min_plies {
                return Err(StegoError::Config(format!(
                    "max_plies ({max}) is below min_plies ({})",
                    self.min_plies
                )));
            }
        }
        if let Some(q) = &self.quality {
            if q.threshold_cp < 0 {
                return Err(StegoError::Config(format!(
                    "quality.threshold_cp must be non-negative, got {}",
                    q.threshold_cp
                )));
            }
            if q.timeout_ms == 0 {
                return Err(StegoError::Config("quality.timeout_ms must be positive".into()));
            }
        }
        if let Some(e) = &self.entropy {
            match e.mode {
                EntropyMode::TopK { k: 0 } => {
                    return Err(StegoError::Config("entropy top-k needs k >= 1".into()))
                }
                EntropyMode::AboveMean { percent: 0 } => {
                    return Err(StegoError::Config("entropy above-mean needs percent >= 1".into()))
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// The configured starting position.
    pub fn start_position(&self) -> Result<Position, StegoError> {
        match &self.start_fen {
            Some(fen) => Position::from_fen(fen),
            None => Ok(Position::startpos()),
        }
    }
}

/// Which scoring oracle to run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EngineSpec {
    /// The built-in alpha-beta searcher.
    #[default]
    Internal,
    /// An external UCI engine process.
    Uci {
        path: String,
        #[serde(default)]
        args: Vec<String>,
        /// `setoption` pairs sent after the handshake (e.g. `Threads = "1"`).
        #[serde(default)]
        options: BTreeMap<String, String>,
    },
}

/// Quality filter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QualityConfig {
    #[serde(default)]
    pub engine: EngineSpec,

    /// Search depth in plies.
    #[serde(default = "default_depth")]
    pub depth: u32,

    /// Per-query thinking time hint for UCI engines.
    #[serde(default)]
    pub movetime_ms: Option<u64>,

    /// Per-query node limit for UCI engines.
    #[serde(default)]
    pub nodes: Option<u64>,

    /// Keep moves trailing the best by strictly less than this.
    #[serde(default = "default_threshold_cp")]
    pub threshold_cp: i32,

    /// Hard limit for one scoring call.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Return the unfiltered list when fewer than two moves survive.
    #[serde(default)]
    pub widen_below_two: bool,
}

fn default_depth() -> u32 {
    6
}

fn default_threshold_cp() -> i32 {
    50
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            engine: EngineSpec::default(),
            depth: default_depth(),
            movetime_ms: None,
            nodes: None,
            threshold_cp: default_threshold_cp(),
            timeout_ms: default_timeout_ms(),
            widen_below_two: false,
        }
    }
}

impl QualityConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn budget(&self) -> SearchBudget {
        SearchBudget {
            depth: self.depth,
            movetime_ms: self.movetime_ms,
            nodes: self.nodes,
            timeout: self.timeout(),
        }
    }
}

/// Entropy filter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EntropyConfig {
    pub mode: EntropyMode,
    pub branching: BranchingMeasure,
}

/// Which moves the entropy filter keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum EntropyMode {
    /// Drop moves whose successor branching is below `percent`% of the mean.
    AboveMean { percent: u32 },
    /// Keep moves whose successor branching is at least `min`.
    MinBranching { min: usize },
    /// Keep moves at least as wide as the k-th widest (ties kept).
    TopK { k: usize },
}

impl Default for EntropyMode {
    fn default() -> Self {
        EntropyMode::AboveMean { percent: 90 }
    }
}

/// How the branching factor of a successor is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BranchingMeasure {
    /// Number of candidates before filtering.
    #[default]
    Legal,
    /// Number of candidates surviving the quality filter.
    Quality,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let cfg = StegoConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, StegoConfig::default());
        assert_eq!(cfg.framing, Framing::LengthPrefixed);
        assert_eq!(cfg.start_position().unwrap(), Position::startpos());
    }

    #[test]
    fn test_full_document() {
        let cfg = StegoConfig::from_toml_str(
            r#"
start_fen = "4k3/8/8/8/8/8/8/4K2R w K - 0 1"
framing = "bare"
forced_moves = "reject"
min_plies = 10
max_plies = 200

[quality]
depth = 3
threshold_cp = 80
engine = { kind = "uci", path = "stockfish", options = { Threads = "1" } }

[entropy]
mode = { kind = "top-k", k = 4 }
branching = "quality"
"#,
        )
        .unwrap();
        assert_eq!(cfg.framing, Framing::Bare);
        assert_eq!(cfg.forced_moves, ForcedMovePolicy::Reject);
        assert_eq!(cfg.max_plies, Some(200));

        let q = cfg.quality.as_ref().unwrap();
        assert_eq!(q.depth, 3);
        assert_eq!(q.timeout_ms, 30_000);
        assert_eq!(q.budget().timeout, Duration::from_secs(30));
        match &q.engine {
            EngineSpec::Uci { path, args, options } => {
                assert_eq!(path, "stockfish");
                assert!(args.is_empty());
                assert_eq!(options.get("Threads").map(String::as_str), Some("1"));
            }
            other => panic!("unexpected engine {other:?}"),
        }

        let e = cfg.entropy.unwrap();
        assert_eq!(e.mode, EntropyMode::TopK { k: 4 });
        assert_eq!(e.branching, BranchingMeasure::Quality);
    }

    #[test]
    fn test_rejects_inconsistent_bounds() {
        assert!(matches!(
            StegoConfig::from_toml_str("min_plies = 10\nmax_plies = 5"),
            Err(StegoError::Config(_))
        ));
        assert!(StegoConfig::from_toml_str("[entropy]\nmode = { kind = \"top-k\", k = 0 }").is_err());
        assert!(StegoConfig::from_toml_str("[quality]\nthreshold_cp = -1").is_err());
        assert!(StegoConfig::from_toml_str("unknown_key = 1").is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let cfg = StegoConfig {
            quality: Some(QualityConfig::default()),
            entropy: Some(EntropyConfig::default()),
            min_plies: 4,
            ..Default::default()
        };
        let text = cfg.to_toml_string().unwrap();
        assert_eq!(StegoConfig::from_toml_str(&text).unwrap(), cfg);
    }
}
