//! Command-line interface for stegachess.

use clap::{Args, Parser, Subcommand};
use stegachess::{EngineSpec, EntropyConfig, Framing, QualityConfig, StegoConfig};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Hide bytes in a chess game, or recover them
#[derive(Parser, Debug)]
#[command(name = "stegachess")]
#[command(about = "Mixed-radix chess steganography", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a file as a PGN game
    Encode {
        /// Payload file
        #[arg(short, long)]
        input: PathBuf,

        /// PGN output (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        codec: CodecArgs,
    },

    /// Recover the payload hidden in a PGN game
    Decode {
        /// PGN file
        #[arg(short, long)]
        input: PathBuf,

        /// Payload output (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        codec: CodecArgs,
    },
}

/// Settings shared by both directions. Flags override the config file.
#[derive(Args, Debug, Default)]
pub struct CodecArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Starting position
    #[arg(long)]
    pub fen: Option<String>,

    /// Drop moves that lead to narrow positions
    #[arg(long)]
    pub compress: bool,

    /// Filter weak moves with this UCI engine
    #[arg(long, conflicts_with = "internal_engine")]
    pub engine: Option<String>,

    /// Filter weak moves with the built-in searcher
    #[arg(long)]
    pub internal_engine: bool,

    /// Search depth for the quality filter
    #[arg(long)]
    pub depth: Option<u32>,

    /// Centipawn margin for the quality filter
    #[arg(long)]
    pub threshold: Option<i32>,

    /// No length header (reference game format)
    #[arg(long)]
    pub bare: bool,

    #[arg(long)]
    pub min_plies: Option<usize>,

    #[arg(long)]
    pub max_plies: Option<usize>,
}

impl CodecArgs {
    /// Layer the flags over `config`.
    pub fn apply(&self, mut config: StegoConfig) -> StegoConfig {
        if let Some(fen) = &self.fen {
            config.start_fen = Some(fen.clone());
        }
        if self.compress && config.entropy.is_none() {
            config.entropy = Some(EntropyConfig::default());
        }
        if self.bare {
            config.framing = Framing::Bare;
        }
        if let Some(n) = self.min_plies {
            config.min_plies = n;
        }
        if let Some(n) = self.max_plies {
            config.max_plies = Some(n);
        }

        let engine = match &self.engine {
            Some(path) => Some(EngineSpec::Uci {
                path: path.clone(),
                args: Vec::new(),
                options: BTreeMap::new(),
            }),
            None if self.internal_engine => Some(EngineSpec::Internal),
            None => None,
        };
        let wants_quality = engine.is_some() || self.depth.is_some() || self.threshold.is_some();
        if wants_quality {
            let quality = config.quality.get_or_insert_with(QualityConfig::default);
            if let Some(engine) = engine {
                quality.engine = engine;
            }
            if let Some(depth) = self.depth {
                quality.depth = depth;
            }
            if let Some(threshold) = self.threshold {
                quality.threshold_cp = threshold;
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_encode() {
        let cli = Cli::parse_from([
            "stegachess", "encode", "-i", "secret.bin", "--compress", "--internal-engine",
            "--depth", "2", "--bare",
        ]);
        let Command::Encode { input, output, codec } = cli.command else {
            panic!("expected encode");
        };
        assert_eq!(input, PathBuf::from("secret.bin"));
        assert!(output.is_none());

        let config = codec.apply(StegoConfig::default());
        assert_eq!(config.framing, Framing::Bare);
        assert!(config.entropy.is_some());
        let quality = config.quality.unwrap();
        assert_eq!(quality.engine, EngineSpec::Internal);
        assert_eq!(quality.depth, 2);
        assert_eq!(quality.threshold_cp, 50);
    }

    #[test]
    fn test_flags_override_file() {
        let file = StegoConfig {
            min_plies: 4,
            quality: Some(QualityConfig {
                depth: 9,
                ..Default::default()
            }),
            ..Default::default()
        };
        let args = CodecArgs {
            threshold: Some(10),
            max_plies: Some(100),
            ..Default::default()
        };
        let config = args.apply(file);
        assert_eq!(config.min_plies, 4);
        assert_eq!(config.max_plies, Some(100));
        let quality = config.quality.unwrap();
        assert_eq!(quality.depth, 9);
        assert_eq!(quality.threshold_cp, 10);
    }

    #[test]
    fn test_no_flags_no_filters() {
        let config = CodecArgs::default().apply(StegoConfig::default());
        assert_eq!(config, StegoConfig::default());
    }
}
