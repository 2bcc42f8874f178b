//! stegachess command-line front end.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, CodecArgs, Command};
use stegachess::{GameAssembler, StegoConfig};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Encode {
            input,
            output,
            codec,
        } => run_encode(&input, output, &codec),
        Command::Decode {
            input,
            output,
            codec,
        } => run_decode(&input, output, &codec),
    }
}

fn assembler(args: &CodecArgs) -> Result<GameAssembler> {
    let base = match &args.config {
        Some(path) => StegoConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => StegoConfig::default(),
    };
    let config = args.apply(base);
    debug!(?config, "effective configuration");
    Ok(GameAssembler::new(config)?)
}

#[instrument(skip(output, args), fields(input = %input.display()))]
fn run_encode(input: &Path, output: Option<PathBuf>, args: &CodecArgs) -> Result<()> {
    let payload =
        std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let game = assembler(args)?.encode(&payload)?;
    info!(bytes = payload.len(), plies = game.len(), "encoded");
    write_output(output.as_deref(), game.to_pgn().as_bytes())
}

#[instrument(skip(output, args), fields(input = %input.display()))]
fn run_decode(input: &Path, output: Option<PathBuf>, args: &CodecArgs) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let payload = assembler(args)?.decode_pgn(&text)?;
    info!(bytes = payload.len(), "decoded");
    write_output(output.as_deref(), &payload)
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
            Ok(())
        }
    }
}
