//! CLI entry point for podforge.

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::voice::Gender;

/// Log filter used when `RUST_LOG` is unset. Progress goes to stderr directly.
pub const DEFAULT_LOG_FILTER: &str = "podforge=warn";

/// Podforge CLI
#[derive(Parser, Debug)]
#[command(name = "podforge", version, about = "Podforge: narrate text segments into a multi-voice podcast")]
pub struct Cli {
    /// Config file (defaults to ~/.podforge/config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synthesize a segment JSON file into one MP3
    Generate(GenerateArgs),
    /// List the voice catalog
    Voices(VoicesArgs),
    /// Convert a plain-text script into segment JSON
    Script(ScriptArgs),
    /// Manage the synthesized-clip cache
    Cache(CacheArgs),
}

/// Arguments for `podforge generate`.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Segment source: a JSON array of strings or {"text", "speaker"} records
    pub source: PathBuf,

    /// Voice label to use round-robin (repeat up to four times)
    #[arg(short = 'v', long = "voice")]
    pub voices: Vec<String>,

    /// Silence after each segment, in milliseconds
    #[arg(long)]
    pub gap_ms: Option<u64>,

    /// Output MP3 path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Provider model id
    #[arg(long)]
    pub model: Option<String>,

    /// Cache directory for synthesized clips
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Segments synthesized in parallel (order is always preserved)
    #[arg(long)]
    pub concurrency: Option<usize>,
}

/// Arguments for `podforge voices`.
#[derive(Parser, Debug)]
pub struct VoicesArgs {
    /// Only list voices of this gender (female, male)
    #[arg(long)]
    pub gender: Option<Gender>,
}

/// Arguments for `podforge script`.
#[derive(Parser, Debug)]
pub struct ScriptArgs {
    /// Plain-text script (`Speaker: text` per line)
    pub input: PathBuf,

    /// Where to write the segment JSON
    #[arg(short, long, default_value = "segments.json")]
    pub output: PathBuf,

    /// Split on blank lines instead of parsing speaker lines
    #[arg(long)]
    pub paragraphs: bool,
}

/// Arguments for the `cache` subcommand group.
#[derive(Parser, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommands,
}

/// Cache subcommands.
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Delete every cached clip
    Clear {
        /// Cache directory (defaults to the configured one)
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
