use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

/// Relief-family feature weighting.
#[derive(Parser)]
#[command(
    name = "rba",
    version,
    about = "Relief-based feature weighting and ranking"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Weight and rank every feature of the configured dataset.
    Rank(RankArgs),
    /// Rank the features, then keep the best ones.
    Select(SelectArgs),
}

/// Arguments for the `rank` subcommand.
#[derive(clap::Args)]
pub struct RankArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "rba.toml")]
    pub config: PathBuf,

    /// Write the JSON result here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override global RNG seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,
}

/// Arguments for the `select` subcommand.
#[derive(clap::Args)]
#[command(group(ArgGroup::new("criterion").required(true).args(["top", "threshold"])))]
pub struct SelectArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "rba.toml")]
    pub config: PathBuf,

    /// Keep the N best-ranked features.
    #[arg(long)]
    pub top: Option<usize>,

    /// Keep every feature whose weight is at least this value.
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Write the JSON result here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override global RNG seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,
}
