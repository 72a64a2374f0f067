use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Plutus regional distribution dynamics analyzer.
#[derive(Parser)]
#[command(
    name = "plutus",
    version,
    about = "Markov chain estimation and ergodic analysis for regional dynamics"
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
    /// Estimate a pooled Markov chain and its ergodic behavior.
    Estimate(EstimateArgs),
    /// Estimate spatially conditioned chains and test homogeneity.
    Spatial(SpatialArgs),
}

/// Arguments for the `estimate` subcommand.
#[derive(clap::Args)]
pub struct EstimateArgs {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// CSV of state labels, one row per subject, one column per period.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Path for the JSON report.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `spatial` subcommand.
#[derive(clap::Args)]
pub struct SpatialArgs {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// CSV of state labels, one row per subject, one column per period.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// CSV of conditioning-class labels, same shape as the state grid.
    #[arg(long)]
    pub conditioning: Option<PathBuf>,

    /// Path for the JSON report.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
