// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "halo",
    version,
    about = "Soak-test and inspect the Halo collision index",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Move a random population for many frames, cross-checking every query
    /// against brute force.
    Soak(SoakArgs),
    /// Build a random population once and print tree statistics.
    Stats(StatsArgs),
}

/// Options shared by every command that builds a population.
#[derive(Args, Debug, Clone)]
pub struct PopulationArgs {
    /// Number of bodies.
    #[arg(long, default_value_t = 1_000)]
    pub objects: usize,

    /// Seed for population and motion.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Directory holding `collision.json`; defaults apply when absent.
    #[arg(long, value_name = "DIR")]
    pub config: Option<PathBuf>,

    /// Override the configured cell size.
    #[arg(long)]
    pub cell_size: Option<f64>,
}

#[derive(Args, Debug, Clone)]
pub struct SoakArgs {
    #[command(flatten)]
    pub population: PopulationArgs,

    /// Frames to simulate.
    #[arg(long, default_value_t = 200)]
    pub frames: u32,

    /// Largest per-axis move per frame, in cells.
    #[arg(long, default_value_t = 0.5)]
    pub step: f64,

    /// Run the full audit and brute-force cross-check every K frames.
    #[arg(long, value_name = "K", default_value_t = 10)]
    pub check_every: u32,

    /// Bodies despawned and respawned per frame.
    #[arg(long, default_value_t = 4)]
    pub churn: usize,
}

#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    #[command(flatten)]
    pub population: PopulationArgs,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}
