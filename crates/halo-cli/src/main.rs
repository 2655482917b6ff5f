// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `halo`: soak-test the collision checker or print tree statistics for a
//! seeded population.

mod cli;
mod soak;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use halo_collision::{CheckerConfig, ConfigService, DirConfigStore};
use halo_geom::TreeStats;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, PopulationArgs, SoakArgs, StatsArgs};
use crate::soak::{populate, run_soak, SoakPlan, SoakReport};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Soak(args) => soak_command(&args),
        Commands::Stats(args) => stats_command(&args),
    }
}

/// Checker config for a run: the stored one when `--config` is given (or the
/// defaults if that directory holds none), then any command-line override.
fn load_config(args: &PopulationArgs) -> Result<CheckerConfig> {
    let mut config = match &args.config {
        Some(dir) => {
            let store = DirConfigStore::at(dir)
                .with_context(|| format!("opening config dir {}", dir.display()))?;
            ConfigService::new(store)
                .checker_config()
                .with_context(|| format!("loading config from {}", dir.display()))?
        }
        None => CheckerConfig::default(),
    };
    if let Some(cell_size) = args.cell_size {
        config.cell_size = cell_size;
    }
    info!(?config, "checker config");
    Ok(config)
}

fn soak_command(args: &SoakArgs) -> Result<()> {
    let plan = SoakPlan {
        objects: args.population.objects,
        frames: args.frames,
        seed: args.population.seed,
        step: args.step,
        check_every: args.check_every,
        churn: args.churn,
        config: load_config(&args.population)?,
    };
    let report = run_soak(&plan)?;
    print_soak(&report)
}

fn print_soak(report: &SoakReport) -> Result<()> {
    let mut out = io::stdout().lock();
    writeln!(
        out,
        "soak ok: {} frames, {} objects, {} checks, {} probes",
        report.frames, report.objects, report.checks, report.probes
    )?;
    writeln!(
        out,
        "churn: {} spawned, {} despawned, {} resized",
        report.spawned, report.despawned, report.resized
    )?;
    write_stats(&mut out, &report.stats)
}

#[derive(Debug, Serialize)]
struct StatsReport {
    objects: usize,
    seed: u64,
    config: CheckerConfig,
    tree: TreeStats,
}

fn stats_command(args: &StatsArgs) -> Result<()> {
    let config = load_config(&args.population)?;
    let (_, checker) = populate(config, args.population.objects, args.population.seed)?;
    checker.audit().context("audit after build")?;
    let report = StatsReport {
        objects: checker.len(),
        seed: args.population.seed,
        config,
        tree: checker.stats(),
    };

    let mut out = io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
        return Ok(());
    }
    writeln!(
        out,
        "{} objects in a {}x{} world, cell size {}",
        report.objects, config.width, config.height, config.cell_size
    )?;
    write_stats(&mut out, &report.tree)
}

fn write_stats(out: &mut impl Write, stats: &TreeStats) -> Result<()> {
    writeln!(
        out,
        "tree: {} leaves, {} internal nodes, depth {}",
        stats.leaves, stats.internal_nodes, stats.max_depth
    )?;
    writeln!(
        out,
        "arena: {} slots, {} free",
        stats.arena_slots, stats.free_slots
    )?;
    Ok(())
}
