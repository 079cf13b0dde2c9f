use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::fs;
use std::path::PathBuf;

use parking_sim::simulation::{PathsPayload, RunOutcome, Scenario, SimWorld, SimulationStats};

#[derive(Parser)]
#[command(name = "parking_sim")]
#[command(about = "Headless grid parking simulation")]
struct Cli {
    /// Scenario JSON file (defaults to the built-in downtown city)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Stop after this many ticks even if vehicles are still driving
    #[arg(long, default_value = "1000")]
    max_ticks: u64,

    /// Shuffle vehicle activation every tick with this seed
    #[arg(long)]
    seed: Option<u64>,

    /// Draw the map every N ticks (0 disables drawing)
    #[arg(long, default_value = "0")]
    draw_every: u64,

    /// Write the planned vehicle paths as JSON to this file
    #[arg(long)]
    paths_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    run_headless(&cli)
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(cli: &Cli) -> Result<()> {
    let mut scenario = match &cli.scenario {
        Some(path) => Scenario::from_path(path)
            .with_context(|| format!("Failed to load scenario {}", path.display()))?,
        None => Scenario::downtown().context("Built-in scenario is invalid")?,
    };
    if cli.seed.is_some() {
        scenario.seed = cli.seed;
    }

    let mut world = SimWorld::from_scenario(&scenario).context("Failed to build world")?;
    info!(
        "Running scenario {:?} for at most {} ticks",
        world.name(),
        cli.max_ticks
    );

    if let Some(path) = &cli.paths_out {
        let json = PathsPayload::from_world(&world)
            .to_json_pretty()
            .context("Failed to serialize vehicle paths")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write paths to {}", path.display()))?;
        info!("Wrote planned paths to {}", path.display());
    }

    if cli.draw_every > 0 {
        world.print_summary();
        world.draw_map();
    }

    let mut stats = SimulationStats::for_world(&world);
    let outcome = if cli.draw_every > 0 {
        run_with_snapshots(&mut world, cli, &mut stats)
    } else {
        world.run(Some(cli.max_ticks), &mut stats)
    };

    if !outcome.terminated {
        warn!(
            "Stopped after {} ticks with vehicles still short of their destination",
            outcome.ticks
        );
    }

    if cli.draw_every > 0 {
        println!("=== Final State ===");
        world.print_summary();
        world.draw_map();
    }

    stats.log_summary();
    Ok(())
}

/// Steps the world in chunks of `draw_every` ticks, drawing between chunks
fn run_with_snapshots(world: &mut SimWorld, cli: &Cli, stats: &mut SimulationStats) -> RunOutcome {
    let mut outcome = world.run(Some(0), stats);
    while world.is_running() && world.tick_count() < cli.max_ticks {
        let limit = (world.tick_count() + cli.draw_every).min(cli.max_ticks);
        outcome = world.run(Some(limit), stats);
        world.draw_map();
    }
    outcome
}
