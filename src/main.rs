//! Rampart - Entry Point
//!
//! Replays recorded turn snapshots through one commander and prints each
//! turn's deployment plan as a JSON line on stdout.

use std::fs;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rampart::core::config::{load_strategy, StrategyConfig};
use rampart::core::error::Result;
use rampart::oracle::{SnapshotOracle, TurnSnapshot};
use rampart::strategy::{load_build_plan, Commander, JsonLinesSink, TurnDriver, TurnStrategy};

/// Offline turn runner for the two-lane tower-defense bot
#[derive(Parser, Debug)]
#[command(name = "rampart")]
#[command(about = "Replay turn snapshots and print the bot's deployment plans")]
struct Args {
    /// Strategy TOML file (defaults to the built-in two-lane constants)
    #[arg(long)]
    strategy: Option<PathBuf>,

    /// Build order JSON file
    #[arg(long, default_value = "data/build_order.json")]
    build_order: PathBuf,

    /// Random seed for the flank coin flip (overrides the strategy file)
    #[arg(long)]
    seed: Option<u64>,

    /// Mode for the first replayed turn: defend, attack_left or attack_right
    #[arg(long)]
    mode: Option<TurnStrategy>,

    /// Turn snapshots, replayed in order
    #[arg(required = true)]
    snapshots: Vec<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rampart=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.strategy {
        Some(path) => load_strategy(path)?,
        None => StrategyConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let build_plan = load_build_plan(&args.build_order)?;
    tracing::info!(
        "Loaded strategy {:?} with {} build jobs",
        config.name,
        build_plan.job_count()
    );

    let mut commander = Commander::new(config, build_plan);
    if let Some(mode) = args.mode {
        commander = commander.with_mode(mode);
    }

    let mut driver = TurnDriver::new(commander, JsonLinesSink::new(io::stdout().lock()));
    for path in &args.snapshots {
        let snapshot = TurnSnapshot::from_json(&fs::read_to_string(path)?)?;
        let mut oracle = SnapshotOracle::from_snapshot(&snapshot)?;
        let report = driver.play_turn(&mut oracle)?;
        tracing::info!(
            "Turn {} done: {} -> {}",
            report.turn,
            report.mode,
            report.next_mode
        );

        for frame in &snapshot.frames {
            driver.on_action_frame(&frame.to_string());
        }
    }

    Ok(())
}
