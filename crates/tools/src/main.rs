use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use skirmish_core::{Battle, StopReason};
use tools::{SimulationReport, autopilot, init_tracing, load_scenario};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the battle scenario TOML file
    #[arg(short, long, default_value = "crates/tools/scenarios/ambush.toml")]
    scenario: PathBuf,
    /// Override the scenario's seed
    #[arg(long)]
    seed: Option<u64>,
    #[arg(short, long, default_value_t = 20_000)]
    max_ticks: u32,
    /// Simulated seconds per tick
    #[arg(long, default_value_t = 0.2)]
    dt: f32,
    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = load_scenario(&args.scenario)?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    autopilot(&mut config);

    let mut battle = Battle::from_config(&config)
        .with_context(|| format!("Invalid scenario: {}", args.scenario.display()))?;
    if !battle.start() {
        bail!("scenario has no living combatants");
    }

    let result = battle.advance(args.max_ticks, args.dt);
    if let StopReason::AwaitingPlayer(id) = result.stop_reason {
        bail!("stopped waiting on player-controlled {id:?}");
    }

    let report = SimulationReport::from_battle(&battle);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Simulation complete.");
    println!("Seed: {}", report.seed);
    match report.outcome {
        Some(outcome) => println!("Outcome: {outcome:?}"),
        None => println!("Outcome: undecided after {} ticks", result.simulated_ticks),
    }
    println!("Final Tick: {}", report.ticks);
    for round in &report.rounds {
        println!(
            "  round {:>3}: {} turns, {} damage, {} healed, {} abilities, {} deaths",
            round.round,
            round.turns,
            round.damage_dealt,
            round.healing_done,
            round.abilities_used,
            round.deaths
        );
    }
    for c in battle.roster().values() {
        println!("  {:<12} {:?} {:>3}/{:<3} hp at {:?}", c.name, c.team, c.hp, c.max_hp, c.pos);
    }
    println!("Snapshot Hash: {}", report.snapshot_hash);
    Ok(())
}
