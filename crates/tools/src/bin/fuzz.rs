use std::collections::BTreeSet;

use anyhow::{Result, bail, ensure};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use skirmish_core::config::{BattleConfig, CombatantConfig, TileConfig};
use skirmish_core::{Battle, CharacterKind, Controller, Pos, StopReason, Team, TileType};
use tools::init_tracing;
use tracing::info;

const KINDS: [CharacterKind; 7] = [
    CharacterKind::Fighter,
    CharacterKind::Wizard,
    CharacterKind::Cleric,
    CharacterKind::Rogue,
    CharacterKind::Goblin,
    CharacterKind::Orc,
    CharacterKind::Dragon,
];

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 100)]
    battles: u32,
    #[arg(short, long, default_value_t = 5000)]
    ticks: u32,
}

fn choose<T: Copy>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    slice[rng.next_u64() as usize % slice.len()]
}

fn random_cell(rng: &mut ChaCha8Rng, taken: &mut BTreeSet<Pos>) -> Pos {
    loop {
        let pos = Pos::new((rng.next_u64() % 8) as i32, (rng.next_u64() % 8) as i32);
        if taken.insert(pos) {
            return pos;
        }
    }
}

fn random_battle(rng: &mut ChaCha8Rng) -> BattleConfig {
    let mut config = BattleConfig { seed: rng.next_u64(), ..BattleConfig::default() };
    let mut taken = BTreeSet::new();
    for _ in 0..rng.next_u64() % 8 {
        let pos = random_cell(rng, &mut taken);
        let tile = choose(rng, &[TileType::Wall, TileType::Lava, TileType::Difficult, TileType::Exit]);
        config.grid.tiles.push(TileConfig { x: pos.x, y: pos.y, tile });
    }
    for team in [Team::Party, Team::Enemy] {
        for _ in 0..1 + rng.next_u64() % 4 {
            let pos = random_cell(rng, &mut taken);
            config.combatants.push(CombatantConfig {
                name: None,
                kind: choose(rng, &KINDS),
                team,
                x: pos.x,
                y: pos.y,
                controller: Controller::Ai,
            });
        }
    }
    config
}

fn check_invariants(battle: &Battle) -> Result<()> {
    for c in battle.roster().values() {
        ensure!((0..=c.max_hp).contains(&c.hp), "Invariant failed: {} hp {}", c.name, c.hp);
        ensure!(
            c.action_points.current() <= c.action_points.max(),
            "Invariant failed: {} AP above max",
            c.name
        );
        if c.is_alive() {
            ensure!(
                battle.grid().character_at(c.pos) == Some(c.id),
                "Invariant failed: {} missing from grid at {:?}",
                c.name,
                c.pos
            );
        }
    }
    for (pos, id) in battle.grid().occupants() {
        ensure!(battle.roster()[id].pos == pos, "Invariant failed: grid disagrees at {pos:?}");
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for {} battles...", args.seed, args.battles);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut undecided = 0;

    for n in 0..args.battles {
        let config = random_battle(&mut rng);
        let mut battle = Battle::from_config(&config)?;
        battle.start();

        let mut finished = false;
        for _ in 0..args.ticks {
            let stop = battle.tick(0.2);
            check_invariants(&battle)?;
            match stop {
                Some(StopReason::Finished(outcome)) => {
                    info!(battle = n, seed = config.seed, ?outcome, "battle finished");
                    finished = true;
                    break;
                }
                Some(other) => bail!("battle {n} stopped unexpectedly: {other:?}"),
                None => {}
            }
        }
        if !finished {
            undecided += 1;
        }
    }

    println!("Fuzzing completed successfully ({undecided} battles undecided).");
    Ok(())
}
