//! Helpers shared by the command-line harnesses: scenario loading and battle reports.

use std::fs;
use std::mem;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use skirmish_core::{Battle, BattleConfig, BattleOutcome, CombatEvent, Controller};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

pub fn load_scenario(path: &Path) -> Result<BattleConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;
    BattleConfig::from_toml_str(&text)
        .with_context(|| format!("Failed to parse scenario TOML: {}", path.display()))
}

/// Hands every player-controlled combatant to the AI so a scenario can run unattended.
pub fn autopilot(config: &mut BattleConfig) -> usize {
    let mut switched = 0;
    for entry in &mut config.combatants {
        if entry.controller == Controller::Player {
            entry.controller = Controller::Ai;
            switched += 1;
        }
    }
    if switched > 0 {
        info!(switched, "player-controlled combatants handed to the AI");
    }
    switched
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RoundSummary {
    pub round: u32,
    pub turns: u32,
    pub damage_dealt: i64,
    pub healing_done: i64,
    pub deaths: u32,
    pub abilities_used: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct SimulationReport {
    pub seed: u64,
    pub outcome: Option<BattleOutcome>,
    pub ticks: u64,
    pub rounds: Vec<RoundSummary>,
    pub snapshot_hash: String,
}

impl SimulationReport {
    pub fn from_battle(battle: &Battle) -> Self {
        Self {
            seed: battle.seed(),
            outcome: battle.outcome(),
            ticks: battle.tick_count(),
            rounds: summarize_rounds(battle.log()),
            snapshot_hash: format!("{:#018x}", battle.snapshot_hash()),
        }
    }
}

/// Folds the event log into one row per round. Events before the first turn land in round 1.
pub fn summarize_rounds(log: &[CombatEvent]) -> Vec<RoundSummary> {
    let mut rounds: Vec<RoundSummary> = Vec::new();
    let mut current = RoundSummary { round: 1, ..RoundSummary::default() };
    for event in log {
        match event {
            CombatEvent::TurnStarted { round, .. } => {
                if *round != current.round {
                    let next = RoundSummary { round: *round, ..RoundSummary::default() };
                    rounds.push(mem::replace(&mut current, next));
                }
                current.turns += 1;
            }
            CombatEvent::CharacterDamaged { amount, .. } => {
                current.damage_dealt += i64::from(*amount);
            }
            CombatEvent::CharacterHealed { amount, .. } => {
                current.healing_done += i64::from(*amount);
            }
            CombatEvent::CharacterDied { .. } => current.deaths += 1,
            CombatEvent::AbilityUsed { .. } => current.abilities_used += 1,
            _ => {}
        }
    }
    if !log.is_empty() {
        rounds.push(current);
    }
    rounds
}
