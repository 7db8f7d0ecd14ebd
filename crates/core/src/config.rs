//! Serializable battle setup: board, rules and starting roster.
//! This module exists so scenarios can be written as TOML and loaded without code.
//! It does not validate placements; `Battle::from_config` does that.

use serde::{Deserialize, Serialize};

use crate::combat::DEFAULT_ATTACK_AP_COST;
use crate::grid::DEFAULT_GRID_SIZE;
use crate::movement::DEFAULT_STEP_INTERVAL_SECS;
use crate::types::{CharacterKind, Controller, TileType, Team};

pub const DEFAULT_MAX_ACTIONS_PER_TURN: u32 = 8;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid battle config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not encode battle config: {0}")]
    Encode(#[from] toml::ser::Error),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub seed: u64,
    pub grid: GridConfig,
    pub rules: RulesConfig,
    pub combatants: Vec<CombatantConfig>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<TileConfig>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { width: DEFAULT_GRID_SIZE, height: DEFAULT_GRID_SIZE, tiles: Vec::new() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileConfig {
    pub x: i32,
    pub y: i32,
    pub tile: TileType,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub attack_ap_cost: u32,
    pub step_interval_secs: f32,
    pub max_actions_per_turn: u32,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            attack_ap_cost: DEFAULT_ATTACK_AP_COST,
            step_interval_secs: DEFAULT_STEP_INTERVAL_SECS,
            max_actions_per_turn: DEFAULT_MAX_ACTIONS_PER_TURN,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub kind: CharacterKind,
    pub team: Team,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub controller: Controller,
}

impl BattleConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }
}
