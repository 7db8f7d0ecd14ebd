//! Shared test fixtures for the `battle` submodule test suites.
//! This module exists to avoid repeating roster and scenario setup across many tests.
//! It does not own production battle logic.

use super::*;
use crate::config::CombatantConfig;

pub(super) fn duel_config() -> BattleConfig {
    BattleConfig {
        seed: 7,
        combatants: vec![
            CombatantConfig {
                name: Some("Aldric".into()),
                kind: CharacterKind::Fighter,
                team: Team::Party,
                x: 0,
                y: 0,
                controller: Controller::Ai,
            },
            CombatantConfig {
                name: None,
                kind: CharacterKind::Goblin,
                team: Team::Enemy,
                x: 7,
                y: 7,
                controller: Controller::Ai,
            },
        ],
        ..BattleConfig::default()
    }
}

pub(super) fn spawn_at(battle: &mut Battle, kind: CharacterKind, team: Team, pos: Pos) -> CharacterId {
    let character = Character::from_kind(format!("{kind:?}"), kind, team, pos);
    battle.spawn(character).unwrap()
}

pub(super) fn spawn_player(battle: &mut Battle, kind: CharacterKind, pos: Pos) -> CharacterId {
    let character = Character::from_kind(format!("{kind:?}"), kind, Team::Party, pos)
        .with_controller(Controller::Player);
    battle.spawn(character).unwrap()
}

pub(super) fn assert_occupancy_matches(battle: &Battle) {
    for c in battle.roster().values().filter(|c| c.is_alive()) {
        assert_eq!(battle.grid().character_at(c.pos), Some(c.id), "{} not on its cell", c.name);
    }
    for (pos, id) in battle.grid().occupants() {
        assert_eq!(battle.roster()[id].pos, pos);
    }
}
