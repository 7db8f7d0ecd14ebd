//! Per-kind decision making for AI-controlled combatants.
//! This module exists to turn a read-only view of the board into one `AiDecision`.
//! It does not execute decisions; the battle loop does that.

mod approach;
mod targeting;

use tracing::debug;

use crate::abilities::{AbilityEffect, AbilityKind, validate};
use crate::character::{Character, Roster};
use crate::combat::DEFAULT_ATTACK_AP_COST;
use crate::grid::GridMap;
use crate::pathfinding::manhattan_distance;
use crate::types::{AiDecision, CharacterId, CharacterKind};

pub use approach::approach_destination;
pub use targeting::{select_target, threat_score};

/// Above this HP fraction a target is worth controlling rather than just hitting.
pub const HEALTHY_TARGET_FRACTION: f32 = 0.7;
/// Allies below this HP fraction are heal candidates.
pub const WOUNDED_ALLY_FRACTION: f32 = 0.5;

/// Read-only view handed to strategies.
#[derive(Clone, Copy)]
pub struct AiContext<'a> {
    pub grid: &'a GridMap,
    pub roster: &'a Roster,
    pub attack_ap_cost: u32,
}

impl<'a> AiContext<'a> {
    pub fn new(grid: &'a GridMap, roster: &'a Roster) -> Self {
        Self { grid, roster, attack_ap_cost: DEFAULT_ATTACK_AP_COST }
    }

    pub fn with_attack_cost(mut self, attack_ap_cost: u32) -> Self {
        self.attack_ap_cost = attack_ap_cost;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AiStrategy {
    Melee { special: Option<AbilityKind> },
    Caster,
    Support,
    Brute,
}

impl AiStrategy {
    pub fn for_kind(kind: CharacterKind) -> Self {
        match kind {
            CharacterKind::Fighter => AiStrategy::Melee { special: Some(AbilityKind::ShieldBash) },
            CharacterKind::Rogue => AiStrategy::Melee { special: Some(AbilityKind::SneakAttack) },
            CharacterKind::Goblin | CharacterKind::Orc => AiStrategy::Melee { special: None },
            CharacterKind::Wizard => AiStrategy::Caster,
            CharacterKind::Cleric => AiStrategy::Support,
            CharacterKind::Dragon => AiStrategy::Brute,
        }
    }

    pub fn decide(self, ctx: &AiContext<'_>, actor: &Character) -> AiDecision {
        match self {
            AiStrategy::Melee { special } => melee(ctx, actor, special),
            AiStrategy::Caster => caster(ctx, actor),
            AiStrategy::Support => support(ctx, actor),
            AiStrategy::Brute => brute(ctx, actor),
        }
    }
}

pub fn make_decision(ctx: &AiContext<'_>, actor: CharacterId) -> AiDecision {
    let Some(character) = ctx.roster.get(actor) else {
        return AiDecision::end_turn("actor is not on the roster");
    };
    if !character.is_alive() {
        return AiDecision::end_turn("actor is dead");
    }
    let decision = AiStrategy::for_kind(character.kind).decide(ctx, character);
    debug!(
        actor = %character.name,
        kind = ?decision.kind,
        reasoning = %decision.reasoning,
        "ai decision"
    );
    decision
}

/// Target, special ability, attack, approach, give up. Every strategy falls back here.
fn melee(ctx: &AiContext<'_>, actor: &Character, special: Option<AbilityKind>) -> AiDecision {
    let Some(target_id) = select_target(ctx.roster, actor) else {
        return AiDecision::end_turn("no valid targets");
    };
    let target = &ctx.roster[target_id];
    let distance = manhattan_distance(actor.pos, target.pos);

    if let Some(ability) = special
        && distance == 1
        && actor.has_ability(ability)
        && target.hp_fraction() > HEALTHY_TARGET_FRACTION
        && validate(ctx.roster, ability, actor.id, target_id).is_ok()
    {
        return AiDecision::use_ability(
            ability.name(),
            target_id,
            format!("{} is healthy and adjacent", target.name),
        );
    }

    if distance <= actor.attack_range {
        if actor.action_points.has_enough(ctx.attack_ap_cost) {
            return AiDecision::attack(target_id, format!("{} is in range", target.name));
        }
        return AiDecision::end_turn("in range but out of action points");
    }

    if actor.movement_left > 0 {
        return match approach_destination(ctx.grid, actor, target) {
            Some(dest) => AiDecision::move_to(dest, target_id, format!("closing on {}", target.name)),
            None => AiDecision::end_turn(format!("no path toward {}", target.name)),
        };
    }
    AiDecision::end_turn("no movement left")
}

fn caster(ctx: &AiContext<'_>, actor: &Character) -> AiDecision {
    let Some(target_id) = select_target(ctx.roster, actor) else {
        return AiDecision::end_turn("no valid targets");
    };
    let mut spells: Vec<(i32, AbilityKind)> = actor
        .abilities
        .iter()
        .filter_map(|&ability| match ability.spec().effect {
            AbilityEffect::Damage { dice, .. } => Some((dice.max(), ability)),
            _ => None,
        })
        .collect();
    spells.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    for (_, spell) in spells {
        if validate(ctx.roster, spell, actor.id, target_id).is_ok() {
            return AiDecision::use_ability(
                spell.name(),
                target_id,
                format!("strongest spell that reaches {}", ctx.roster[target_id].name),
            );
        }
    }
    melee(ctx, actor, None)
}

fn support(ctx: &AiContext<'_>, actor: &Character) -> AiDecision {
    let heal = AbilityKind::CureWounds;
    let patient = ctx
        .roster
        .values()
        .filter(|c| {
            c.is_alive()
                && !c.team.is_opposed_to(actor.team)
                && c.hp_fraction() < WOUNDED_ALLY_FRACTION
        })
        .filter(|c| validate(ctx.roster, heal, actor.id, c.id).is_ok())
        .min_by(|a, b| a.hp_fraction().total_cmp(&b.hp_fraction()));
    if let Some(patient) = patient {
        return AiDecision::use_ability(
            heal.name(),
            patient.id,
            format!("{} is badly wounded", patient.name),
        );
    }
    melee(ctx, actor, None)
}

fn brute(ctx: &AiContext<'_>, actor: &Character) -> AiDecision {
    let breath = AbilityKind::FireBreath;
    if let Some(target_id) = select_target(ctx.roster, actor)
        && validate(ctx.roster, breath, actor.id, target_id).is_ok()
    {
        return AiDecision::use_ability(
            breath.name(),
            target_id,
            format!("{} is inside breath range", ctx.roster[target_id].name),
        );
    }
    melee(ctx, actor, None)
}
