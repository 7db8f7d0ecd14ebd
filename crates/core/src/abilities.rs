//! Special abilities and spells as a tagged table of static specs.
//! This module validates and applies ability use; damage flows through `CombatResolver`.
//! It does not choose when an ability is worth using; AI strategies do that.

use tracing::{debug, warn};

use crate::character::Roster;
use crate::combat::{CombatResolver, DamageReport};
use crate::dice::DiceExpr;
use crate::events::{CombatEvent, EventSink};
use crate::pathfinding::manhattan_distance;
use crate::types::CharacterId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AbilityKind {
    ShieldBash,
    SneakAttack,
    MagicMissile,
    Fireball,
    CureWounds,
    FireBreath,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbilityTarget {
    Enemy,
    Ally,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbilityEffect {
    Damage { dice: DiceExpr, add_base_attack: bool },
    DamageAndStun { dice: DiceExpr },
    Heal { dice: DiceExpr },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AbilitySpec {
    pub name: &'static str,
    pub ap_cost: u32,
    pub spell_level: Option<u8>,
    pub range: u32,
    pub target: AbilityTarget,
    pub effect: AbilityEffect,
}

const SHIELD_BASH: AbilitySpec = AbilitySpec {
    name: "Shield Bash",
    ap_cost: 1,
    spell_level: None,
    range: 1,
    target: AbilityTarget::Enemy,
    effect: AbilityEffect::DamageAndStun { dice: DiceExpr { count: 1, sides: 4, modifier: 0 } },
};

const SNEAK_ATTACK: AbilitySpec = AbilitySpec {
    name: "Sneak Attack",
    ap_cost: 1,
    spell_level: None,
    range: 1,
    target: AbilityTarget::Enemy,
    effect: AbilityEffect::Damage {
        dice: DiceExpr { count: 2, sides: 6, modifier: 0 },
        add_base_attack: true,
    },
};

const MAGIC_MISSILE: AbilitySpec = AbilitySpec {
    name: "Magic Missile",
    ap_cost: 1,
    spell_level: Some(1),
    range: 6,
    target: AbilityTarget::Enemy,
    effect: AbilityEffect::Damage {
        dice: DiceExpr { count: 3, sides: 4, modifier: 3 },
        add_base_attack: false,
    },
};

const FIREBALL: AbilitySpec = AbilitySpec {
    name: "Fireball",
    ap_cost: 2,
    spell_level: Some(3),
    range: 6,
    target: AbilityTarget::Enemy,
    effect: AbilityEffect::Damage {
        dice: DiceExpr { count: 8, sides: 6, modifier: 0 },
        add_base_attack: false,
    },
};

const CURE_WOUNDS: AbilitySpec = AbilitySpec {
    name: "Cure Wounds",
    ap_cost: 1,
    spell_level: Some(1),
    range: 1,
    target: AbilityTarget::Ally,
    effect: AbilityEffect::Heal { dice: DiceExpr { count: 1, sides: 8, modifier: 3 } },
};

const FIRE_BREATH: AbilitySpec = AbilitySpec {
    name: "Fire Breath",
    ap_cost: 2,
    spell_level: None,
    range: 3,
    target: AbilityTarget::Enemy,
    effect: AbilityEffect::Damage {
        dice: DiceExpr { count: 6, sides: 6, modifier: 0 },
        add_base_attack: false,
    },
};

impl AbilityKind {
    pub const ALL: [AbilityKind; 6] = [
        AbilityKind::ShieldBash,
        AbilityKind::SneakAttack,
        AbilityKind::MagicMissile,
        AbilityKind::Fireball,
        AbilityKind::CureWounds,
        AbilityKind::FireBreath,
    ];

    pub fn spec(self) -> &'static AbilitySpec {
        match self {
            AbilityKind::ShieldBash => &SHIELD_BASH,
            AbilityKind::SneakAttack => &SNEAK_ATTACK,
            AbilityKind::MagicMissile => &MAGIC_MISSILE,
            AbilityKind::Fireball => &FIREBALL,
            AbilityKind::CureWounds => &CURE_WOUNDS,
            AbilityKind::FireBreath => &FIRE_BREATH,
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AbilityError {
    #[error("character {0:?} is not on the roster")]
    UnknownCharacter(CharacterId),
    #[error("caster is dead")]
    CasterDead,
    #[error("target is dead")]
    TargetDead,
    #[error("caster does not know {0}")]
    NotKnown(&'static str),
    #[error("{ability} needs an {expected:?} target")]
    WrongTarget { ability: &'static str, expected: AbilityTarget },
    #[error("target at distance {distance} is beyond range {range}")]
    OutOfRange { distance: u32, range: u32 },
    #[error("needs {needed} action points, has {available}")]
    InsufficientActionPoints { needed: u32, available: u32 },
    #[error("no level {0} spell slot left")]
    NoSpellSlot(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbilityOutcome {
    Damaged(DamageReport),
    Healed { amount: i32, remaining_hp: i32 },
}

pub fn validate(
    roster: &Roster,
    ability: AbilityKind,
    caster: CharacterId,
    target: CharacterId,
) -> Result<(), AbilityError> {
    let spec = ability.spec();
    let src = roster.get(caster).ok_or(AbilityError::UnknownCharacter(caster))?;
    let dst = roster.get(target).ok_or(AbilityError::UnknownCharacter(target))?;
    if !src.is_alive() {
        return Err(AbilityError::CasterDead);
    }
    if !dst.is_alive() {
        return Err(AbilityError::TargetDead);
    }
    if !src.has_ability(ability) {
        return Err(AbilityError::NotKnown(spec.name));
    }
    let target_ok = match spec.target {
        AbilityTarget::Enemy => src.team.is_opposed_to(dst.team),
        AbilityTarget::Ally => !src.team.is_opposed_to(dst.team),
    };
    if !target_ok {
        return Err(AbilityError::WrongTarget { ability: spec.name, expected: spec.target });
    }
    let distance = manhattan_distance(src.pos, dst.pos);
    if distance > spec.range {
        return Err(AbilityError::OutOfRange { distance, range: spec.range });
    }
    if !src.action_points.has_enough(spec.ap_cost) {
        return Err(AbilityError::InsufficientActionPoints {
            needed: spec.ap_cost,
            available: src.action_points.current(),
        });
    }
    if let Some(level) = spec.spell_level
        && !src.spell_slots.has_slot(level)
    {
        return Err(AbilityError::NoSpellSlot(level));
    }
    Ok(())
}

/// Validates, pays the AP and slot cost, then applies the effect.
pub fn cast(
    combat: &mut CombatResolver,
    roster: &mut Roster,
    ability: AbilityKind,
    caster: CharacterId,
    target: CharacterId,
    sink: &mut impl EventSink,
) -> Result<AbilityOutcome, AbilityError> {
    if let Err(err) = validate(roster, ability, caster, target) {
        warn!(ability = ability.name(), %err, "ability rejected");
        return Err(err);
    }
    let spec = ability.spec();

    let src = &mut roster[caster];
    src.action_points.consume(spec.ap_cost);
    if let Some(level) = spec.spell_level {
        src.spell_slots.consume(level);
    }
    let base_attack = src.base_attack;
    debug!(caster = %src.name, ability = spec.name, "casting");

    sink.publish(CombatEvent::AbilityUsed { caster, target, ability: spec.name });

    let outcome = match spec.effect {
        AbilityEffect::Damage { dice, add_base_attack } => {
            let bonus = if add_base_attack { base_attack } else { 0 };
            let damage = combat.roll(&dice).saturating_add(bonus);
            let report = combat
                .apply_damage(roster, Some(caster), target, damage, sink)
                .ok_or(AbilityError::UnknownCharacter(target))?;
            AbilityOutcome::Damaged(report)
        }
        AbilityEffect::DamageAndStun { dice } => {
            let damage = combat.roll(&dice);
            let report = combat
                .apply_damage(roster, Some(caster), target, damage, sink)
                .ok_or(AbilityError::UnknownCharacter(target))?;
            if !report.was_lethal {
                roster[target].stunned = true;
            }
            AbilityOutcome::Damaged(report)
        }
        AbilityEffect::Heal { dice } => {
            let amount = combat.roll(&dice);
            let dst = &mut roster[target];
            let restored = dst.heal(amount);
            let remaining_hp = dst.hp;
            sink.publish(CombatEvent::CharacterHealed {
                target,
                amount: restored,
                remaining_hp,
                healer: caster,
            });
            AbilityOutcome::Healed { amount: restored, remaining_hp }
        }
    };
    Ok(outcome)
}
