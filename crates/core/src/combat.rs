//! Attack resolution between two roster characters.
//! This module exists so range, AP and damage rules are enforced in exactly one place.
//! It does not own turn flow or decide who attacks whom.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
use tracing::{debug, error, warn};

use crate::character::Roster;
use crate::dice::{DiceExpr, roll_dice_from_string};
use crate::events::{CombatEvent, EventSink};
use crate::pathfinding::manhattan_distance;
use crate::types::CharacterId;

pub const DEFAULT_ATTACK_AP_COST: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error("character {0:?} is not on the roster")]
    UnknownCharacter(CharacterId),
    #[error("attacker is dead")]
    AttackerDead,
    #[error("target is dead")]
    TargetDead,
    #[error("target at distance {distance} is beyond range {range}")]
    OutOfRange { distance: u32, range: u32 },
    #[error("needs {needed} action points, has {available}")]
    InsufficientActionPoints { needed: u32, available: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageReport {
    pub amount: i32,
    pub remaining_hp: i32,
    pub was_lethal: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackReport {
    pub attacker: CharacterId,
    pub defender: CharacterId,
    pub damage: DamageReport,
    pub ap_spent: u32,
}

pub struct CombatResolver {
    rng: ChaCha8Rng,
    attack_ap_cost: u32,
}

impl CombatResolver {
    pub fn new(seed: u64, attack_ap_cost: u32) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed), attack_ap_cost }
    }

    pub fn attack_ap_cost(&self) -> u32 {
        self.attack_ap_cost
    }

    pub(crate) fn roll(&mut self, expr: &DiceExpr) -> i32 {
        expr.roll(&mut self.rng)
    }

    /// Rolls `notation` and adds `base_damage`. Yields 0 when either party is unknown.
    pub fn calculate_damage(
        &mut self,
        roster: &Roster,
        attacker: CharacterId,
        defender: CharacterId,
        notation: &str,
        base_damage: i32,
    ) -> i32 {
        if !roster.contains_key(attacker) || !roster.contains_key(defender) {
            error!(?attacker, ?defender, "calculate_damage: unknown character");
            return 0;
        }
        roll_dice_from_string(notation, &mut self.rng).saturating_add(base_damage)
    }

    /// Subtracts `damage` from the defender and publishes the outcome.
    ///
    /// Negative damage is clamped to zero. Returns `None` if the defender is unknown.
    pub fn apply_damage(
        &mut self,
        roster: &mut Roster,
        attacker: Option<CharacterId>,
        defender: CharacterId,
        damage: i32,
        sink: &mut impl EventSink,
    ) -> Option<DamageReport> {
        let Some(target) = roster.get_mut(defender) else {
            error!(?defender, "apply_damage: unknown defender");
            return None;
        };
        let amount = if damage < 0 {
            error!(damage, "apply_damage: negative damage clamped to zero");
            0
        } else {
            damage
        };

        let was_lethal = target.take_damage(amount);
        let remaining_hp = target.hp;
        debug!(target = %target.name, amount, remaining_hp, was_lethal, "damage applied");

        sink.publish(CombatEvent::CharacterDamaged {
            target: defender,
            amount,
            remaining_hp,
            attacker,
            was_lethal,
        });
        if was_lethal {
            sink.publish(CombatEvent::CharacterDied { character: defender, killer: attacker });
        }
        Some(DamageReport { amount, remaining_hp, was_lethal })
    }

    /// Basic weapon attack: range- and AP-gated, damage from the attacker's own dice.
    pub fn execute_attack(
        &mut self,
        roster: &mut Roster,
        attacker: CharacterId,
        defender: CharacterId,
        sink: &mut impl EventSink,
    ) -> Result<AttackReport, CombatError> {
        let atk = roster.get(attacker).ok_or(CombatError::UnknownCharacter(attacker))?;
        let def = roster.get(defender).ok_or(CombatError::UnknownCharacter(defender))?;
        if !atk.is_alive() {
            return Err(CombatError::AttackerDead);
        }
        if !def.is_alive() {
            return Err(CombatError::TargetDead);
        }
        let distance = manhattan_distance(atk.pos, def.pos);
        if distance > atk.attack_range {
            warn!(attacker = %atk.name, distance, range = atk.attack_range, "attack out of range");
            return Err(CombatError::OutOfRange { distance, range: atk.attack_range });
        }
        let available = atk.action_points.current();
        if available < self.attack_ap_cost {
            warn!(attacker = %atk.name, available, "not enough action points to attack");
            return Err(CombatError::InsufficientActionPoints {
                needed: self.attack_ap_cost,
                available,
            });
        }

        let dice = atk.attack_dice;
        let base = atk.base_attack;
        let damage = self.roll(&dice).saturating_add(base);

        roster[attacker].action_points.consume(self.attack_ap_cost);
        let report = self
            .apply_damage(roster, Some(attacker), defender, damage, sink)
            .ok_or(CombatError::UnknownCharacter(defender))?;
        Ok(AttackReport { attacker, defender, damage: report, ap_spent: self.attack_ap_cost })
    }
}

pub fn is_in_range(roster: &Roster, attacker: CharacterId, target: CharacterId, range: u32) -> bool {
    distance_between(roster, attacker, target).is_some_and(|d| d <= range)
}

/// Manhattan distance between two roster characters, `None` if either is unknown.
pub fn distance_between(roster: &Roster, a: CharacterId, b: CharacterId) -> Option<u32> {
    let (a, b) = (roster.get(a)?, roster.get(b)?);
    Some(manhattan_distance(a.pos, b.pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Character, enroll};
    use crate::events::NullSink;
    use crate::types::{CharacterKind, Pos, Team};

    fn duel(defender_pos: Pos) -> (Roster, CharacterId, CharacterId) {
        let mut roster = Roster::with_key();
        let fighter = enroll(
            &mut roster,
            Character::from_kind("Aldric", CharacterKind::Fighter, Team::Party, Pos::new(1, 1)),
        );
        let orc = enroll(
            &mut roster,
            Character::from_kind("Grosh", CharacterKind::Orc, Team::Enemy, defender_pos),
        );
        (roster, fighter, orc)
    }

    #[test]
    fn calculate_damage_stays_in_dice_bounds() {
        let (roster, fighter, orc) = duel(Pos::new(1, 2));
        let mut resolver = CombatResolver::new(3, 1);
        for _ in 0..200 {
            let dmg = resolver.calculate_damage(&roster, fighter, orc, "3d8", 5);
            assert!((8..=29).contains(&dmg), "{dmg} outside [8, 29]");
        }
    }

    #[test]
    fn calculate_damage_with_unknown_party_is_zero() {
        let (mut roster, fighter, orc) = duel(Pos::new(1, 2));
        roster.remove(orc);
        let mut resolver = CombatResolver::new(3, 1);
        assert_eq!(resolver.calculate_damage(&roster, fighter, orc, "3d8", 5), 0);
    }

    #[test]
    fn huge_base_damage_saturates() {
        let (roster, fighter, orc) = duel(Pos::new(1, 2));
        let mut resolver = CombatResolver::new(3, 1);
        assert_eq!(resolver.calculate_damage(&roster, fighter, orc, "3d8", i32::MAX), i32::MAX);
    }

    #[test]
    fn negative_damage_is_clamped() {
        let (mut roster, fighter, orc) = duel(Pos::new(1, 2));
        let mut resolver = CombatResolver::new(3, 1);
        let before = roster[orc].hp;
        let mut events = Vec::new();
        let report = resolver.apply_damage(&mut roster, Some(fighter), orc, -7, &mut events);
        assert_eq!(report.map(|r| r.amount), Some(0));
        assert_eq!(roster[orc].hp, before);
        assert!(matches!(events[0], CombatEvent::CharacterDamaged { amount: 0, .. }));
    }

    #[test]
    fn lethal_damage_publishes_death() {
        let (mut roster, fighter, orc) = duel(Pos::new(1, 2));
        let mut resolver = CombatResolver::new(3, 1);
        let mut events = Vec::new();
        let report = resolver.apply_damage(&mut roster, Some(fighter), orc, 100, &mut events);
        assert_eq!(report, Some(DamageReport { amount: 100, remaining_hp: 0, was_lethal: true }));
        assert_eq!(
            events.last(),
            Some(&CombatEvent::CharacterDied { character: orc, killer: Some(fighter) })
        );
    }

    #[test]
    fn adjacent_attack_spends_ap_and_hurts() {
        let (mut roster, fighter, orc) = duel(Pos::new(1, 2));
        let mut resolver = CombatResolver::new(11, 1);
        let hp_before = roster[orc].hp;
        let ap_before = roster[fighter].action_points.current();

        let report = resolver.execute_attack(&mut roster, fighter, orc, &mut NullSink);
        assert!(report.is_ok(), "{report:?}");
        assert!(roster[orc].hp < hp_before);
        assert_eq!(roster[fighter].action_points.current(), ap_before - 1);
    }

    #[test]
    fn configured_cost_is_charged() {
        let (mut roster, fighter, orc) = duel(Pos::new(1, 2));
        let mut resolver = CombatResolver::new(11, 2);
        resolver.execute_attack(&mut roster, fighter, orc, &mut NullSink).unwrap();
        assert_eq!(roster[fighter].action_points.current(), 0);
        assert_eq!(
            resolver.execute_attack(&mut roster, fighter, orc, &mut NullSink),
            Err(CombatError::InsufficientActionPoints { needed: 2, available: 0 })
        );
    }

    #[test]
    fn out_of_range_attack_changes_nothing() {
        let (mut roster, fighter, orc) = duel(Pos::new(4, 4));
        let mut resolver = CombatResolver::new(11, 1);
        let hp_before = roster[orc].hp;
        let result = resolver.execute_attack(&mut roster, fighter, orc, &mut NullSink);
        assert_eq!(result, Err(CombatError::OutOfRange { distance: 6, range: 1 }));
        assert_eq!(roster[orc].hp, hp_before);
        assert_eq!(roster[fighter].action_points.current(), 2);
    }

    #[test]
    fn dead_parties_cannot_trade_blows() {
        let (mut roster, fighter, orc) = duel(Pos::new(1, 2));
        let mut resolver = CombatResolver::new(11, 1);
        roster[orc].hp = 0;
        assert_eq!(
            resolver.execute_attack(&mut roster, fighter, orc, &mut NullSink),
            Err(CombatError::TargetDead)
        );
        assert_eq!(
            resolver.execute_attack(&mut roster, orc, fighter, &mut NullSink),
            Err(CombatError::AttackerDead)
        );
    }

    #[test]
    fn distance_helpers_handle_unknown_ids() {
        let (mut roster, fighter, orc) = duel(Pos::new(3, 4));
        assert_eq!(distance_between(&roster, fighter, orc), Some(5));
        assert!(is_in_range(&roster, fighter, orc, 5));
        assert!(!is_in_range(&roster, fighter, orc, 4));
        roster.remove(orc);
        assert_eq!(distance_between(&roster, fighter, orc), None);
        assert!(!is_in_range(&roster, fighter, orc, 99));
    }
}
