use crate::abilities::AbilityKind;
use crate::dice::DiceExpr;
use crate::types::CharacterKind;

const fn dice(count: u32, sides: u32, modifier: i32) -> DiceExpr {
    DiceExpr { count, sides, modifier }
}

pub struct StatBlock {
    pub hp: i32,
    pub base_attack: i32,
    pub attack_dice: DiceExpr,
    pub attack_range: u32,
    pub movement_speed: u32,
    pub action_points: u32,
    pub spell_slots: &'static [(u8, u32)],
    pub abilities: &'static [AbilityKind],
}

pub fn stat_block(kind: CharacterKind) -> StatBlock {
    match kind {
        CharacterKind::Fighter => StatBlock {
            hp: 44,
            base_attack: 3,
            attack_dice: dice(1, 8, 0),
            attack_range: 1,
            movement_speed: 3,
            action_points: 2,
            spell_slots: &[],
            abilities: &[AbilityKind::ShieldBash],
        },
        CharacterKind::Wizard => StatBlock {
            hp: 22,
            base_attack: 1,
            attack_dice: dice(1, 6, 0),
            attack_range: 1,
            movement_speed: 3,
            action_points: 2,
            spell_slots: &[(1, 3), (2, 2), (3, 1)],
            abilities: &[AbilityKind::Fireball, AbilityKind::MagicMissile],
        },
        CharacterKind::Cleric => StatBlock {
            hp: 32,
            base_attack: 2,
            attack_dice: dice(1, 6, 0),
            attack_range: 1,
            movement_speed: 3,
            action_points: 2,
            spell_slots: &[(1, 3), (2, 1)],
            abilities: &[AbilityKind::CureWounds],
        },
        CharacterKind::Rogue => StatBlock {
            hp: 28,
            base_attack: 3,
            attack_dice: dice(1, 6, 0),
            attack_range: 4,
            movement_speed: 4,
            action_points: 2,
            spell_slots: &[],
            abilities: &[AbilityKind::SneakAttack],
        },
        CharacterKind::Goblin => StatBlock {
            hp: 7,
            base_attack: 1,
            attack_dice: dice(1, 6, 0),
            attack_range: 1,
            movement_speed: 3,
            action_points: 1,
            spell_slots: &[],
            abilities: &[],
        },
        CharacterKind::Orc => StatBlock {
            hp: 15,
            base_attack: 3,
            attack_dice: dice(1, 12, 0),
            attack_range: 1,
            movement_speed: 3,
            action_points: 1,
            spell_slots: &[],
            abilities: &[],
        },
        CharacterKind::Dragon => StatBlock {
            hp: 90,
            base_attack: 5,
            attack_dice: dice(2, 10, 0),
            attack_range: 1,
            movement_speed: 4,
            action_points: 2,
            spell_slots: &[],
            abilities: &[AbilityKind::FireBreath],
        },
    }
}
