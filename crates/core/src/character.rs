//! Combatant records and the arena that owns them.
//! Every other system refers to characters by `CharacterId` only.

use slotmap::SlotMap;

use crate::abilities::AbilityKind;
use crate::content::stat_block;
use crate::dice::DiceExpr;
use crate::resources::{ActionPoints, SpellSlots};
use crate::types::{CharacterId, CharacterKind, Controller, Pos, Team};

pub type Roster = SlotMap<CharacterId, Character>;

#[derive(Clone, Debug)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub kind: CharacterKind,
    pub team: Team,
    pub controller: Controller,
    pub pos: Pos,
    pub hp: i32,
    pub max_hp: i32,
    pub base_attack: i32,
    pub attack_dice: DiceExpr,
    pub attack_range: u32,
    pub movement_speed: u32,
    pub movement_left: u32,
    pub action_points: ActionPoints,
    pub spell_slots: SpellSlots,
    pub abilities: Vec<AbilityKind>,
    // Set by control effects; the next turn starts with no AP or movement.
    pub stunned: bool,
}

impl Character {
    pub fn from_kind(name: impl Into<String>, kind: CharacterKind, team: Team, pos: Pos) -> Self {
        let stats = stat_block(kind);
        Self {
            id: CharacterId::default(),
            name: name.into(),
            kind,
            team,
            controller: Controller::Ai,
            pos,
            hp: stats.hp,
            max_hp: stats.hp,
            base_attack: stats.base_attack,
            attack_dice: stats.attack_dice,
            attack_range: stats.attack_range,
            movement_speed: stats.movement_speed,
            movement_left: stats.movement_speed,
            action_points: ActionPoints::new(stats.action_points),
            spell_slots: SpellSlots::with_levels(stats.spell_slots),
            abilities: stats.abilities.to_vec(),
            stunned: false,
        }
    }

    pub fn with_controller(mut self, controller: Controller) -> Self {
        self.controller = controller;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        self.hp as f32 / self.max_hp as f32
    }

    pub fn has_ability(&self, ability: AbilityKind) -> bool {
        self.abilities.contains(&ability)
    }

    /// Returns true when this hit took the character from alive to dead.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        let was_alive = self.is_alive();
        self.hp = self.hp.saturating_sub(amount.max(0)).max(0);
        was_alive && !self.is_alive()
    }

    /// Returns the amount actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if !self.is_alive() {
            return 0;
        }
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount.max(0)).min(self.max_hp);
        self.hp - before
    }

    /// Turn-start upkeep: refill AP and movement, then apply a pending stun.
    pub fn begin_turn(&mut self) {
        self.action_points.refresh();
        self.movement_left = self.movement_speed;
        if self.stunned {
            self.action_points.drain();
            self.movement_left = 0;
            self.stunned = false;
        }
    }
}

/// Inserts `character` and stamps its roster id.
pub fn enroll(roster: &mut Roster, character: Character) -> CharacterId {
    let id = roster.insert(character);
    roster[id].id = id;
    id
}

pub fn is_alive(roster: &Roster, id: CharacterId) -> bool {
    roster.get(id).is_some_and(Character::is_alive)
}
