//! Fire-and-forget notifications published by the combat core.
//! This module exists so observers (UI, logs, tests) can follow a battle without coupling to it.
//! It does not own delivery guarantees; publishing never fails and may be a no-op.

use crate::types::{CharacterId, DecisionKind, Pos};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CombatEvent {
    CombatStarted { participants: usize },
    TurnStarted { character: CharacterId, turn: u32, round: u32 },
    TurnEnded { character: CharacterId, turn: u32 },
    CharacterMoved { character: CharacterId, from: Pos, to: Pos },
    CharacterDamaged {
        target: CharacterId,
        amount: i32,
        remaining_hp: i32,
        attacker: Option<CharacterId>,
        was_lethal: bool,
    },
    CharacterHealed { target: CharacterId, amount: i32, remaining_hp: i32, healer: CharacterId },
    CharacterDied { character: CharacterId, killer: Option<CharacterId> },
    AbilityUsed { caster: CharacterId, target: CharacterId, ability: &'static str },
    AiDecisionMade {
        actor: CharacterId,
        decision: DecisionKind,
        target: Option<CharacterId>,
        reasoning: String,
    },
    CombatEnded,
}

pub trait EventSink {
    fn publish(&mut self, event: CombatEvent);
}

impl EventSink for Vec<CombatEvent> {
    fn publish(&mut self, event: CombatEvent) {
        self.push(event);
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&mut self, _event: CombatEvent) {}
}
