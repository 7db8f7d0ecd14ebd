//! Stable snapshot hashing for deterministic verification.
//! This module exists to keep hashing concerns separate from the tick loop.
//! It does not own the event log; two runs can be compared by hash alone.

use std::hash::Hasher;

use super::*;
use xxhash_rust::xxh3::Xxh3;

impl Battle {
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u64(self.tick);
        hasher.write_u32(self.turns.turn_number());
        hasher.write_u32(self.turns.round_number());
        hasher.write_u8(match self.turns.phase() {
            TurnPhase::Idle => 0,
            TurnPhase::CombatActive => 1,
            TurnPhase::CombatEnded => 2,
        });
        hasher.write_u8(match self.outcome {
            None => 0,
            Some(BattleOutcome::PartyVictory) => 1,
            Some(BattleOutcome::PartyDefeat) => 2,
            Some(BattleOutcome::Draw) => 3,
        });
        for c in self.roster.values() {
            hasher.write_i32(c.pos.x);
            hasher.write_i32(c.pos.y);
            hasher.write_i32(c.hp);
            hasher.write_u32(c.action_points.current());
            hasher.write_u32(c.movement_left);
            hasher.write_u8(u8::from(c.stunned));
            for level in c.spell_slots.levels() {
                hasher.write_u8(level);
                hasher.write_u32(c.spell_slots.current(level));
            }
        }
        if let Some(movement) = &self.movement {
            for step in movement.remaining() {
                hasher.write_i32(step.x);
                hasher.write_i32(step.y);
            }
        }
        hasher.finish()
    }
}
