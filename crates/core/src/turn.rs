//! Turn order, turn and round counters, and the combat phase machine.
//! This module exists so turn advancement and dead-skipping live behind one small API.
//! It does not own characters or decide what the current actor does.

use tracing::{debug, info, warn};

use crate::character::{Roster, is_alive};
use crate::events::{CombatEvent, EventSink};
use crate::types::{CharacterId, TurnPhase};

#[derive(Clone, Debug)]
pub struct TurnManager {
    order: Vec<CharacterId>,
    current: usize,
    turn: u32,
    round: u32,
    phase: TurnPhase,
}

impl Default for TurnManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnManager {
    pub fn new() -> Self {
        Self { order: Vec::new(), current: 0, turn: 1, round: 1, phase: TurnPhase::Idle }
    }

    /// Copies `participants` minus dead or unknown ids. Does not start combat.
    pub fn initialize_turn_order(&mut self, roster: &Roster, participants: &[CharacterId]) {
        self.order = participants.iter().copied().filter(|id| is_alive(roster, *id)).collect();
        let dropped = participants.len() - self.order.len();
        if dropped > 0 {
            debug!(dropped, "dead or unknown participants left out of turn order");
        }
        self.current = 0;
        self.turn = 1;
        self.round = 1;
        self.phase = TurnPhase::Idle;
    }

    /// Returns false when there is nobody to fight.
    pub fn start_combat(&mut self, roster: &mut Roster, sink: &mut impl EventSink) -> bool {
        if self.order.is_empty() {
            warn!("start_combat with an empty turn order");
            return false;
        }
        self.phase = TurnPhase::CombatActive;
        self.current = 0;
        self.turn = 1;
        self.round = 1;
        info!(participants = self.order.len(), "combat started");
        sink.publish(CombatEvent::CombatStarted { participants: self.order.len() });
        self.start_next_turn(roster, sink);
        true
    }

    /// Skips forward to the next living participant and runs its turn-start upkeep.
    ///
    /// Ends combat when a full pass finds nobody alive.
    pub fn start_next_turn(&mut self, roster: &mut Roster, sink: &mut impl EventSink) {
        if self.phase != TurnPhase::CombatActive {
            return;
        }
        let len = self.order.len();
        let Some(offset) =
            (0..len).find(|step| is_alive(roster, self.order[(self.current + step) % len]))
        else {
            self.end_combat(sink);
            return;
        };
        let next = (self.current + offset) % len;
        if next < self.current {
            self.round += 1;
        }
        self.current = next;

        let id = self.order[next];
        let actor = &mut roster[id];
        actor.begin_turn();
        debug!(actor = %actor.name, turn = self.turn, round = self.round, "turn started");
        sink.publish(CombatEvent::TurnStarted { character: id, turn: self.turn, round: self.round });
    }

    pub fn end_current_turn(&mut self, roster: &mut Roster, sink: &mut impl EventSink) {
        if self.phase != TurnPhase::CombatActive {
            return;
        }
        if let Some(id) = self.current_character() {
            sink.publish(CombatEvent::TurnEnded { character: id, turn: self.turn });
        }
        self.current = (self.current + 1) % self.order.len();
        self.turn += 1;
        if self.current == 0 {
            self.round += 1;
        }
        self.start_next_turn(roster, sink);
    }

    pub fn end_combat(&mut self, sink: &mut impl EventSink) {
        if self.phase != TurnPhase::CombatActive {
            return;
        }
        self.phase = TurnPhase::CombatEnded;
        info!(turn = self.turn, round = self.round, "combat ended");
        sink.publish(CombatEvent::CombatEnded);
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn current_character(&self) -> Option<CharacterId> {
        self.order.get(self.current).copied()
    }

    pub fn turn_order(&self) -> &[CharacterId] {
        &self.order
    }

    pub fn turn_number(&self) -> u32 {
        self.turn
    }

    pub fn round_number(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn is_combat_active(&self) -> bool {
        self.phase == TurnPhase::CombatActive
    }
}
