//! Tile-by-tile movement along a precomputed path.
//! A move in progress is explicit state advanced by elapsed simulation time;
//! grid occupancy and the character's position are updated together on every step.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::character::Roster;
use crate::events::{CombatEvent, EventSink};
use crate::grid::GridMap;
use crate::types::{CharacterId, Pos};

pub const DEFAULT_STEP_INTERVAL_SECS: f32 = 0.2;

#[derive(Clone, Debug, PartialEq)]
pub struct MovementState {
    actor: CharacterId,
    path: VecDeque<Pos>,
    elapsed: f32,
    interval: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Still walking.
    Moving,
    /// Path exhausted.
    Arrived,
    /// Stopped early: blocked cell, no movement left, or the actor died.
    Halted,
}

impl MovementState {
    pub fn new(actor: CharacterId, path: Vec<Pos>, interval: f32) -> Self {
        Self { actor, path: path.into(), elapsed: 0.0, interval: interval.max(0.0) }
    }

    pub fn remaining(&self) -> impl Iterator<Item = Pos> + '_ {
        self.path.iter().copied()
    }

    pub fn is_moving(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn cancel(&mut self) {
        if !self.path.is_empty() {
            debug!(remaining = self.path.len(), "movement cancelled");
        }
        self.path.clear();
        self.elapsed = 0.0;
    }

    /// Accumulates `dt` and takes one step per full interval.
    pub fn advance(
        &mut self,
        dt: f32,
        grid: &mut GridMap,
        roster: &mut Roster,
        sink: &mut impl EventSink,
    ) -> StepOutcome {
        self.elapsed += dt.max(0.0);
        while self.is_moving() && self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            if !self.step(grid, roster, sink) {
                self.cancel();
                return StepOutcome::Halted;
            }
        }
        if self.is_moving() { StepOutcome::Moving } else { StepOutcome::Arrived }
    }

    fn step(&mut self, grid: &mut GridMap, roster: &mut Roster, sink: &mut impl EventSink) -> bool {
        let Some(next) = self.path.front().copied() else {
            return false;
        };
        let Some(actor) = roster.get_mut(self.actor) else {
            return false;
        };
        if !actor.is_alive() || actor.movement_left == 0 {
            return false;
        }
        if !grid.is_walkable(next) {
            warn!(actor = %actor.name, ?next, "next step is blocked, stopping");
            return false;
        }
        let from = actor.pos;
        if !grid.move_character(from, next) {
            return false;
        }
        actor.pos = next;
        actor.movement_left -= 1;
        self.path.pop_front();
        sink.publish(CombatEvent::CharacterMoved { character: self.actor, from, to: next });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Character, enroll};
    use crate::events::NullSink;
    use crate::pathfinding::find_path;
    use crate::types::{CharacterKind, Team, TileType};

    fn walker(grid: &mut GridMap, at: Pos) -> (Roster, CharacterId) {
        let mut roster = Roster::with_key();
        let id = enroll(
            &mut roster,
            Character::from_kind("w", CharacterKind::Rogue, Team::Party, at),
        );
        assert!(grid.add_character(id, at));
        (roster, id)
    }

    #[test]
    fn steps_once_per_interval() {
        let mut grid = GridMap::default();
        let (mut roster, id) = walker(&mut grid, Pos::new(0, 0));
        let path = find_path(&grid, Pos::new(0, 0), Pos::new(0, 3));
        let mut movement = MovementState::new(id, path, 0.2);

        assert_eq!(movement.advance(0.1, &mut grid, &mut roster, &mut NullSink), StepOutcome::Moving);
        assert_eq!(roster[id].pos, Pos::new(0, 0));
        assert_eq!(movement.advance(0.1, &mut grid, &mut roster, &mut NullSink), StepOutcome::Moving);
        assert_eq!(roster[id].pos, Pos::new(0, 1));
        assert_eq!(grid.character_at(Pos::new(0, 1)), Some(id));
        assert_eq!(grid.character_at(Pos::new(0, 0)), None);

        assert_eq!(movement.advance(0.4, &mut grid, &mut roster, &mut NullSink), StepOutcome::Arrived);
        assert_eq!(roster[id].pos, Pos::new(0, 3));
        assert_eq!(roster[id].movement_left, 1);
    }

    #[test]
    fn blocked_cell_halts_and_keeps_occupancy_consistent() {
        let mut grid = GridMap::default();
        let (mut roster, id) = walker(&mut grid, Pos::new(0, 0));
        let path = find_path(&grid, Pos::new(0, 0), Pos::new(0, 3));
        let mut movement = MovementState::new(id, path, 0.2);
        grid.set_tile_type(Pos::new(0, 2), TileType::Wall);

        let mut events = Vec::new();
        assert_eq!(movement.advance(1.0, &mut grid, &mut roster, &mut events), StepOutcome::Halted);
        assert_eq!(roster[id].pos, Pos::new(0, 1));
        assert_eq!(grid.character_at(Pos::new(0, 1)), Some(id));
        assert_eq!(events.len(), 1);
        assert!(!movement.is_moving());
    }

    #[test]
    fn movement_allowance_caps_steps() {
        let mut grid = GridMap::default();
        let (mut roster, id) = walker(&mut grid, Pos::new(0, 0));
        roster[id].movement_left = 2;
        let path = find_path(&grid, Pos::new(0, 0), Pos::new(0, 5));
        let mut movement = MovementState::new(id, path, 0.2);
        assert_eq!(movement.advance(5.0, &mut grid, &mut roster, &mut NullSink), StepOutcome::Halted);
        assert_eq!(roster[id].pos, Pos::new(0, 2));
    }

    #[test]
    fn cancel_clears_pending_steps() {
        let mut grid = GridMap::default();
        let (mut roster, id) = walker(&mut grid, Pos::new(0, 0));
        let path = find_path(&grid, Pos::new(0, 0), Pos::new(0, 3));
        let mut movement = MovementState::new(id, path, 0.2);
        movement.advance(0.2, &mut grid, &mut roster, &mut NullSink);
        movement.cancel();
        assert!(!movement.is_moving());
        assert_eq!(movement.remaining().count(), 0);
        assert_eq!(movement.advance(1.0, &mut grid, &mut roster, &mut NullSink), StepOutcome::Arrived);
        assert_eq!(roster[id].pos, Pos::new(0, 1));
    }
}
