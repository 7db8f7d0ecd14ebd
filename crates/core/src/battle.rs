//! One battle: board, roster, turn flow and the tick loop that drives them.
//! This module exists to execute decisions and player commands against the core systems.
//! It does not choose AI actions; `ai` does. It does not render or read input.

mod commands;
mod hash;
#[cfg(test)]
mod test_support;

use tracing::{debug, info, warn};

use crate::abilities::{AbilityError, AbilityKind, cast};
use crate::ai::{AiContext, make_decision};
use crate::character::{Character, Roster, enroll, is_alive};
use crate::combat::CombatResolver;
use crate::config::{BattleConfig, RulesConfig};
use crate::events::{CombatEvent, EventSink};
use crate::grid::GridMap;
use crate::movement::{MovementState, StepOutcome};
use crate::pathfinding::find_path;
use crate::turn::TurnManager;
use crate::types::*;

pub use commands::CommandError;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("board must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("{0:?} is outside the board")]
    OutOfBounds(Pos),
    #[error("{0:?} is already occupied")]
    Occupied(Pos),
    #[error("{pos:?} is {tile:?} and cannot hold a combatant")]
    Blocked { pos: Pos, tile: TileType },
    #[error("max_actions_per_turn must be at least 1")]
    NoActionsPerTurn,
}

pub struct Battle {
    seed: u64,
    tick: u64,
    grid: GridMap,
    roster: Roster,
    turns: TurnManager,
    combat: CombatResolver,
    movement: Option<MovementState>,
    rules: RulesConfig,
    log: Vec<CombatEvent>,
    actions_this_turn: u32,
    outcome: Option<BattleOutcome>,
}

impl Battle {
    pub fn new(seed: u64, grid: GridMap, rules: RulesConfig) -> Self {
        Self {
            seed,
            tick: 0,
            grid,
            roster: Roster::with_key(),
            turns: TurnManager::new(),
            combat: CombatResolver::new(seed, rules.attack_ap_cost),
            movement: None,
            rules,
            log: Vec::new(),
            actions_this_turn: 0,
            outcome: None,
        }
    }

    pub fn from_config(config: &BattleConfig) -> Result<Self, SetupError> {
        let (width, height) = (config.grid.width, config.grid.height);
        if width == 0 || height == 0 {
            return Err(SetupError::EmptyGrid { width, height });
        }
        if config.rules.max_actions_per_turn == 0 {
            return Err(SetupError::NoActionsPerTurn);
        }

        let mut grid = GridMap::new(width, height);
        for tile in &config.grid.tiles {
            let pos = Pos::new(tile.x, tile.y);
            if !grid.is_valid_tile(pos) {
                return Err(SetupError::OutOfBounds(pos));
            }
            grid.set_tile_type(pos, tile.tile);
        }

        let mut battle = Self::new(config.seed, grid, config.rules);
        for (i, entry) in config.combatants.iter().enumerate() {
            let name = entry.name.clone().unwrap_or_else(|| format!("{:?} {}", entry.kind, i + 1));
            let pos = Pos::new(entry.x, entry.y);
            let character = Character::from_kind(name, entry.kind, entry.team, pos)
                .with_controller(entry.controller);
            battle.spawn(character)?;
        }
        Ok(battle)
    }

    /// Places `character` on the board and the roster.
    pub fn spawn(&mut self, character: Character) -> Result<CharacterId, SetupError> {
        let pos = character.pos;
        match self.grid.tile_type(pos) {
            TileType::Invalid => return Err(SetupError::OutOfBounds(pos)),
            TileType::Empty => {}
            tile => return Err(SetupError::Blocked { pos, tile }),
        }
        if self.grid.is_occupied(pos) {
            return Err(SetupError::Occupied(pos));
        }
        let id = enroll(&mut self.roster, character);
        self.grid.add_character(id, pos);
        Ok(id)
    }

    /// Builds the turn order from the roster in spawn order and begins combat.
    pub fn start(&mut self) -> bool {
        let participants: Vec<CharacterId> = self.roster.keys().collect();
        self.turns.initialize_turn_order(&self.roster, &participants);
        if !self.turns.start_combat(&mut self.roster, &mut self.log) {
            return false;
        }
        self.actions_this_turn = 0;
        self.settle_outcome();
        true
    }

    /// Runs ticks until the battle ends, a player must act, or `max_ticks` pass.
    pub fn advance(&mut self, max_ticks: u32, dt: f32) -> AdvanceResult {
        let mut ticks = 0;
        while ticks < max_ticks {
            if let Some(stop_reason) = self.tick(dt) {
                return AdvanceResult { simulated_ticks: ticks, stop_reason };
            }
            ticks += 1;
        }
        AdvanceResult { simulated_ticks: ticks, stop_reason: StopReason::BudgetExhausted }
    }

    /// Does at most one unit of work: one movement update or one AI action.
    ///
    /// Returns `Some` when nothing can happen without outside input.
    pub fn tick(&mut self, dt: f32) -> Option<StopReason> {
        if let Some(outcome) = self.outcome {
            return Some(StopReason::Finished(outcome));
        }
        if !self.turns.is_combat_active() {
            return None;
        }

        if let Some(movement) = self.movement.as_mut() {
            self.tick += 1;
            let step = movement.advance(dt, &mut self.grid, &mut self.roster, &mut self.log);
            if step != StepOutcome::Moving {
                self.movement = None;
            }
            return None;
        }

        let actor = self.turns.current_character()?;
        if self.roster[actor].controller == Controller::Player {
            return Some(StopReason::AwaitingPlayer(actor));
        }

        self.tick += 1;
        if self.actions_this_turn >= self.rules.max_actions_per_turn {
            warn!(actor = %self.roster[actor].name, "action cap reached, ending turn");
            self.end_turn();
            return None;
        }

        let ctx = AiContext::new(&self.grid, &self.roster).with_attack_cost(self.rules.attack_ap_cost);
        let decision = make_decision(&ctx, actor);
        self.log.publish(CombatEvent::AiDecisionMade {
            actor,
            decision: decision.kind,
            target: decision.target,
            reasoning: decision.reasoning.clone(),
        });
        if !self.execute(actor, &decision) {
            self.end_turn();
        }
        None
    }

    /// Applies one AI decision. Returns false when the turn should end.
    fn execute(&mut self, actor: CharacterId, decision: &AiDecision) -> bool {
        let done = match (decision.kind, decision.target, decision.destination, decision.ability) {
            (DecisionKind::Move, _, Some(dest), _) => self.begin_move(actor, dest),
            (DecisionKind::Attack, Some(target), _, _) => {
                self.combat.execute_attack(&mut self.roster, actor, target, &mut self.log).is_ok()
            }
            (DecisionKind::UseAbility, Some(target), _, Some(name)) => {
                match AbilityKind::from_name(name) {
                    Some(ability) => self.use_ability(actor, ability, target).is_ok(),
                    None => {
                        warn!(name, "decision names an unknown ability");
                        false
                    }
                }
            }
            (DecisionKind::EndTurn | DecisionKind::None, ..) => false,
            _ => {
                warn!(?decision, "incomplete decision");
                false
            }
        };
        if done {
            self.actions_this_turn += 1;
            self.after_action();
        }
        done && self.turns.is_combat_active()
    }

    fn begin_move(&mut self, actor: CharacterId, dest: Pos) -> bool {
        let from = self.roster[actor].pos;
        let path = find_path(&self.grid, from, dest);
        if path.is_empty() {
            debug!(?from, ?dest, "no path for move");
            return false;
        }
        self.movement = Some(MovementState::new(actor, path, self.rules.step_interval_secs));
        true
    }

    fn use_ability(
        &mut self,
        actor: CharacterId,
        ability: AbilityKind,
        target: CharacterId,
    ) -> Result<(), AbilityError> {
        cast(&mut self.combat, &mut self.roster, ability, actor, target, &mut self.log).map(|_| ())
    }

    /// Clears the dead off the board and checks whether a side has won.
    fn after_action(&mut self) {
        let fallen: Vec<(Pos, CharacterId)> = self
            .grid
            .occupants()
            .filter(|(_, id)| !is_alive(&self.roster, *id))
            .collect();
        for (pos, id) in fallen {
            debug!(name = %self.roster[id].name, ?pos, "removing fallen combatant");
            self.grid.remove_character(pos);
        }
        self.settle_outcome();
    }

    fn end_turn(&mut self) {
        self.movement = None;
        self.actions_this_turn = 0;
        self.turns.end_current_turn(&mut self.roster, &mut self.log);
        self.settle_outcome();
    }

    fn settle_outcome(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        let alive = |team: Team| self.roster.values().any(|c| c.team == team && c.is_alive());
        let (party, enemy) = (alive(Team::Party), alive(Team::Enemy));
        let outcome = match (party, enemy) {
            (true, true) => return,
            (true, false) => BattleOutcome::PartyVictory,
            (false, true) => BattleOutcome::PartyDefeat,
            (false, false) => BattleOutcome::Draw,
        };
        self.movement = None;
        self.turns.end_combat(&mut self.log);
        self.outcome = Some(outcome);
        info!(?outcome, round = self.turns.round_number(), "battle decided");
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn grid(&self) -> &GridMap {
        &self.grid
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.roster.get(id)
    }

    pub fn turns(&self) -> &TurnManager {
        &self.turns
    }

    pub fn log(&self) -> &[CombatEvent] {
        &self.log
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn current_actor(&self) -> Option<CharacterId> {
        self.turns.current_character()
    }

    pub fn is_moving(&self) -> bool {
        self.movement.as_ref().is_some_and(MovementState::is_moving)
    }
}
