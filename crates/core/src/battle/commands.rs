//! Player-issued actions for the character whose turn it is.
//! Commands go through the same resolvers as AI decisions but report failures to the caller.

use super::*;
use crate::abilities::AbilityOutcome;
use crate::combat::{AttackReport, CombatError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("combat is not active")]
    CombatNotActive,
    #[error("the current actor is not player-controlled")]
    NotPlayersTurn,
    #[error("the current actor is still moving")]
    StillMoving,
    #[error("no path to {0:?}")]
    NoPath(Pos),
    #[error("destination is {needed} steps away, {available} left this turn")]
    TooFar { needed: u32, available: u32 },
    #[error(transparent)]
    Combat(#[from] CombatError),
    #[error(transparent)]
    Ability(#[from] AbilityError),
}

impl Battle {
    fn player_actor(&self) -> Result<CharacterId, CommandError> {
        if !self.turns.is_combat_active() {
            return Err(CommandError::CombatNotActive);
        }
        let actor = self.turns.current_character().ok_or(CommandError::CombatNotActive)?;
        if self.roster[actor].controller != Controller::Player {
            return Err(CommandError::NotPlayersTurn);
        }
        Ok(actor)
    }

    fn idle_player_actor(&self) -> Result<CharacterId, CommandError> {
        let actor = self.player_actor()?;
        if self.is_moving() {
            return Err(CommandError::StillMoving);
        }
        Ok(actor)
    }

    /// Starts walking to `dest`; the steps happen on later ticks.
    pub fn command_move(&mut self, dest: Pos) -> Result<(), CommandError> {
        let actor = self.idle_player_actor()?;
        let mover = &self.roster[actor];
        let path = find_path(&self.grid, mover.pos, dest);
        if path.is_empty() {
            return Err(CommandError::NoPath(dest));
        }
        let needed = path.len() as u32;
        if needed > mover.movement_left {
            return Err(CommandError::TooFar { needed, available: mover.movement_left });
        }
        debug!(actor = %mover.name, ?dest, steps = needed, "player move");
        self.movement = Some(MovementState::new(actor, path, self.rules.step_interval_secs));
        Ok(())
    }

    pub fn command_attack(&mut self, target: CharacterId) -> Result<AttackReport, CommandError> {
        let actor = self.idle_player_actor()?;
        let report = self.combat.execute_attack(&mut self.roster, actor, target, &mut self.log)?;
        self.after_action();
        Ok(report)
    }

    pub fn command_ability(
        &mut self,
        ability: AbilityKind,
        target: CharacterId,
    ) -> Result<AbilityOutcome, CommandError> {
        let actor = self.idle_player_actor()?;
        let outcome =
            cast(&mut self.combat, &mut self.roster, ability, actor, target, &mut self.log)?;
        self.after_action();
        Ok(outcome)
    }

    /// Ends the player's turn, dropping any unfinished move.
    pub fn command_end_turn(&mut self) -> Result<(), CommandError> {
        self.player_actor()?;
        self.end_turn();
        Ok(())
    }

    /// Clears a player's pending path. Returns false if there was nothing to cancel.
    pub fn cancel_move(&mut self) -> bool {
        if self.player_actor().is_err() {
            return false;
        }
        match self.movement.take() {
            Some(mut movement) if movement.is_moving() => {
                movement.cancel();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn player_vs_goblin() -> (Battle, CharacterId, CharacterId) {
        let mut battle = Battle::new(9, GridMap::default(), RulesConfig::default());
        let hero = spawn_player(&mut battle, CharacterKind::Fighter, Pos::new(0, 0));
        let goblin = spawn_at(&mut battle, CharacterKind::Goblin, Team::Enemy, Pos::new(0, 4));
        assert!(battle.start());
        (battle, hero, goblin)
    }

    #[test]
    fn player_turn_pauses_the_loop() {
        let (mut battle, hero, _) = player_vs_goblin();
        let result = battle.advance(100, 0.2);
        assert_eq!(result.stop_reason, StopReason::AwaitingPlayer(hero));
        assert_eq!(result.simulated_ticks, 0);
    }

    #[test]
    fn move_command_walks_over_ticks() {
        let (mut battle, hero, _) = player_vs_goblin();
        battle.command_move(Pos::new(0, 2)).unwrap();
        assert_eq!(battle.command_move(Pos::new(0, 1)), Err(CommandError::StillMoving));
        battle.tick(0.2);
        battle.tick(0.2);
        assert_eq!(battle.roster()[hero].pos, Pos::new(0, 2));
        assert!(!battle.is_moving());
        assert_eq!(battle.roster()[hero].movement_left, 1);
        assert_eq!(
            battle.command_move(Pos::new(2, 2)),
            Err(CommandError::TooFar { needed: 2, available: 1 })
        );
    }

    #[test]
    fn cancel_stops_a_move_midway() {
        let (mut battle, hero, _) = player_vs_goblin();
        battle.command_move(Pos::new(0, 3)).unwrap();
        battle.tick(0.2);
        assert!(battle.cancel_move());
        assert!(!battle.cancel_move());
        battle.tick(0.2);
        assert_eq!(battle.roster()[hero].pos, Pos::new(0, 1));
        assert_eq!(battle.grid().character_at(Pos::new(0, 1)), Some(hero));
    }

    #[test]
    fn attack_command_reports_range_errors() {
        let (mut battle, _, goblin) = player_vs_goblin();
        assert_eq!(
            battle.command_attack(goblin),
            Err(CommandError::Combat(CombatError::OutOfRange { distance: 4, range: 1 }))
        );
    }

    #[test]
    fn killing_the_last_enemy_wins() {
        let (mut battle, _, goblin) = player_vs_goblin();
        battle.command_move(Pos::new(0, 3)).unwrap();
        battle.advance(10, 0.2);
        battle.roster[goblin].hp = 1;
        battle.command_attack(goblin).unwrap();
        assert_eq!(battle.outcome(), Some(BattleOutcome::PartyVictory));
        assert_eq!(battle.grid().character_at(Pos::new(0, 4)), None);
        assert_eq!(battle.command_end_turn(), Err(CommandError::CombatNotActive));
    }

    #[test]
    fn ending_the_turn_hands_over_to_ai() {
        let (mut battle, hero, goblin) = player_vs_goblin();
        assert!(matches!(
            battle.command_ability(AbilityKind::ShieldBash, goblin),
            Err(CommandError::Ability(AbilityError::OutOfRange { .. }))
        ));
        battle.command_end_turn().unwrap();
        assert_eq!(battle.current_actor(), Some(goblin));
        assert_eq!(battle.command_end_turn(), Err(CommandError::NotPlayersTurn));
        let result = battle.advance(100, 0.2);
        assert_eq!(result.stop_reason, StopReason::AwaitingPlayer(hero));
    }
}
