use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct CharacterId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileType {
    Empty,
    Wall,
    Lava,
    Difficult,
    Exit,
    /// Returned for coordinates outside the board; never stored.
    Invalid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CharacterKind {
    Fighter,
    Wizard,
    Cleric,
    Rogue,
    Goblin,
    Orc,
    Dragon,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Team {
    Party,
    Enemy,
}

impl Team {
    pub fn is_opposed_to(self, other: Team) -> bool {
        self != other
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Controller {
    #[default]
    Ai,
    Player,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecisionKind {
    Move,
    Attack,
    UseAbility,
    EndTurn,
    None,
}

/// One step chosen by an AI strategy. `reasoning` is diagnostic only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AiDecision {
    pub kind: DecisionKind,
    pub target: Option<CharacterId>,
    pub destination: Option<Pos>,
    pub ability: Option<&'static str>,
    pub reasoning: String,
}

impl AiDecision {
    pub fn end_turn(reasoning: impl Into<String>) -> Self {
        Self {
            kind: DecisionKind::EndTurn,
            target: None,
            destination: None,
            ability: None,
            reasoning: reasoning.into(),
        }
    }

    pub fn move_to(destination: Pos, target: CharacterId, reasoning: impl Into<String>) -> Self {
        Self {
            kind: DecisionKind::Move,
            target: Some(target),
            destination: Some(destination),
            ability: None,
            reasoning: reasoning.into(),
        }
    }

    pub fn attack(target: CharacterId, reasoning: impl Into<String>) -> Self {
        Self {
            kind: DecisionKind::Attack,
            target: Some(target),
            destination: None,
            ability: None,
            reasoning: reasoning.into(),
        }
    }

    pub fn use_ability(
        ability: &'static str,
        target: CharacterId,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            kind: DecisionKind::UseAbility,
            target: Some(target),
            destination: None,
            ability: Some(ability),
            reasoning: reasoning.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    Idle,
    CombatActive,
    CombatEnded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleOutcome {
    PartyVictory,
    PartyDefeat,
    Draw,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    Finished(BattleOutcome),
    AwaitingPlayer(CharacterId),
    BudgetExhausted,
}

#[derive(Clone, Debug)]
pub struct AdvanceResult {
    pub simulated_ticks: u32,
    pub stop_reason: StopReason,
}
