pub mod abilities;
pub mod ai;
pub mod battle;
pub mod character;
pub mod combat;
pub mod config;
pub mod content;
pub mod dice;
pub mod events;
pub mod grid;
pub mod movement;
pub mod pathfinding;
pub mod resources;
pub mod turn;
pub mod types;

pub use abilities::{AbilityError, AbilityKind, AbilityOutcome};
pub use ai::{AiContext, AiStrategy, make_decision};
pub use battle::{Battle, CommandError, SetupError};
pub use character::{Character, Roster};
pub use combat::{CombatError, CombatResolver};
pub use config::{BattleConfig, ConfigError};
pub use dice::{DiceError, DiceExpr, roll_dice_from_string};
pub use events::{CombatEvent, EventSink, NullSink};
pub use grid::GridMap;
pub use movement::MovementState;
pub use pathfinding::{find_path, manhattan_distance};
pub use resources::{ActionPoints, SpellSlots};
pub use turn::TurnManager;
pub use types::*;
