//! Arena domain: battles between characters and the rules that drive them.
//!
//! - `entities` - battles, move log entries, combat snapshots
//! - `value_objects` - validated stats and names
//! - `combat` - move legality and move resolution
//! - `events` - outcomes reported by state-changing operations

extern crate self as arena_domain;

pub mod combat;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod value_objects;

pub use entities::{
    Battle, BattleMove, BattlePhase, CombatSnapshot, Item, ItemCategory, Move, RaceSkill,
    UnknownMove,
};
pub use error::DomainError;
pub use events::DamageOutcome;
pub use ids::{BattleId, BattleMoveId, CharacterId, ItemId};
pub use value_objects::{CharacterName, Health, Level};
