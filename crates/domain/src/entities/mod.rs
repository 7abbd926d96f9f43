//! Entity types for the battle domain.

mod battle;
mod combatant;
mod moves;

pub use battle::{Battle, BattleMove, BattlePhase};
pub use combatant::{CombatSnapshot, Item, ItemCategory, RaceSkill};
pub use moves::{Move, UnknownMove};
