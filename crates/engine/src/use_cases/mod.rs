//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.

pub mod battle;
pub mod character;

pub use battle::BattleUseCases;
pub use character::CharacterUseCases;
