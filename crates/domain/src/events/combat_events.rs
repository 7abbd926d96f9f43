//! Combat-related domain events
//!
//! These enums communicate what happened during move resolution,
//! allowing callers to react appropriately.

use crate::value_objects::Health;

/// Outcome of applying attack damage to a character's health
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The attack did not get through the defence (damage <= 0)
    Deflected { damage: i32 },
    /// Character took damage but survived
    Wounded { damage_dealt: i32, remaining: Health },
    /// Character's health reached zero
    Defeated { damage_dealt: i32 },
}

impl DamageOutcome {
    /// Health after this outcome, given the health before it.
    pub fn remaining(&self, before: Health) -> Health {
        match self {
            Self::Deflected { .. } => before,
            Self::Wounded { remaining, .. } => *remaining,
            Self::Defeated { .. } => Health::DEFEATED,
        }
    }

    pub fn is_defeat(&self) -> bool {
        matches!(self, Self::Defeated { .. })
    }
}
