//! Bounded combat stats: health and level.
//!
//! Both are valid by construction. Health lives in `0..=100` and a value of
//! zero means the character has been defeated. Level lives in `1..=10`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;
use crate::events::DamageOutcome;

// ============================================================================
// Health
// ============================================================================

/// Current hit points of a character, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Health(i32);

impl Health {
    pub const MIN: i32 = 0;
    pub const MAX: i32 = 100;

    /// Full health, the value every new character starts with.
    pub const FULL: Health = Health(Self::MAX);

    /// Zero health: the character is defeated.
    pub const DEFEATED: Health = Health(Self::MIN);

    /// Create a validated health value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `value` is outside `0..=100`.
    pub fn new(value: i32) -> Result<Self, DomainError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(DomainError::validation(format!(
                "Health must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )));
        }
        Ok(Self(value))
    }

    /// Create a health value, clamping anything outside the legal range.
    pub fn clamped(value: i32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> i32 {
        self.0
    }

    pub fn is_defeated(self) -> bool {
        self.0 == Self::MIN
    }

    /// Apply `damage` points of damage.
    ///
    /// Non-positive damage leaves health untouched. Health never drops below
    /// zero; reaching zero reports `Defeated`.
    pub fn take_damage(self, damage: i32) -> DamageOutcome {
        if damage <= 0 {
            return DamageOutcome::Deflected { damage };
        }

        let remaining = self.0.saturating_sub(damage).max(Self::MIN);
        if remaining == Self::MIN {
            DamageOutcome::Defeated {
                damage_dealt: damage,
            }
        } else {
            DamageOutcome::Wounded {
                damage_dealt: damage,
                remaining: Health(remaining),
            }
        }
    }

    /// Health left after yielding a battle: halved and rounded down, except
    /// that a single remaining point is kept so yielding never defeats.
    pub fn yielded(self) -> Self {
        if self.0 == 1 {
            self
        } else {
            Self(self.0 / 2)
        }
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::FULL
    }
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for Health {
    type Error = DomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Health> for i32 {
    fn from(health: Health) -> i32 {
        health.0
    }
}

// ============================================================================
// Level
// ============================================================================

/// Experience level of a character, always within `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Level(i32);

impl Level {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 10;

    /// Create a validated level.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `value` is outside `1..=10`.
    pub fn new(value: i32) -> Result<Self, DomainError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(DomainError::validation(format!(
                "Level must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

impl Default for Level {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for Level {
    type Error = DomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Level> for i32 {
    fn from(level: Level) -> i32 {
        level.0
    }
}
