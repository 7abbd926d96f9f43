//! Combat view of a character.
//!
//! The character store owns the full character record; the battle engine
//! only ever reads this snapshot and writes health, the in-battle flag and
//! the inventory back through point updates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::{CharacterName, Health, Level};
use crate::{CharacterId, ItemId};

/// Bonus skill a character's race grants in combat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RaceSkill {
    #[default]
    None,
    Strength,
    Intelligence,
    Stealth,
}

impl RaceSkill {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Strength => "Strength",
            Self::Intelligence => "Intelligence",
            Self::Stealth => "Stealth",
        }
    }
}

impl fmt::Display for RaceSkill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RaceSkill {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "None" => Ok(Self::None),
            "Strength" => Ok(Self::Strength),
            "Intelligence" => Ok(Self::Intelligence),
            "Stealth" => Ok(Self::Stealth),
            _ => Err(DomainError::parse(format!("Unknown race skill: {}", s))),
        }
    }
}

/// What an item is good for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemCategory {
    #[default]
    None,
    Offense,
    Defense,
    Healing,
}

impl ItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Offense => "Offense",
            Self::Defense => "Defense",
            Self::Healing => "Healing",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "None" => Ok(Self::None),
            "Offense" => Ok(Self::Offense),
            "Defense" => Ok(Self::Defense),
            "Healing" => Ok(Self::Healing),
            _ => Err(DomainError::parse(format!("Unknown item category: {}", s))),
        }
    }
}

/// An item a character carries, equipped or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub category: ItemCategory,
    pub value: i32,
}

impl Item {
    pub const MIN_VALUE: i32 = 0;
    pub const MAX_VALUE: i32 = 100;

    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `value` is outside `0..=100`.
    pub fn new(id: ItemId, category: ItemCategory, value: i32) -> Result<Self, DomainError> {
        if !(Self::MIN_VALUE..=Self::MAX_VALUE).contains(&value) {
            return Err(DomainError::validation(format!(
                "Item value must be between {} and {}, got {}",
                Self::MIN_VALUE,
                Self::MAX_VALUE,
                value
            )));
        }
        Ok(Self {
            id,
            category,
            value,
        })
    }

    /// Contribution of this item to a move of the given category.
    pub fn value_for(&self, category: ItemCategory) -> i32 {
        if self.category == category {
            self.value
        } else {
            0
        }
    }
}

/// Everything the battle engine needs to know about a combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatSnapshot {
    pub id: CharacterId,
    pub name: CharacterName,
    pub health: Health,
    pub level: Level,
    pub race_skill: RaceSkill,
    pub primary_item: Option<Item>,
    pub secondary_item: Option<Item>,
    pub in_battle: bool,
}

impl CombatSnapshot {
    /// A fresh level 1 character at full health with nothing equipped.
    pub fn new(id: CharacterId, name: CharacterName) -> Self {
        Self {
            id,
            name,
            health: Health::FULL,
            level: Level::default(),
            race_skill: RaceSkill::None,
            primary_item: None,
            secondary_item: None,
            in_battle: false,
        }
    }

    pub fn with_health(mut self, health: Health) -> Self {
        self.health = health;
        self
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_race_skill(mut self, race_skill: RaceSkill) -> Self {
        self.race_skill = race_skill;
        self
    }

    pub fn with_primary_item(mut self, item: Option<Item>) -> Self {
        self.primary_item = item;
        self
    }

    pub fn with_secondary_item(mut self, item: Option<Item>) -> Self {
        self.secondary_item = item;
        self
    }

    pub fn with_in_battle(mut self, in_battle: bool) -> Self {
        self.in_battle = in_battle;
        self
    }

    pub fn is_defeated(&self) -> bool {
        self.health.is_defeated()
    }

    /// Level plus the race bonus that applies to `category`.
    ///
    /// Strength favours offense, Stealth favours defense, Intelligence
    /// gives a smaller bonus to both.
    pub fn skill_value(&self, category: ItemCategory) -> i32 {
        let bonus = match (category, self.race_skill) {
            (ItemCategory::Offense, RaceSkill::Strength) => 10,
            (ItemCategory::Defense, RaceSkill::Stealth) => 10,
            (ItemCategory::Offense | ItemCategory::Defense, RaceSkill::Intelligence) => 5,
            _ => 0,
        };
        self.level.value().saturating_add(bonus)
    }

    /// Combined contribution of both equipped slots to `category`.
    pub fn item_value(&self, category: ItemCategory) -> i32 {
        [self.primary_item, self.secondary_item]
            .iter()
            .flatten()
            .map(|item| item.value_for(category))
            .fold(0, i32::saturating_add)
    }

    /// Skill plus items, before the dice roll multiplies it.
    pub fn base_value(&self, category: ItemCategory) -> i32 {
        self.skill_value(category)
            .saturating_add(self.item_value(category))
    }
}
