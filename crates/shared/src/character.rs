//! Combat view of a character on the wire.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An item a character carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemData {
    pub id: Uuid,
    /// "None", "Offense", "Defense" or "Healing"
    pub category: String,
    pub value: i32,
}

/// A character as the battle engine sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterData {
    pub id: Uuid,
    pub name: String,
    pub health: i32,
    pub level: i32,
    pub race_skill: String,
    pub primary_item: Option<ItemData>,
    pub secondary_item: Option<ItemData>,
    pub in_battle: bool,
    #[serde(default)]
    pub inventory: Vec<ItemData>,
}

/// Body of `POST /api/characters`.
///
/// Omitted stats fall back to a fresh character: full health, level 1, no
/// race skill. Equipped items are added to the inventory if missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCharacterRequest {
    /// Existing id to overwrite; a new id is assigned when absent
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub health: Option<i32>,
    #[serde(default)]
    pub level: Option<i32>,
    #[serde(default)]
    pub race_skill: Option<String>,
    #[serde(default)]
    pub primary_item: Option<ItemData>,
    #[serde(default)]
    pub secondary_item: Option<ItemData>,
    #[serde(default)]
    pub inventory: Vec<ItemData>,
}
