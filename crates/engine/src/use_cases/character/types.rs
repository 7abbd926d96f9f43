//! Wire representations of combat snapshots.

use arena_domain::{CombatSnapshot, Item};
use arena_shared::{CharacterData, ItemData};

pub fn item_to_protocol(item: &Item) -> ItemData {
    ItemData {
        id: item.id.to_uuid(),
        category: item.category.to_string(),
        value: item.value,
    }
}

pub fn character_to_protocol(character: &CombatSnapshot, inventory: &[Item]) -> CharacterData {
    CharacterData {
        id: character.id.to_uuid(),
        name: character.name.to_string(),
        health: character.health.value(),
        level: character.level.value(),
        race_skill: character.race_skill.to_string(),
        primary_item: character.primary_item.as_ref().map(item_to_protocol),
        secondary_item: character.secondary_item.as_ref().map(item_to_protocol),
        in_battle: character.in_battle,
        inventory: inventory.iter().map(item_to_protocol).collect(),
    }
}
