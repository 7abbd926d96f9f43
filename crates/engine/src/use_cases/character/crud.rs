//! Seed and read combat snapshots.

use std::sync::Arc;

use arena_domain::{
    CharacterId, CharacterName, CombatSnapshot, Health, Item, ItemCategory, ItemId, Level,
    RaceSkill,
};
use arena_shared::{CharacterData, ItemData, SaveCharacterRequest};

use crate::infrastructure::ports::CharacterRepo;

use super::types::character_to_protocol;
use super::CharacterError;

pub struct CharacterCrud {
    character_repo: Arc<dyn CharacterRepo>,
}

impl CharacterCrud {
    pub fn new(character_repo: Arc<dyn CharacterRepo>) -> Self {
        Self { character_repo }
    }

    pub async fn get(&self, id: CharacterId) -> Result<CharacterData, CharacterError> {
        let character = self
            .character_repo
            .get(id)
            .await?
            .ok_or(CharacterError::NotFound(id))?;
        let inventory = self.character_repo.get_inventory(id).await?;
        Ok(character_to_protocol(&character, &inventory))
    }

    /// Insert or replace a character's combat snapshot and inventory.
    ///
    /// A character that is currently fighting cannot be replaced.
    pub async fn save(&self, request: SaveCharacterRequest) -> Result<CharacterData, CharacterError> {
        let id = request
            .id
            .map(CharacterId::from_uuid)
            .unwrap_or_else(CharacterId::new);

        let primary = request.primary_item.as_ref().map(parse_item).transpose()?;
        let secondary = request.secondary_item.as_ref().map(parse_item).transpose()?;
        let mut inventory = request
            .inventory
            .iter()
            .map(parse_item)
            .collect::<Result<Vec<_>, _>>()?;
        for equipped in [primary, secondary].into_iter().flatten() {
            if !inventory.iter().any(|item| item.id == equipped.id) {
                inventory.push(equipped);
            }
        }

        let race_skill = match request.race_skill.as_deref() {
            Some(skill) => skill.parse::<RaceSkill>()?,
            None => RaceSkill::None,
        };
        let character = CombatSnapshot::new(id, CharacterName::new(request.name)?)
            .with_health(request.health.map(Health::new).transpose()?.unwrap_or_default())
            .with_level(request.level.map(Level::new).transpose()?.unwrap_or_default())
            .with_race_skill(race_skill)
            .with_primary_item(primary)
            .with_secondary_item(secondary);

        self.character_repo
            .save(&character, &inventory)
            .await
            .map_err(|e| {
                if e.is_in_use() {
                    CharacterError::InBattle(id)
                } else {
                    CharacterError::from(e)
                }
            })?;
        tracing::info!(
            character_id = %id,
            name = %character.name,
            items = inventory.len(),
            "Saved character"
        );

        Ok(character_to_protocol(&character, &inventory))
    }
}

fn parse_item(data: &ItemData) -> Result<Item, CharacterError> {
    let category = data.category.parse::<ItemCategory>()?;
    Ok(Item::new(ItemId::from_uuid(data.id), category, data.value)?)
}
