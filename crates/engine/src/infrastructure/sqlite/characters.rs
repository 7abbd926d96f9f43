//! Character snapshots and inventories.

use async_trait::async_trait;

use arena_domain::{CharacterId, CombatSnapshot, Item};

use super::rows::{fetch_character, fetch_inventory};
use super::SqliteStore;
use crate::infrastructure::ports::{CharacterRepo, RepoError};

#[async_trait]
impl CharacterRepo for SqliteStore {
    async fn get(&self, id: CharacterId) -> Result<Option<CombatSnapshot>, RepoError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| RepoError::database("get_character", e))?;
        fetch_character(&mut conn, id).await
    }

    async fn save(&self, character: &CombatSnapshot, inventory: &[Item]) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("save_character", e))?;

        let upserted = sqlx::query(
            r#"
            INSERT INTO characters (id, name, health, level, race_skill, primary_item_id, secondary_item_id, in_battle)
            VALUES (?, ?, ?, ?, ?, ?, ?, 0)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                health = excluded.health,
                level = excluded.level,
                race_skill = excluded.race_skill,
                primary_item_id = excluded.primary_item_id,
                secondary_item_id = excluded.secondary_item_id
            WHERE characters.in_battle = 0
            "#,
        )
        .bind(character.id.to_string())
        .bind(character.name.as_str())
        .bind(character.health.value())
        .bind(character.level.value())
        .bind(character.race_skill.as_str())
        .bind(character.primary_item.map(|item| item.id.to_string()))
        .bind(character.secondary_item.map(|item| item.id.to_string()))
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("save_character", e))?;

        // The update is skipped for a character that is fighting.
        if upserted.rows_affected() == 0 {
            return Err(RepoError::in_use("Character", character.id));
        }

        sqlx::query("DELETE FROM inventory_items WHERE character_id = ?")
            .bind(character.id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("save_character", e))?;

        for item in inventory {
            sqlx::query(
                "INSERT INTO inventory_items (character_id, item_id, category, value) VALUES (?, ?, ?, ?)",
            )
            .bind(character.id.to_string())
            .bind(item.id.to_string())
            .bind(item.category.as_str())
            .bind(item.value)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("save_character", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("save_character", e))?;

        tracing::debug!(character_id = %character.id, items = inventory.len(), "Saved character");
        Ok(())
    }

    async fn get_inventory(&self, id: CharacterId) -> Result<Vec<Item>, RepoError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| RepoError::database("get_inventory", e))?;
        fetch_inventory(&mut conn, id).await
    }
}
