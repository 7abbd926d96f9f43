//! Battle queries and the transactional unit of work.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqliteConnection, Transaction};

use arena_domain::{
    Battle, BattleId, BattleMove, BattleMoveId, CharacterId, CombatSnapshot, Health, ItemId,
};

use super::rows::{
    battle_from_row, battle_move_from_row, fetch_battle, fetch_character, parse_id, BATTLE_SELECT,
};
use super::SqliteStore;
use crate::infrastructure::ports::{BattleRepo, BattleUnitOfWork, RepoError};

#[async_trait]
impl BattleRepo for SqliteStore {
    async fn begin(&self) -> Result<Box<dyn BattleUnitOfWork>, RepoError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("begin", e))?;
        Ok(Box::new(SqliteUnitOfWork { tx: Some(tx) }))
    }

    async fn list_battles(&self) -> Result<Vec<Battle>, RepoError> {
        let rows = sqlx::query(&format!("{BATTLE_SELECT} ORDER BY b.start_date"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("list_battles", e))?;
        rows.iter().map(battle_from_row).collect()
    }

    async fn get_battle(&self, id: BattleId) -> Result<Option<Battle>, RepoError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| RepoError::database("get_battle", e))?;
        fetch_battle(&mut conn, id).await
    }

    async fn get_battle_move(&self, id: BattleMoveId) -> Result<Option<BattleMove>, RepoError> {
        let row = sqlx::query(
            "SELECT id, battle_id, opponent_id, move, create_date FROM battle_moves WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("get_battle_move", e))?;
        row.as_ref()
            .map(|row| battle_move_from_row(row, ""))
            .transpose()
    }

    async fn list_moves(&self, battle_id: BattleId) -> Result<Vec<BattleMove>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT id, battle_id, opponent_id, move, create_date
            FROM battle_moves
            WHERE battle_id = ?
            ORDER BY seq
            "#,
        )
        .bind(battle_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_moves", e))?;
        rows.iter()
            .map(|row| battle_move_from_row(row, ""))
            .collect()
    }

    async fn list_active_battles_for(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<Battle>, RepoError> {
        let rows = sqlx::query(&format!(
            "{BATTLE_SELECT} WHERE b.active = 1 AND (b.opponent1_id = ? OR b.opponent2_id = ?) ORDER BY b.start_date"
        ))
        .bind(character_id.to_string())
        .bind(character_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("list_active_battles_for", e))?;
        rows.iter().map(battle_from_row).collect()
    }
}

/// One SQLite transaction. Dropping it uncommitted rolls the transaction back.
struct SqliteUnitOfWork {
    tx: Option<Transaction<'static, Sqlite>>,
}

impl SqliteUnitOfWork {
    fn conn(&mut self, operation: &'static str) -> Result<&mut SqliteConnection, RepoError> {
        match self.tx.as_mut() {
            Some(tx) => Ok(&mut **tx),
            None => Err(RepoError::database(
                operation,
                "unit of work already finished",
            )),
        }
    }
}

#[async_trait]
impl BattleUnitOfWork for SqliteUnitOfWork {
    async fn get_character(
        &mut self,
        id: CharacterId,
    ) -> Result<Option<CombatSnapshot>, RepoError> {
        let conn = self.conn("get_character")?;
        fetch_character(conn, id).await
    }

    async fn update_character_health(
        &mut self,
        id: CharacterId,
        health: Health,
    ) -> Result<(), RepoError> {
        let conn = self.conn("update_character_health")?;
        let result = sqlx::query("UPDATE characters SET health = ? WHERE id = ?")
            .bind(health.value())
            .bind(id.to_string())
            .execute(conn)
            .await
            .map_err(|e| RepoError::database("update_character_health", e))?;
        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Character", id));
        }
        tracing::debug!(character_id = %id, health = health.value(), "Updated character health");
        Ok(())
    }

    async fn update_character_in_battle(
        &mut self,
        id: CharacterId,
        in_battle: bool,
    ) -> Result<(), RepoError> {
        let conn = self.conn("update_character_in_battle")?;
        let result = sqlx::query("UPDATE characters SET in_battle = ? WHERE id = ?")
            .bind(in_battle)
            .bind(id.to_string())
            .execute(conn)
            .await
            .map_err(|e| RepoError::database("update_character_in_battle", e))?;
        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Character", id));
        }
        tracing::debug!(character_id = %id, in_battle, "Updated character in-battle flag");
        Ok(())
    }

    async fn clear_character_inventory(
        &mut self,
        id: CharacterId,
    ) -> Result<Vec<ItemId>, RepoError> {
        let conn = self.conn("clear_character_inventory")?;

        let unequipped = sqlx::query(
            "UPDATE characters SET primary_item_id = NULL, secondary_item_id = NULL WHERE id = ?",
        )
        .bind(id.to_string())
        .execute(&mut *conn)
        .await
        .map_err(|e| RepoError::database("clear_character_inventory", e))?;
        if unequipped.rows_affected() == 0 {
            return Err(RepoError::not_found("Character", id));
        }

        let removed: Vec<String> = sqlx::query_scalar(
            "SELECT item_id FROM inventory_items WHERE character_id = ? ORDER BY seq",
        )
        .bind(id.to_string())
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| RepoError::database("clear_character_inventory", e))?;

        sqlx::query("DELETE FROM inventory_items WHERE character_id = ?")
            .bind(id.to_string())
            .execute(&mut *conn)
            .await
            .map_err(|e| RepoError::database("clear_character_inventory", e))?;

        tracing::debug!(character_id = %id, removed = removed.len(), "Cleared character inventory");
        removed.iter().map(|raw| parse_id(raw)).collect()
    }

    async fn get_battle(&mut self, id: BattleId) -> Result<Option<Battle>, RepoError> {
        let conn = self.conn("get_battle")?;
        fetch_battle(conn, id).await
    }

    async fn create_battle(&mut self, battle: &Battle) -> Result<BattleId, RepoError> {
        let conn = self.conn("create_battle")?;
        sqlx::query(
            r#"
            INSERT INTO battles (id, opponent1_id, opponent2_id, active, last_move_id, start_date, end_date)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(battle.id.to_string())
        .bind(battle.opponent1_id.to_string())
        .bind(battle.opponent2_id.to_string())
        .bind(battle.active)
        .bind(battle.last_move_id.map(|id| id.to_string()))
        .bind(battle.start_date)
        .bind(battle.end_date)
        .execute(conn)
        .await
        .map_err(|e| RepoError::database("create_battle", e))?;
        tracing::debug!(battle_id = %battle.id, "Created battle");
        Ok(battle.id)
    }

    async fn create_battle_move(
        &mut self,
        battle_move: &BattleMove,
    ) -> Result<BattleMoveId, RepoError> {
        let conn = self.conn("create_battle_move")?;
        sqlx::query(
            r#"
            INSERT INTO battle_moves (id, battle_id, opponent_id, move, create_date)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(battle_move.id.to_string())
        .bind(battle_move.battle_id.to_string())
        .bind(battle_move.opponent_id.to_string())
        .bind(battle_move.mv.as_str())
        .bind(battle_move.create_date)
        .execute(conn)
        .await
        .map_err(|e| RepoError::database("create_battle_move", e))?;
        tracing::debug!(
            battle_id = %battle_move.battle_id,
            move_id = %battle_move.id,
            mv = %battle_move.mv,
            "Created battle move"
        );
        Ok(battle_move.id)
    }

    async fn update_battle_last_move(
        &mut self,
        battle_id: BattleId,
        move_id: BattleMoveId,
    ) -> Result<(), RepoError> {
        let conn = self.conn("update_battle_last_move")?;
        let result = sqlx::query("UPDATE battles SET last_move_id = ? WHERE id = ?")
            .bind(move_id.to_string())
            .bind(battle_id.to_string())
            .execute(conn)
            .await
            .map_err(|e| RepoError::database("update_battle_last_move", e))?;
        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Battle", battle_id));
        }
        Ok(())
    }

    async fn update_battle_end(
        &mut self,
        battle_id: BattleId,
        ended_at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        let conn = self.conn("update_battle_end")?;
        let result =
            sqlx::query("UPDATE battles SET active = 0, end_date = ? WHERE id = ? AND active = 1")
                .bind(ended_at)
                .bind(battle_id.to_string())
                .execute(&mut *conn)
                .await
                .map_err(|e| RepoError::database("update_battle_end", e))?;
        if result.rows_affected() > 0 {
            tracing::debug!(battle_id = %battle_id, "Ended battle");
            return Ok(());
        }

        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM battles WHERE id = ?")
            .bind(battle_id.to_string())
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| RepoError::database("update_battle_end", e))?;
        match exists {
            Some(_) => Ok(()),
            None => Err(RepoError::not_found("Battle", battle_id)),
        }
    }

    async fn commit(&mut self) -> Result<(), RepoError> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| RepoError::database("commit", "unit of work already finished"))?;
        tx.commit()
            .await
            .map_err(|e| RepoError::database("commit", e))
    }

    async fn rollback(&mut self) -> Result<(), RepoError> {
        match self.tx.take() {
            Some(tx) => tx
                .rollback()
                .await
                .map_err(|e| RepoError::database("rollback", e)),
            None => Ok(()),
        }
    }
}
