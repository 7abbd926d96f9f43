//! Repository port traits for database access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use arena_domain::{
    Battle, BattleId, BattleMove, BattleMoveId, CharacterId, CombatSnapshot, Health, Item, ItemId,
};

use super::error::RepoError;

// =============================================================================
// Character Store
// =============================================================================

/// Read side of the character store plus the upsert used to seed combatants.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    async fn get(&self, id: CharacterId) -> Result<Option<CombatSnapshot>, RepoError>;

    /// Insert or replace a character and its whole inventory.
    ///
    /// Equipped items must appear in `inventory`. The in-battle flag is never
    /// written here: a new character starts out of battle, and a character
    /// that is fighting is left untouched with `RepoError::InUse`.
    async fn save(&self, character: &CombatSnapshot, inventory: &[Item]) -> Result<(), RepoError>;

    /// Carried items in the order they were acquired.
    async fn get_inventory(&self, id: CharacterId) -> Result<Vec<Item>, RepoError>;
}

// =============================================================================
// Battle Store
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BattleRepo: Send + Sync {
    /// Open a unit of work. All writes to battles and combatants go through one.
    async fn begin(&self) -> Result<Box<dyn BattleUnitOfWork>, RepoError>;

    async fn list_battles(&self) -> Result<Vec<Battle>, RepoError>;

    /// Load a battle with `last_move` populated.
    async fn get_battle(&self, id: BattleId) -> Result<Option<Battle>, RepoError>;

    async fn get_battle_move(&self, id: BattleMoveId) -> Result<Option<BattleMove>, RepoError>;

    /// The move log of a battle, oldest first.
    async fn list_moves(&self, battle_id: BattleId) -> Result<Vec<BattleMove>, RepoError>;

    async fn list_active_battles_for(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<Battle>, RepoError>;
}

/// One atomic batch of reads and writes across battles and characters.
///
/// Nothing is visible to other readers until `commit`. Dropping a unit that
/// was never committed discards every write made through it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BattleUnitOfWork: Send {
    async fn get_character(
        &mut self,
        id: CharacterId,
    ) -> Result<Option<CombatSnapshot>, RepoError>;

    async fn update_character_health(
        &mut self,
        id: CharacterId,
        health: Health,
    ) -> Result<(), RepoError>;

    async fn update_character_in_battle(
        &mut self,
        id: CharacterId,
        in_battle: bool,
    ) -> Result<(), RepoError>;

    /// Remove every carried item, unequipping both slots.
    ///
    /// Returns the removed item ids in acquisition order.
    async fn clear_character_inventory(&mut self, id: CharacterId)
        -> Result<Vec<ItemId>, RepoError>;

    /// Load a battle with `last_move` populated.
    async fn get_battle(&mut self, id: BattleId) -> Result<Option<Battle>, RepoError>;

    async fn create_battle(&mut self, battle: &Battle) -> Result<BattleId, RepoError>;

    async fn create_battle_move(&mut self, battle_move: &BattleMove)
        -> Result<BattleMoveId, RepoError>;

    async fn update_battle_last_move(
        &mut self,
        battle_id: BattleId,
        move_id: BattleMoveId,
    ) -> Result<(), RepoError>;

    /// Mark the battle inactive with `ended_at` as its end date.
    ///
    /// A battle that already ended keeps its original end date.
    async fn update_battle_end(
        &mut self,
        battle_id: BattleId,
        ended_at: DateTime<Utc>,
    ) -> Result<(), RepoError>;

    async fn commit(&mut self) -> Result<(), RepoError>;

    async fn rollback(&mut self) -> Result<(), RepoError>;
}
