//! In-memory battle and character store for development and testing.
//!
//! State lives behind a single async mutex. A unit of work holds that lock
//! for its whole lifetime and edits a private copy, which replaces the shared
//! state only on commit. Units are therefore serialized, and dropping one
//! discards its edits.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use dashmap::DashSet;
use tokio::sync::{Mutex, OwnedMutexGuard};

use arena_domain::{
    Battle, BattleId, BattleMove, BattleMoveId, CharacterId, CombatSnapshot, Health, Item, ItemId,
};

use crate::infrastructure::ports::{BattleRepo, BattleUnitOfWork, CharacterRepo, RepoError};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    characters: HashMap<CharacterId, CombatSnapshot>,
    inventories: HashMap<CharacterId, Vec<Item>>,
    /// Stored without `last_move`; it is attached on read.
    battles: HashMap<BattleId, Battle>,
    /// Every move of every battle, in creation order.
    moves: Vec<BattleMove>,
}

impl MemoryState {
    fn battle_with_tail(&self, battle: &Battle) -> Battle {
        let mut battle = battle.clone();
        battle.last_move = battle
            .last_move_id
            .and_then(|id| self.moves.iter().find(|m| m.id == id).cloned());
        battle
    }

    fn character_mut(&mut self, id: CharacterId) -> Result<&mut CombatSnapshot, RepoError> {
        self.characters
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("Character", id))
    }

    fn battle_mut(&mut self, id: BattleId) -> Result<&mut Battle, RepoError> {
        self.battles
            .get_mut(&id)
            .ok_or_else(|| RepoError::not_found("Battle", id))
    }
}

/// Shared in-memory store implementing both the battle and character ports.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
    #[cfg(test)]
    failures: Arc<DashSet<&'static str>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future call of the named unit-of-work operation fail with
    /// a database error.
    #[cfg(test)]
    pub fn fail_on(&self, operation: &'static str) {
        self.failures.insert(operation);
    }

    #[cfg(test)]
    pub fn clear_failures(&self) {
        self.failures.clear();
    }
}

#[async_trait]
impl CharacterRepo for InMemoryStore {
    async fn get(&self, id: CharacterId) -> Result<Option<CombatSnapshot>, RepoError> {
        Ok(self.state.lock().await.characters.get(&id).cloned())
    }

    async fn save(&self, character: &CombatSnapshot, inventory: &[Item]) -> Result<(), RepoError> {
        let mut state = self.state.lock().await;
        if state
            .characters
            .get(&character.id)
            .is_some_and(|existing| existing.in_battle)
        {
            return Err(RepoError::in_use("Character", character.id));
        }
        state
            .characters
            .insert(character.id, character.clone().with_in_battle(false));
        state.inventories.insert(character.id, inventory.to_vec());
        tracing::debug!(character_id = %character.id, items = inventory.len(), "Saved character");
        Ok(())
    }

    async fn get_inventory(&self, id: CharacterId) -> Result<Vec<Item>, RepoError> {
        Ok(self
            .state
            .lock()
            .await
            .inventories
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl BattleRepo for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn BattleUnitOfWork>, RepoError> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryUnitOfWork {
            guard: Some(guard),
            working,
            #[cfg(test)]
            failures: self.failures.clone(),
        }))
    }

    async fn list_battles(&self) -> Result<Vec<Battle>, RepoError> {
        let state = self.state.lock().await;
        let mut battles: Vec<Battle> = state
            .battles
            .values()
            .map(|b| state.battle_with_tail(b))
            .collect();
        battles.sort_by_key(|b| b.start_date);
        Ok(battles)
    }

    async fn get_battle(&self, id: BattleId) -> Result<Option<Battle>, RepoError> {
        let state = self.state.lock().await;
        Ok(state.battles.get(&id).map(|b| state.battle_with_tail(b)))
    }

    async fn get_battle_move(&self, id: BattleMoveId) -> Result<Option<BattleMove>, RepoError> {
        let state = self.state.lock().await;
        Ok(state.moves.iter().find(|m| m.id == id).cloned())
    }

    async fn list_moves(&self, battle_id: BattleId) -> Result<Vec<BattleMove>, RepoError> {
        let state = self.state.lock().await;
        Ok(state
            .moves
            .iter()
            .filter(|m| m.battle_id == battle_id)
            .cloned()
            .collect())
    }

    async fn list_active_battles_for(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<Battle>, RepoError> {
        let state = self.state.lock().await;
        let mut battles: Vec<Battle> = state
            .battles
            .values()
            .filter(|b| b.active && b.is_participant(character_id))
            .map(|b| state.battle_with_tail(b))
            .collect();
        battles.sort_by_key(|b| b.start_date);
        Ok(battles)
    }
}

/// Unit of work over the in-memory store. Holds the store lock until it is
/// committed, rolled back, or dropped.
struct MemoryUnitOfWork {
    guard: Option<OwnedMutexGuard<MemoryState>>,
    working: MemoryState,
    #[cfg(test)]
    failures: Arc<DashSet<&'static str>>,
}

impl MemoryUnitOfWork {
    /// Fail if the unit already finished or `operation` has an injected failure.
    fn check(&self, operation: &'static str) -> Result<(), RepoError> {
        if self.guard.is_none() {
            return Err(RepoError::database(operation, "unit of work already finished"));
        }
        self.injected(operation)
    }

    #[cfg(test)]
    fn injected(&self, operation: &'static str) -> Result<(), RepoError> {
        if self.failures.contains(operation) {
            return Err(RepoError::database(operation, "injected failure"));
        }
        Ok(())
    }

    #[cfg(not(test))]
    fn injected(&self, _operation: &'static str) -> Result<(), RepoError> {
        Ok(())
    }
}

#[async_trait]
impl BattleUnitOfWork for MemoryUnitOfWork {
    async fn get_character(
        &mut self,
        id: CharacterId,
    ) -> Result<Option<CombatSnapshot>, RepoError> {
        self.check("get_character")?;
        Ok(self.working.characters.get(&id).cloned())
    }

    async fn update_character_health(
        &mut self,
        id: CharacterId,
        health: Health,
    ) -> Result<(), RepoError> {
        self.check("update_character_health")?;
        self.working.character_mut(id)?.health = health;
        Ok(())
    }

    async fn update_character_in_battle(
        &mut self,
        id: CharacterId,
        in_battle: bool,
    ) -> Result<(), RepoError> {
        self.check("update_character_in_battle")?;
        self.working.character_mut(id)?.in_battle = in_battle;
        Ok(())
    }

    async fn clear_character_inventory(
        &mut self,
        id: CharacterId,
    ) -> Result<Vec<ItemId>, RepoError> {
        self.check("clear_character_inventory")?;
        let character = self.working.character_mut(id)?;
        character.primary_item = None;
        character.secondary_item = None;
        let removed = self.working.inventories.remove(&id).unwrap_or_default();
        Ok(removed.into_iter().map(|item| item.id).collect())
    }

    async fn get_battle(&mut self, id: BattleId) -> Result<Option<Battle>, RepoError> {
        self.check("get_battle")?;
        Ok(self
            .working
            .battles
            .get(&id)
            .map(|b| self.working.battle_with_tail(b)))
    }

    async fn create_battle(&mut self, battle: &Battle) -> Result<BattleId, RepoError> {
        self.check("create_battle")?;
        if self.working.battles.contains_key(&battle.id) {
            return Err(RepoError::constraint(format!(
                "Battle {} already exists",
                battle.id
            )));
        }
        let mut stored = battle.clone();
        stored.last_move = None;
        self.working.battles.insert(stored.id, stored);
        Ok(battle.id)
    }

    async fn create_battle_move(
        &mut self,
        battle_move: &BattleMove,
    ) -> Result<BattleMoveId, RepoError> {
        self.check("create_battle_move")?;
        if !self.working.battles.contains_key(&battle_move.battle_id) {
            return Err(RepoError::not_found("Battle", battle_move.battle_id));
        }
        self.working.moves.push(battle_move.clone());
        Ok(battle_move.id)
    }

    async fn update_battle_last_move(
        &mut self,
        battle_id: BattleId,
        move_id: BattleMoveId,
    ) -> Result<(), RepoError> {
        self.check("update_battle_last_move")?;
        self.working.battle_mut(battle_id)?.last_move_id = Some(move_id);
        Ok(())
    }

    async fn update_battle_end(
        &mut self,
        battle_id: BattleId,
        ended_at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        self.check("update_battle_end")?;
        self.working.battle_mut(battle_id)?.end(ended_at);
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), RepoError> {
        self.check("commit")?;
        if let Some(mut guard) = self.guard.take() {
            *guard = std::mem::take(&mut self.working);
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), RepoError> {
        self.guard = None;
        self.working = MemoryState::default();
        Ok(())
    }
}
