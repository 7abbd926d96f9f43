//! Read-only battle queries.

use std::sync::Arc;

use arena_domain::{Battle, BattleId, BattleMove, BattleMoveId, CharacterId};

use crate::infrastructure::ports::{BattleRepo, CharacterRepo};

use super::error::BattleError;

/// Lookups over committed battles and move logs.
pub struct BattleQueries {
    battle_repo: Arc<dyn BattleRepo>,
    character_repo: Arc<dyn CharacterRepo>,
}

impl BattleQueries {
    pub fn new(battle_repo: Arc<dyn BattleRepo>, character_repo: Arc<dyn CharacterRepo>) -> Self {
        Self {
            battle_repo,
            character_repo,
        }
    }

    pub async fn list_battles(&self) -> Result<Vec<Battle>, BattleError> {
        Ok(self.battle_repo.list_battles().await?)
    }

    pub async fn get_battle(&self, id: BattleId) -> Result<Battle, BattleError> {
        self.battle_repo
            .get_battle(id)
            .await?
            .ok_or(BattleError::BattleNotFound(id))
    }

    pub async fn get_battle_move(&self, id: BattleMoveId) -> Result<BattleMove, BattleError> {
        self.battle_repo
            .get_battle_move(id)
            .await?
            .ok_or(BattleError::MoveNotFound(id))
    }

    /// The move log of a battle, oldest first.
    pub async fn list_moves(&self, battle_id: BattleId) -> Result<Vec<BattleMove>, BattleError> {
        self.get_battle(battle_id).await?;
        Ok(self.battle_repo.list_moves(battle_id).await?)
    }

    /// Active battles the character takes part in.
    pub async fn character_battles(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<Battle>, BattleError> {
        if self.character_repo.get(character_id).await?.is_none() {
            return Err(BattleError::CharacterNotFound(character_id));
        }
        Ok(self
            .battle_repo
            .list_active_battles_for(character_id)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockBattleRepo, MockCharacterRepo, RepoError};
    use crate::use_cases::battle::fixtures::{seed, Arena};

    #[tokio::test]
    async fn when_battle_missing_returns_not_found() {
        let mut battles = MockBattleRepo::new();
        battles.expect_get_battle().returning(|_| Ok(None));
        let queries = BattleQueries::new(Arc::new(battles), Arc::new(MockCharacterRepo::new()));
        let id = BattleId::new();

        let err = queries.get_battle(id).await.unwrap_err();

        assert!(matches!(err, BattleError::BattleNotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn when_repo_fails_returns_repo_error() {
        let mut battles = MockBattleRepo::new();
        battles
            .expect_list_battles()
            .returning(|| Err(RepoError::database("list_battles", "disk full")));
        let queries = BattleQueries::new(Arc::new(battles), Arc::new(MockCharacterRepo::new()));

        let err = queries.list_battles().await.unwrap_err();

        assert!(matches!(err, BattleError::Repo(_)));
    }

    #[tokio::test]
    async fn when_listing_moves_of_unknown_battle_does_not_query_log() {
        let mut battles = MockBattleRepo::new();
        battles.expect_get_battle().returning(|_| Ok(None));
        battles.expect_list_moves().never();
        let queries = BattleQueries::new(Arc::new(battles), Arc::new(MockCharacterRepo::new()));

        assert!(queries.list_moves(BattleId::new()).await.is_err());
    }

    #[tokio::test]
    async fn when_character_missing_returns_not_found() {
        let mut characters = MockCharacterRepo::new();
        characters.expect_get().returning(|_| Ok(None));
        let mut battles = MockBattleRepo::new();
        battles.expect_list_active_battles_for().never();
        let queries = BattleQueries::new(Arc::new(battles), Arc::new(characters));

        let err = queries.character_battles(CharacterId::new()).await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn move_log_and_battles_follow_play() {
        let arena = Arena::new();
        let a = seed(&arena.store, "Brakka").await;
        let b = seed(&arena.store, "Lio").await;
        let c = seed(&arena.store, "Ysolde").await;
        let battle = arena.start.execute(a, b).await.unwrap();
        let accepted = arena.submit.execute(battle.id, b, "Accept").await.unwrap();

        let log = arena.queries.list_moves(battle.id).await.unwrap();
        let names: Vec<String> = log.iter().map(|m| m.mv.to_string()).collect();
        assert_eq!(names, ["Initiate", "Accept"]);

        let fetched = arena.queries.get_battle_move(accepted.battle_move.id).await.unwrap();
        assert_eq!(fetched, accepted.battle_move);

        assert_eq!(arena.queries.character_battles(a).await.unwrap().len(), 1);
        assert!(arena.queries.character_battles(c).await.unwrap().is_empty());

        arena.submit.execute(battle.id, a, "Surrender").await.unwrap();
        assert!(arena.queries.character_battles(a).await.unwrap().is_empty());
        assert_eq!(arena.queries.list_battles().await.unwrap().len(), 1);
    }
}
