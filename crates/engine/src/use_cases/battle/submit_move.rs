//! Submit move use case.
//!
//! Validates a move against the battle's last move, resolves it, and persists
//! the move together with every effect in one unit of work.

use std::sync::Arc;

use arena_domain::combat::{validate_move, CombatEffect};
use arena_domain::{BattleId, BattleMove, CharacterId, Move};
use arena_shared::ServerMessage;

use crate::infrastructure::ports::{BattleRepo, BattleUnitOfWork, ClockPort, NotificationPort};

use super::error::BattleError;
use super::locks::BattleLocks;
use super::resolver::CombatResolver;
use super::settle;
use super::types::BattleMoveResult;

/// Submit move use case.
///
/// Orchestrates: move parsing, turn and legality checks, combat resolution,
/// atomic persistence, observer notification.
pub struct SubmitMove {
    battle_repo: Arc<dyn BattleRepo>,
    clock: Arc<dyn ClockPort>,
    resolver: Arc<CombatResolver>,
    notifier: Arc<dyn NotificationPort>,
    locks: Arc<BattleLocks>,
}

impl SubmitMove {
    pub fn new(
        battle_repo: Arc<dyn BattleRepo>,
        clock: Arc<dyn ClockPort>,
        resolver: Arc<CombatResolver>,
        notifier: Arc<dyn NotificationPort>,
        locks: Arc<BattleLocks>,
    ) -> Self {
        Self {
            battle_repo,
            clock,
            resolver,
            notifier,
            locks,
        }
    }

    /// Submit `move_name` for `character_id` in `battle_id`.
    ///
    /// # Returns
    /// * `Ok(BattleMoveResult)` - The move and all of its effects were committed
    /// * `Err(BattleError)` - Nothing was written
    pub async fn execute(
        &self,
        battle_id: BattleId,
        character_id: CharacterId,
        move_name: &str,
    ) -> Result<BattleMoveResult, BattleError> {
        let mv: Move = move_name.parse().map_err(|e| {
            tracing::warn!(battle_id = %battle_id, character_id = %character_id, move_name, "Unknown move");
            BattleError::from(e)
        })?;

        let guard = self.locks.acquire(battle_id).await;
        let mut uow = self.battle_repo.begin().await?;
        let outcome = self.apply(uow.as_mut(), battle_id, character_id, mv).await;
        let result = settle(uow, outcome).await;
        drop(guard);
        // Kept only while another move on this battle is waiting for it.
        self.locks.release(battle_id);
        let result = result?;

        tracing::info!(
            battle_id = %battle_id,
            character_id = %character_id,
            mv = %mv,
            damage = result.damage,
            battle_over = result.battle_is_over,
            "Move applied"
        );

        if result.battle_is_over {
            tracing::info!(battle_id = %battle_id, plunder = result.plunder.len(), "Battle concluded");
        }

        let message = ServerMessage::BattleMoveResult(result.to_protocol());
        if let Err(e) = self.notifier.publish(message).await {
            tracing::warn!(battle_id = %battle_id, error = %e, "Failed to publish move result");
        }

        Ok(result)
    }

    async fn apply(
        &self,
        uow: &mut dyn BattleUnitOfWork,
        battle_id: BattleId,
        character_id: CharacterId,
        mv: Move,
    ) -> Result<BattleMoveResult, BattleError> {
        let mut battle = uow
            .get_battle(battle_id)
            .await?
            .ok_or(BattleError::BattleNotFound(battle_id))?;
        let other_id = battle
            .opponent_of(character_id)
            .ok_or(BattleError::NotParticipant {
                battle_id,
                character_id,
            })?;

        let last = battle.last_move.as_ref();
        validate_move(
            last.map(|m| m.mv),
            mv,
            character_id,
            last.map(|m| m.opponent_id),
        )
        .map_err(|rejection| {
            tracing::warn!(
                battle_id = %battle_id,
                character_id = %character_id,
                mv = %mv,
                reason = %rejection,
                "Rejected move"
            );
            BattleError::from(rejection)
        })?;

        // A lethal attack ends the battle without a terminal move.
        if !battle.active {
            return Err(BattleError::BattleOver(battle_id));
        }

        let submitter = uow
            .get_character(character_id)
            .await?
            .ok_or(BattleError::CharacterNotFound(character_id))?;
        let other = uow
            .get_character(other_id)
            .await?
            .ok_or(BattleError::CharacterNotFound(other_id))?;

        let resolution = self.resolver.resolve(mv, &submitter, &other);

        let now = self.clock.now();
        let battle_move = BattleMove::new(battle_id, character_id, mv, now);
        uow.create_battle_move(&battle_move).await?;
        uow.update_battle_last_move(battle_id, battle_move.id).await?;
        battle.record_move(battle_move.clone());

        let mut plunder = Vec::new();
        for effect in &resolution.effects {
            match *effect {
                CombatEffect::SetHealth {
                    character_id,
                    health,
                } => uow.update_character_health(character_id, health).await?,
                CombatEffect::ClearInventory { character_id } => {
                    plunder.extend(uow.clear_character_inventory(character_id).await?);
                }
                CombatEffect::EndBattle => {
                    uow.update_battle_end(battle_id, now).await?;
                    uow.update_character_in_battle(battle.opponent1_id, false)
                        .await?;
                    uow.update_character_in_battle(battle.opponent2_id, false)
                        .await?;
                }
            }
        }

        Ok(BattleMoveResult {
            battle_is_over: resolution.battle_over,
            battle_move,
            damage: resolution.damage,
            plunder,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{CharacterRepo, RepoError};
    use crate::use_cases::battle::fixtures::{seed, seed_with, Arena};
    use arena_domain::{
        CharacterName, CombatSnapshot, Health, Item, ItemCategory, ItemId, Level, RaceSkill,
    };

    async fn started(arena: &Arena) -> (BattleId, CharacterId, CharacterId) {
        let a = seed(&arena.store, "Brakka").await;
        let b = seed(&arena.store, "Lio").await;
        let battle = arena.start.execute(a, b).await.unwrap();
        (battle.id, a, b)
    }

    fn item(category: ItemCategory, value: i32) -> Item {
        Item {
            id: ItemId::new(),
            category,
            value,
        }
    }

    #[tokio::test]
    async fn when_accepting_challenge_records_move() {
        let arena = Arena::new();
        let (battle_id, a, b) = started(&arena).await;

        let result = arena.submit.execute(battle_id, b, "Accept").await.unwrap();

        assert!(!result.battle_is_over);
        assert_eq!(result.damage, 0);
        assert!(result.plunder.is_empty());
        assert_eq!(result.battle_move.mv, Move::Accept);
        assert_eq!(result.battle_move.opponent_id, b);

        let battle = arena.store.get_battle(battle_id).await.unwrap().unwrap();
        assert_eq!(battle.last_move_id, Some(result.battle_move.id));
        assert_eq!(arena.store.list_moves(battle_id).await.unwrap().len(), 2);
        assert_eq!(arena.store.get(a).await.unwrap().unwrap().health, Health::FULL);
    }

    #[tokio::test]
    async fn when_move_not_legal_returns_error_and_writes_nothing() {
        let arena = Arena::new();
        let (battle_id, _, b) = started(&arena).await;

        let err = arena.submit.execute(battle_id, b, "Attack").await.unwrap_err();

        assert_eq!(err.to_string(), "Invalid Move - You can only Accept or Retreat");
        assert!(err.is_client_error());
        assert_eq!(arena.store.list_moves(battle_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn when_same_character_moves_twice_returns_not_your_turn() {
        let arena = Arena::new();
        let (battle_id, a, _) = started(&arena).await;

        let err = arena.submit.execute(battle_id, a, "Accept").await.unwrap_err();

        assert!(matches!(err, BattleError::NotYourTurn));
        assert_eq!(err.to_string(), "It's not your turn");
    }

    #[tokio::test]
    async fn when_move_name_unknown_lists_valid_moves() {
        let arena = Arena::new();
        let (battle_id, _, b) = started(&arena).await;

        let err = arena.submit.execute(battle_id, b, "Dance").await.unwrap_err();

        assert!(matches!(err, BattleError::UnknownMove { ref name, .. } if name == "Dance"));
        assert_eq!(arena.store.list_moves(battle_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn when_move_name_has_odd_case_it_is_accepted() {
        let arena = Arena::new();
        let (battle_id, _, b) = started(&arena).await;

        let result = arena.submit.execute(battle_id, b, " accept ").await.unwrap();

        assert_eq!(result.battle_move.mv, Move::Accept);
    }

    #[tokio::test]
    async fn when_battle_missing_returns_not_found() {
        let arena = Arena::new();
        let a = seed(&arena.store, "Brakka").await;
        let ghost = BattleId::new();

        let err = arena.submit.execute(ghost, a, "Accept").await.unwrap_err();

        assert!(matches!(err, BattleError::BattleNotFound(id) if id == ghost));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn when_outsider_submits_returns_not_participant() {
        let arena = Arena::new();
        let (battle_id, _, _) = started(&arena).await;
        let outsider = seed(&arena.store, "Ysolde").await;

        let err = arena.submit.execute(battle_id, outsider, "Accept").await.unwrap_err();

        assert!(matches!(err, BattleError::NotParticipant { .. }));
    }

    #[tokio::test]
    async fn when_attack_is_not_lethal_reduces_defender_health() {
        let arena = Arena::with_rolls([1]);
        let a = seed_with(
            &arena.store,
            CombatSnapshot::new(CharacterId::new(), CharacterName::new("Brakka").unwrap())
                .with_level(Level::new(4).unwrap())
                .with_race_skill(RaceSkill::Strength),
            Vec::new(),
        )
        .await;
        let b = seed(&arena.store, "Lio").await;
        let battle_id = arena.start.execute(a, b).await.unwrap().id;
        arena.submit.execute(battle_id, b, "Accept").await.unwrap();

        let result = arena.submit.execute(battle_id, a, "Attack").await.unwrap();

        // (4 + 10) * 1 - 1 * 1
        assert_eq!(result.damage, 13);
        assert!(!result.battle_is_over);
        assert_eq!(
            arena.store.get(b).await.unwrap().unwrap().health,
            Health::new(87).unwrap()
        );
        assert!(arena.store.get_battle(battle_id).await.unwrap().unwrap().active);
    }

    #[tokio::test]
    async fn when_attack_deals_no_damage_nothing_changes_but_the_log() {
        let arena = Arena::with_rolls([1, 6]);
        let (battle_id, a, b) = started(&arena).await;
        arena.submit.execute(battle_id, b, "Accept").await.unwrap();

        let result = arena.submit.execute(battle_id, a, "Attack").await.unwrap();

        assert_eq!(result.damage, 1 - 6);
        assert_eq!(arena.store.get(b).await.unwrap().unwrap().health, Health::FULL);
        assert_eq!(arena.store.list_moves(battle_id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn when_attack_is_lethal_ends_battle_and_plunders() {
        let arena = Arena::with_rolls([6, 1]);
        let a = seed_with(
            &arena.store,
            CombatSnapshot::new(CharacterId::new(), CharacterName::new("Brakka").unwrap())
                .with_level(Level::new(10).unwrap())
                .with_race_skill(RaceSkill::Strength),
            Vec::new(),
        )
        .await;
        let sword = item(ItemCategory::Offense, 3);
        let potion = item(ItemCategory::Healing, 5);
        let b = seed_with(
            &arena.store,
            CombatSnapshot::new(CharacterId::new(), CharacterName::new("Lio").unwrap())
                .with_health(Health::new(40).unwrap())
                .with_primary_item(Some(sword)),
            vec![sword, potion],
        )
        .await;
        let battle_id = arena.start.execute(a, b).await.unwrap().id;
        arena.submit.execute(battle_id, b, "Accept").await.unwrap();

        let result = arena.submit.execute(battle_id, a, "Attack").await.unwrap();

        assert_eq!(result.damage, 20 * 6 - 1);
        assert!(result.battle_is_over);
        assert_eq!(result.plunder, vec![sword.id, potion.id]);

        let loser = arena.store.get(b).await.unwrap().unwrap();
        assert_eq!(loser.health, Health::DEFEATED);
        assert!(loser.primary_item.is_none());
        assert!(!loser.in_battle);
        assert!(arena.store.get_inventory(b).await.unwrap().is_empty());
        assert!(!arena.store.get(a).await.unwrap().unwrap().in_battle);

        let battle = arena.store.get_battle(battle_id).await.unwrap().unwrap();
        assert!(!battle.active);
        assert_eq!(battle.end_date, Some(arena.now));
    }

    #[tokio::test]
    async fn when_battle_ended_by_defeat_further_moves_are_rejected() {
        let arena = Arena::with_rolls([6, 1]);
        let a = seed_with(
            &arena.store,
            CombatSnapshot::new(CharacterId::new(), CharacterName::new("Brakka").unwrap())
                .with_level(Level::new(10).unwrap())
                .with_race_skill(RaceSkill::Strength),
            Vec::new(),
        )
        .await;
        let b = seed(&arena.store, "Lio").await;
        let battle_id = arena.start.execute(a, b).await.unwrap().id;
        arena.submit.execute(battle_id, b, "Accept").await.unwrap();
        arena.submit.execute(battle_id, a, "Attack").await.unwrap();

        let err = arena.submit.execute(battle_id, b, "Attack").await.unwrap_err();

        assert!(matches!(err, BattleError::BattleOver(id) if id == battle_id));
        assert_eq!(arena.store.list_moves(battle_id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn when_surrendering_other_side_yields() {
        let arena = Arena::new();
        let (battle_id, a, b) = started(&arena).await;
        arena.submit.execute(battle_id, b, "Accept").await.unwrap();

        let result = arena.submit.execute(battle_id, a, "Surrender").await.unwrap();

        assert!(result.battle_is_over);
        assert_eq!(result.damage, 0);
        assert_eq!(arena.store.get(b).await.unwrap().unwrap().health, Health::new(50).unwrap());
        assert_eq!(arena.store.get(a).await.unwrap().unwrap().health, Health::FULL);
        assert!(!arena.store.get_battle(battle_id).await.unwrap().unwrap().active);

        let err = arena.submit.execute(battle_id, b, "Attack").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid Move - The battle already ended with Surrender");
    }

    #[tokio::test]
    async fn when_retreating_and_pursuing_battle_stays_open() {
        let arena = Arena::new();
        let (battle_id, a, b) = started(&arena).await;

        for (who, mv) in [
            (b, "Accept"),
            (a, "Attack"),
            (b, "Retreat"),
            (a, "Pursue"),
            (b, "Retreat"),
            (a, "Pursue"),
            (b, "Attack"),
        ] {
            let result = arena.submit.execute(battle_id, who, mv).await.unwrap();

            assert!(!result.battle_is_over, "{mv} ended the battle");
            let battle = arena.store.get_battle(battle_id).await.unwrap().unwrap();
            assert!(battle.active);
            assert!(battle.end_date.is_none());
            for id in [a, b] {
                assert!(arena.store.get(id).await.unwrap().unwrap().in_battle);
            }
        }

        arena.submit.execute(battle_id, a, "Retreat").await.unwrap();
        let result = arena.submit.execute(battle_id, b, "Quit").await.unwrap();

        assert!(result.battle_is_over);
        assert_eq!(arena.store.list_moves(battle_id).await.unwrap().len(), 10);
        assert!(!arena.store.get_battle(battle_id).await.unwrap().unwrap().active);
    }

    #[tokio::test]
    async fn when_quitting_after_retreat_only_ends_battle() {
        let arena = Arena::new();
        let (battle_id, a, b) = started(&arena).await;
        arena.submit.execute(battle_id, b, "Retreat").await.unwrap();

        let result = arena.submit.execute(battle_id, a, "Quit").await.unwrap();

        assert!(result.battle_is_over);
        assert!(result.plunder.is_empty());
        for id in [a, b] {
            let character = arena.store.get(id).await.unwrap().unwrap();
            assert_eq!(character.health, Health::FULL);
            assert!(!character.in_battle);
        }
        assert!(arena.submit.locks.is_empty());
    }

    #[tokio::test]
    async fn when_moves_fail_no_lock_is_left_behind() {
        let arena = Arena::new();
        let (battle_id, a, b) = started(&arena).await;

        for _ in 0..50 {
            let _ = arena.submit.execute(BattleId::new(), a, "Accept").await;
        }
        let _ = arena.submit.execute(battle_id, a, "Accept").await;
        arena.submit.execute(battle_id, b, "Accept").await.unwrap();

        assert!(arena.submit.locks.is_empty());
    }

    #[tokio::test]
    async fn when_store_fails_after_move_written_everything_rolls_back() {
        let arena = Arena::new();
        let (battle_id, a, b) = started(&arena).await;
        arena.submit.execute(battle_id, b, "Accept").await.unwrap();
        arena.store.fail_on("update_battle_end");

        let err = arena.submit.execute(battle_id, a, "Surrender").await.unwrap_err();

        assert!(matches!(err, BattleError::Repo(RepoError::Database { .. })));
        let battle = arena.store.get_battle(battle_id).await.unwrap().unwrap();
        assert!(battle.active);
        assert_eq!(battle.last_move.map(|m| m.mv), Some(Move::Accept));
        assert_eq!(arena.store.list_moves(battle_id).await.unwrap().len(), 2);
        assert_eq!(arena.store.get(b).await.unwrap().unwrap().health, Health::FULL);
        // Only the start and the accept were announced.
        assert_eq!(arena.published().len(), 2);
    }

    #[tokio::test]
    async fn when_commit_fails_nothing_is_written() {
        let arena = Arena::new();
        let (battle_id, _, b) = started(&arena).await;
        arena.store.fail_on("commit");

        let err = arena.submit.execute(battle_id, b, "Accept").await.unwrap_err();

        assert!(matches!(err, BattleError::Repo(_)));
        arena.store.clear_failures();
        assert_eq!(arena.store.list_moves(battle_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn when_two_moves_race_only_one_wins() {
        let arena = Arena::new();
        let (battle_id, _, b) = started(&arena).await;
        let submit = arena.submit.clone();

        let (first, second) = tokio::join!(
            submit.execute(battle_id, b, "Accept"),
            submit.execute(battle_id, b, "Retreat"),
        );

        assert_eq!(first.is_ok() as u8 + second.is_ok() as u8, 1);
        assert_eq!(arena.store.list_moves(battle_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn when_move_commits_observers_receive_result() {
        let arena = Arena::new();
        let (battle_id, _, b) = started(&arena).await;

        arena.submit.execute(battle_id, b, "Accept").await.unwrap();

        let published = arena.published();
        assert_eq!(published.len(), 2);
        let ServerMessage::BattleMoveResult(data) = &published[1] else {
            panic!("expected a move result");
        };
        assert_eq!(data.battle_move.battle_id, battle_id.to_uuid());
        assert_eq!(data.battle_move.move_name, "Accept");
    }
}
