//! Start battle use case.
//!
//! Opens a battle between two idle characters and records the opening
//! `Initiate` on behalf of the first one.

use std::sync::Arc;

use arena_domain::{Battle, BattleMove, CharacterId, Move};
use arena_shared::ServerMessage;

use crate::infrastructure::ports::{BattleRepo, BattleUnitOfWork, ClockPort, NotificationPort};

use super::error::BattleError;
use super::settle;
use super::types::battle_to_protocol;

pub struct StartBattle {
    battle_repo: Arc<dyn BattleRepo>,
    clock: Arc<dyn ClockPort>,
    notifier: Arc<dyn NotificationPort>,
}

impl StartBattle {
    pub fn new(
        battle_repo: Arc<dyn BattleRepo>,
        clock: Arc<dyn ClockPort>,
        notifier: Arc<dyn NotificationPort>,
    ) -> Self {
        Self {
            battle_repo,
            clock,
            notifier,
        }
    }

    /// Start a battle challenged by `character1_id` against `character2_id`.
    ///
    /// # Returns
    /// * `Ok(Battle)` - The committed battle with its opening move as `last_move`
    /// * `Err(BattleError)` - Nothing was written
    pub async fn execute(
        &self,
        character1_id: CharacterId,
        character2_id: CharacterId,
    ) -> Result<Battle, BattleError> {
        if character1_id == character2_id {
            return Err(BattleError::SameCombatant);
        }

        let mut uow = self.battle_repo.begin().await?;
        let outcome = self
            .open(uow.as_mut(), character1_id, character2_id)
            .await;
        let battle = settle(uow, outcome).await?;

        tracing::info!(
            battle_id = %battle.id,
            opponent1_id = %battle.opponent1_id,
            opponent2_id = %battle.opponent2_id,
            "Battle started"
        );

        let message = ServerMessage::BattleStarted(battle_to_protocol(&battle));
        if let Err(e) = self.notifier.publish(message).await {
            tracing::warn!(battle_id = %battle.id, error = %e, "Failed to publish battle start");
        }

        Ok(battle)
    }

    async fn open(
        &self,
        uow: &mut dyn BattleUnitOfWork,
        character1_id: CharacterId,
        character2_id: CharacterId,
    ) -> Result<Battle, BattleError> {
        for id in [character1_id, character2_id] {
            let character = uow
                .get_character(id)
                .await?
                .ok_or(BattleError::CharacterNotFound(id))?;
            if character.in_battle {
                tracing::warn!(character_id = %id, "Rejected battle: character already in battle");
                return Err(BattleError::AlreadyInBattle(id));
            }
        }

        let now = self.clock.now();
        let mut battle = Battle::new(character1_id, character2_id, now)
            .map_err(|_| BattleError::SameCombatant)?;
        let opening = BattleMove::new(battle.id, character1_id, Move::Initiate, now);

        uow.create_battle(&battle).await?;
        uow.create_battle_move(&opening).await?;
        uow.update_battle_last_move(battle.id, opening.id).await?;
        battle.record_move(opening);

        uow.update_character_in_battle(character1_id, true).await?;
        uow.update_character_in_battle(character2_id, true).await?;

        Ok(battle)
    }
}
