//! Battle entity and its append-only move log.
//!
//! A battle keeps a denormalized pointer (`last_move_id`) to the tail of its
//! move log. Stores populate `last_move` when a battle is loaded so the rules
//! can be checked without reading the whole log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::moves::Move;
use crate::error::DomainError;
use crate::{BattleId, BattleMoveId, CharacterId};

/// Lifecycle stage of a battle, derived from its state and last move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattlePhase {
    /// Only the opening `Initiate` has been recorded
    Proposed,
    /// The challenge was answered and the battle is in progress
    Engaged,
    /// The battle is over (surrender, quit, or a defeat)
    Concluded,
}

/// A bounded contest between two characters.
///
/// # Invariants
///
/// - `opponent1_id != opponent2_id` (enforced by `Battle::new`)
/// - once `active` is false, `end_date` is set and never changes again
///   (enforced by `Battle::end`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battle {
    pub id: BattleId,
    pub opponent1_id: CharacterId,
    pub opponent2_id: CharacterId,
    pub active: bool,
    pub last_move_id: Option<BattleMoveId>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    /// Tail of the move log, populated on load.
    pub last_move: Option<BattleMove>,
}

impl Battle {
    /// Start a new, active battle between two distinct characters.
    pub fn new(
        opponent1_id: CharacterId,
        opponent2_id: CharacterId,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if opponent1_id == opponent2_id {
            return Err(DomainError::constraint(
                "A character cannot battle itself",
            ));
        }
        Ok(Self {
            id: BattleId::new(),
            opponent1_id,
            opponent2_id,
            active: true,
            last_move_id: None,
            start_date: now,
            end_date: None,
            last_move: None,
        })
    }

    pub fn is_participant(&self, character_id: CharacterId) -> bool {
        character_id == self.opponent1_id || character_id == self.opponent2_id
    }

    /// The participant facing `character_id`.
    ///
    /// Returns `None` when `character_id` is not part of this battle.
    pub fn opponent_of(&self, character_id: CharacterId) -> Option<CharacterId> {
        if character_id == self.opponent1_id {
            Some(self.opponent2_id)
        } else if character_id == self.opponent2_id {
            Some(self.opponent1_id)
        } else {
            None
        }
    }

    pub fn phase(&self) -> BattlePhase {
        if !self.active {
            return BattlePhase::Concluded;
        }
        match self.last_move.as_ref().map(|m| m.mv) {
            None | Some(Move::Initiate) => BattlePhase::Proposed,
            Some(mv) if mv.is_terminal() => BattlePhase::Concluded,
            Some(_) => BattlePhase::Engaged,
        }
    }

    /// Point the log tail at `battle_move`.
    pub fn record_move(&mut self, battle_move: BattleMove) {
        self.last_move_id = Some(battle_move.id);
        self.last_move = Some(battle_move);
    }

    /// Mark the battle as over.
    ///
    /// Returns `false` (and changes nothing) if it already ended.
    pub fn end(&mut self, now: DateTime<Utc>) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.end_date = Some(now);
        true
    }
}

/// One entry of a battle's move log. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleMove {
    pub id: BattleMoveId,
    pub battle_id: BattleId,
    /// The character who submitted the move
    pub opponent_id: CharacterId,
    #[serde(rename = "move")]
    pub mv: Move,
    pub create_date: DateTime<Utc>,
}

impl BattleMove {
    pub fn new(
        battle_id: BattleId,
        opponent_id: CharacterId,
        mv: Move,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: BattleMoveId::new(),
            battle_id,
            opponent_id,
            mv,
            create_date: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn battle() -> Battle {
        Battle::new(CharacterId::new(), CharacterId::new(), now()).unwrap()
    }

    #[test]
    fn test_cannot_battle_self() {
        let id = CharacterId::new();
        assert!(Battle::new(id, id, now()).is_err());
    }

    #[test]
    fn test_opponent_of() {
        let b = battle();
        assert_eq!(b.opponent_of(b.opponent1_id), Some(b.opponent2_id));
        assert_eq!(b.opponent_of(b.opponent2_id), Some(b.opponent1_id));
        assert_eq!(b.opponent_of(CharacterId::new()), None);
    }

    #[test]
    fn test_phase_follows_last_move() {
        let mut b = battle();
        assert_eq!(b.phase(), BattlePhase::Proposed);

        b.record_move(BattleMove::new(b.id, b.opponent1_id, Move::Initiate, now()));
        assert_eq!(b.phase(), BattlePhase::Proposed);

        b.record_move(BattleMove::new(b.id, b.opponent2_id, Move::Accept, now()));
        assert_eq!(b.phase(), BattlePhase::Engaged);

        b.record_move(BattleMove::new(b.id, b.opponent1_id, Move::Retreat, now()));
        assert_eq!(b.phase(), BattlePhase::Engaged);

        b.record_move(BattleMove::new(b.id, b.opponent2_id, Move::Quit, now()));
        assert_eq!(b.phase(), BattlePhase::Concluded);
    }

    #[test]
    fn test_record_move_updates_tail_pointer() {
        let mut b = battle();
        let mv = BattleMove::new(b.id, b.opponent1_id, Move::Initiate, now());
        let mv_id = mv.id;
        b.record_move(mv);
        assert_eq!(b.last_move_id, Some(mv_id));
        assert_eq!(b.last_move.as_ref().map(|m| m.id), Some(mv_id));
    }

    #[test]
    fn test_end_is_one_shot() {
        let mut b = battle();
        assert!(b.end(now()));
        assert!(!b.active);
        assert_eq!(b.end_date, Some(now()));

        assert!(!b.end(now() + Duration::hours(1)));
        assert_eq!(b.end_date, Some(now()));
        assert_eq!(b.phase(), BattlePhase::Concluded);
    }

    #[test]
    fn test_battle_move_serializes_move_field() {
        let b = battle();
        let mv = BattleMove::new(b.id, b.opponent1_id, Move::Attack, now());
        let json = serde_json::to_value(&mv).unwrap();
        assert_eq!(json["move"], "Attack");
    }
}
