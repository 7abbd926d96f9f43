//! Battle results and their wire representations.

use arena_domain::{Battle, BattleMove, ItemId};
use arena_shared::{BattleData, BattleMoveData, BattleMoveResultData};

/// Outcome of a committed move.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleMoveResult {
    pub battle_is_over: bool,
    pub battle_move: BattleMove,
    /// Offense minus defense for an attack, zero otherwise. May be negative.
    pub damage: i32,
    /// Items stripped from the losing side
    pub plunder: Vec<ItemId>,
}

impl BattleMoveResult {
    /// Convert to protocol type for wire transmission.
    pub fn to_protocol(&self) -> BattleMoveResultData {
        BattleMoveResultData {
            battle_is_over: self.battle_is_over,
            battle_move: battle_move_to_protocol(&self.battle_move),
            damage: self.damage,
            plunder: self.plunder.iter().map(|id| id.to_uuid()).collect(),
        }
    }
}

pub fn battle_to_protocol(battle: &Battle) -> BattleData {
    BattleData {
        id: battle.id.to_uuid(),
        opponent1_id: battle.opponent1_id.to_uuid(),
        opponent2_id: battle.opponent2_id.to_uuid(),
        active: battle.active,
        last_move_id: battle.last_move_id.map(|id| id.to_uuid()),
        start_date: battle.start_date,
        end_date: battle.end_date,
    }
}

pub fn battle_move_to_protocol(battle_move: &BattleMove) -> BattleMoveData {
    BattleMoveData {
        id: battle_move.id.to_uuid(),
        battle_id: battle_move.battle_id.to_uuid(),
        opponent_id: battle_move.opponent_id.to_uuid(),
        move_name: battle_move.mv.to_string(),
        create_date: battle_move.create_date,
    }
}
