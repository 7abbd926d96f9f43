//! Battle records and move results as they appear on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A battle record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleData {
    pub id: Uuid,
    pub opponent1_id: Uuid,
    pub opponent2_id: Uuid,
    pub active: bool,
    pub last_move_id: Option<Uuid>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

/// One entry of a battle's move log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleMoveData {
    pub id: Uuid,
    pub battle_id: Uuid,
    /// Character who submitted the move
    pub opponent_id: Uuid,
    /// Move name, e.g. "Attack"
    #[serde(rename = "move")]
    pub move_name: String,
    pub create_date: DateTime<Utc>,
}

/// Outcome of a submitted move.
///
/// This is also the payload pushed to observers after the move commits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleMoveResultData {
    pub battle_is_over: bool,
    pub battle_move: BattleMoveData,
    /// Offense minus defense for an attack. Negative values are reported as-is.
    pub damage: i32,
    /// Item ids stripped from the losing character, in inventory order
    #[serde(default)]
    pub plunder: Vec<Uuid>,
}

/// Query string for `POST /api/battles`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartBattleQuery {
    pub character1_id: Uuid,
    pub character2_id: Uuid,
}

/// Query string for `POST /api/battles/{id}/move`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitMoveQuery {
    pub character_id: Uuid,
    /// Move name, matched case-insensitively
    #[serde(rename = "move")]
    pub move_name: String,
}
