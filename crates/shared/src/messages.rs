//! Messages pushed from the engine to observers over WebSocket.
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Renaming variants is a breaking change
//! - Unknown variants deserialize to `Unknown`

use serde::{Deserialize, Serialize};

use crate::battle::{BattleData, BattleMoveResultData};

/// Messages from server (engine) to observers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// A battle was created and both characters are now engaged
    BattleStarted(BattleData),

    /// A move was committed
    BattleMoveResult(BattleMoveResultData),

    /// Unknown message type for forward compatibility
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::BattleMoveData;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    #[test]
    fn test_move_result_message_is_tagged_and_flat() {
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let msg = ServerMessage::BattleMoveResult(BattleMoveResultData {
            battle_is_over: false,
            battle_move: BattleMoveData {
                id: Uuid::new_v4(),
                battle_id: Uuid::new_v4(),
                opponent_id: Uuid::new_v4(),
                move_name: "Accept".to_string(),
                create_date: at,
            },
            damage: 0,
            plunder: Vec::new(),
        });

        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "BattleMoveResult");
        assert_eq!(json["battleIsOver"], false);
        assert_eq!(json["battleMove"]["move"], "Accept");
    }

    #[test]
    fn test_unknown_message_type_deserializes() {
        let msg: ServerMessage = serde_json::from_str(r#"{"type":"SomethingNew"}"#).unwrap();
        assert!(matches!(msg, ServerMessage::Unknown));
    }
}
