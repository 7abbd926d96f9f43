//! Connection management for WebSocket observers.
//!
//! Tracks connected observers and which battle (if any) each one watches.
//! The manager is also the engine's notification sink.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use arena_domain::BattleId;
use arena_shared::ServerMessage;

use crate::infrastructure::ports::{NotificationError, NotificationPort};

/// Information about a connected observer.
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    /// Unique ID for this connection
    pub connection_id: Uuid,
    /// Only messages about this battle are delivered, when set
    pub battle_id: Option<BattleId>,
}

impl ConnectionInfo {
    fn wants(&self, message: &ServerMessage) -> bool {
        match (self.battle_id, message_battle(message)) {
            (None, _) => true,
            (Some(watched), Some(battle)) => watched == battle,
            (Some(_), None) => false,
        }
    }
}

/// Battle a message is about, if any.
fn message_battle(message: &ServerMessage) -> Option<BattleId> {
    match message {
        ServerMessage::BattleStarted(battle) => Some(BattleId::from_uuid(battle.id)),
        ServerMessage::BattleMoveResult(result) => {
            Some(BattleId::from_uuid(result.battle_move.battle_id))
        }
        ServerMessage::Unknown => None,
    }
}

/// Manages all active WebSocket connections.
pub struct ConnectionManager {
    /// Map of connection_id -> (ConnectionInfo, sender channel)
    connections: RwLock<HashMap<Uuid, (ConnectionInfo, mpsc::Sender<ServerMessage>)>>,
    /// Buffer size for each connection's channel
    capacity: usize,
}

impl ConnectionManager {
    pub fn new(capacity: usize) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Buffer size new connections should use for their channel.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Register a new connection.
    pub async fn register(
        &self,
        connection_id: Uuid,
        battle_id: Option<BattleId>,
        sender: mpsc::Sender<ServerMessage>,
    ) {
        let info = ConnectionInfo {
            connection_id,
            battle_id,
        };
        let mut connections = self.connections.write().await;
        connections.insert(connection_id, (info, sender));
        tracing::debug!(connection_id = %connection_id, battle_id = ?battle_id, "Connection registered");
    }

    /// Unregister a connection.
    pub async fn unregister(&self, connection_id: Uuid) {
        let mut connections = self.connections.write().await;
        if connections.remove(&connection_id).is_some() {
            tracing::debug!(connection_id = %connection_id, "Connection unregistered");
        }
    }

    pub async fn count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a message to every interested connection.
    ///
    /// A connection whose buffer is full or closed is skipped. Returns the
    /// number of connections the message was queued for.
    pub async fn broadcast(&self, message: ServerMessage) -> usize {
        let connections = self.connections.read().await;
        let mut delivered = 0;
        for (info, sender) in connections.values() {
            if !info.wants(&message) {
                continue;
            }
            match sender.try_send(message.clone()) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        connection_id = %info.connection_id,
                        error = %e,
                        "Failed to broadcast message"
                    );
                }
            }
        }
        delivered
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl NotificationPort for ConnectionManager {
    async fn publish(&self, message: ServerMessage) -> Result<(), NotificationError> {
        let delivered = self.broadcast(message).await;
        tracing::debug!(delivered, "Published message to observers");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_shared::{BattleMoveData, BattleMoveResultData};
    use chrono::Utc;

    fn move_result(battle_id: Uuid) -> ServerMessage {
        ServerMessage::BattleMoveResult(BattleMoveResultData {
            battle_is_over: false,
            battle_move: BattleMoveData {
                id: Uuid::new_v4(),
                battle_id,
                opponent_id: Uuid::new_v4(),
                move_name: "Accept".to_string(),
                create_date: Utc::now(),
            },
            damage: 0,
            plunder: Vec::new(),
        })
    }

    #[tokio::test]
    async fn broadcast_reaches_all_unfiltered_observers() {
        let manager = ConnectionManager::new(4);
        let (tx1, mut rx1) = mpsc::channel(4);
        let (tx2, mut rx2) = mpsc::channel(4);
        manager.register(Uuid::new_v4(), None, tx1).await;
        manager.register(Uuid::new_v4(), None, tx2).await;

        let delivered = manager.broadcast(move_result(Uuid::new_v4())).await;

        assert_eq!(delivered, 2);
        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }

    #[tokio::test]
    async fn battle_filter_drops_other_battles() {
        let manager = ConnectionManager::new(4);
        let watched = BattleId::new();
        let (tx, mut rx) = mpsc::channel(4);
        manager.register(Uuid::new_v4(), Some(watched), tx).await;

        assert_eq!(manager.broadcast(move_result(Uuid::new_v4())).await, 0);
        assert_eq!(manager.broadcast(move_result(watched.to_uuid())).await, 1);

        let ServerMessage::BattleMoveResult(result) = rx.try_recv().unwrap() else {
            panic!("expected a move result");
        };
        assert_eq!(result.battle_move.battle_id, watched.to_uuid());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn full_or_closed_observer_is_skipped() {
        let manager = ConnectionManager::new(1);
        let (full_tx, _full_rx) = mpsc::channel(1);
        full_tx.try_send(ServerMessage::Unknown).unwrap();
        let (closed_tx, closed_rx) = mpsc::channel(1);
        drop(closed_rx);
        let (ok_tx, mut ok_rx) = mpsc::channel(1);
        manager.register(Uuid::new_v4(), None, full_tx).await;
        manager.register(Uuid::new_v4(), None, closed_tx).await;
        manager.register(Uuid::new_v4(), None, ok_tx).await;

        let result = manager.publish(move_result(Uuid::new_v4())).await;

        assert!(result.is_ok());
        assert!(ok_rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn unregister_removes_connection() {
        let manager = ConnectionManager::default();
        let id = Uuid::new_v4();
        let (tx, _rx) = mpsc::channel(1);
        manager.register(id, None, tx).await;
        assert_eq!(manager.count().await, 1);

        manager.unregister(id).await;
        assert_eq!(manager.count().await, 0);
    }
}
