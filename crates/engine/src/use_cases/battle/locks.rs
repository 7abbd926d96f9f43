//! Per-battle exclusive locks.
//!
//! Moves on the same battle run one at a time; moves on different battles
//! never wait on each other here.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use arena_domain::BattleId;

#[derive(Default)]
pub struct BattleLocks {
    locks: DashMap<BattleId, Arc<Mutex<()>>>,
}

impl BattleLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `battle_id`. Released when the guard drops.
    pub async fn acquire(&self, battle_id: BattleId) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the map shard is not held across the await.
        let lock = self
            .locks
            .entry(battle_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Drop the entry for `battle_id` unless a move still holds or awaits it.
    pub fn release(&self, battle_id: BattleId) {
        self.locks
            .remove_if(&battle_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
