//! Shared wiring for battle use case tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use arena_domain::{CharacterId, CharacterName, CombatSnapshot, Item};
use arena_shared::ServerMessage;

use crate::infrastructure::clock::{FixedClock, FixedRandom, SequenceRandom};
use crate::infrastructure::memory::InMemoryStore;
use crate::infrastructure::ports::{
    CharacterRepo, NotificationError, NotificationPort, RandomPort,
};

use super::{BattleLocks, BattleQueries, CombatResolver, StartBattle, SubmitMove};

/// Notification sink that keeps everything it is given.
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    messages: Mutex<Vec<ServerMessage>>,
}

#[async_trait]
impl NotificationPort for RecordingNotifier {
    async fn publish(&self, message: ServerMessage) -> Result<(), NotificationError> {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message);
        }
        Ok(())
    }
}

pub(crate) struct Arena {
    pub store: InMemoryStore,
    pub now: DateTime<Utc>,
    pub start: Arc<StartBattle>,
    pub submit: Arc<SubmitMove>,
    pub queries: Arc<BattleQueries>,
    recorder: Arc<RecordingNotifier>,
}

impl Arena {
    /// Every die lands on 1.
    pub fn new() -> Self {
        Self::build(Arc::new(FixedRandom(1)), None)
    }

    pub fn with_rolls(rolls: impl IntoIterator<Item = i32>) -> Self {
        Self::build(Arc::new(SequenceRandom::new(rolls)), None)
    }

    pub fn with_notifier(notifier: Arc<dyn NotificationPort>) -> Self {
        Self::build(Arc::new(FixedRandom(1)), Some(notifier))
    }

    fn build(random: Arc<dyn RandomPort>, notifier: Option<Arc<dyn NotificationPort>>) -> Self {
        let store = InMemoryStore::new();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let clock = Arc::new(FixedClock(now));
        let recorder = Arc::new(RecordingNotifier::default());
        let notifier = notifier.unwrap_or_else(|| recorder.clone() as Arc<dyn NotificationPort>);
        let battles = Arc::new(store.clone());

        Self {
            start: Arc::new(StartBattle::new(
                battles.clone(),
                clock.clone(),
                notifier.clone(),
            )),
            submit: Arc::new(SubmitMove::new(
                battles.clone(),
                clock,
                Arc::new(CombatResolver::new(random)),
                notifier,
                Arc::new(BattleLocks::new()),
            )),
            queries: Arc::new(BattleQueries::new(battles, Arc::new(store.clone()))),
            store,
            now,
            recorder,
        }
    }

    pub fn published(&self) -> Vec<ServerMessage> {
        self.recorder
            .messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

/// A level 1 character at full health carrying nothing.
pub(crate) async fn seed(store: &InMemoryStore, name: &str) -> CharacterId {
    let snapshot = CombatSnapshot::new(CharacterId::new(), CharacterName::new(name).unwrap());
    seed_with(store, snapshot, Vec::new()).await
}

pub(crate) async fn seed_with(
    store: &InMemoryStore,
    snapshot: CombatSnapshot,
    inventory: Vec<Item>,
) -> CharacterId {
    store.save(&snapshot, &inventory).await.unwrap();
    snapshot.id
}
