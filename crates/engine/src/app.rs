//! Application state and composition.

use std::sync::Arc;

use crate::api::ConnectionManager;
use crate::infrastructure::clock::{SystemClock, SystemRandom};
use crate::infrastructure::ports::{
    BattleRepo, CharacterRepo, ClockPort, NotificationPort, RandomPort,
};
use crate::use_cases::battle::{
    BattleLocks, BattleQueries, BattleUseCases, CombatResolver, StartBattle, SubmitMove,
};
use crate::use_cases::character::{CharacterCrud, CharacterUseCases};

/// Main application state.
///
/// Holds the stores and use cases.
/// Passed to HTTP/WebSocket handlers via Axum state.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    pub connections: Arc<ConnectionManager>,
}

/// Container for the store ports.
pub struct Repositories {
    pub battle: Arc<dyn BattleRepo>,
    pub character: Arc<dyn CharacterRepo>,
}

/// Container for all use cases.
pub struct UseCases {
    pub battle: BattleUseCases,
    pub character: CharacterUseCases,
}

impl App {
    /// Wire the engine over the given stores with the system clock and dice.
    pub fn new(
        battle_repo: Arc<dyn BattleRepo>,
        character_repo: Arc<dyn CharacterRepo>,
        connections: Arc<ConnectionManager>,
    ) -> Self {
        Self::with_ports(
            battle_repo,
            character_repo,
            Arc::new(SystemClock::new()),
            Arc::new(SystemRandom::new()),
            connections,
        )
    }

    pub fn with_ports(
        battle_repo: Arc<dyn BattleRepo>,
        character_repo: Arc<dyn CharacterRepo>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        connections: Arc<ConnectionManager>,
    ) -> Self {
        let notifier: Arc<dyn NotificationPort> = connections.clone();
        let resolver = Arc::new(CombatResolver::new(random));

        let battle = BattleUseCases::new(
            Arc::new(StartBattle::new(
                battle_repo.clone(),
                clock.clone(),
                notifier.clone(),
            )),
            Arc::new(SubmitMove::new(
                battle_repo.clone(),
                clock,
                resolver,
                notifier,
                Arc::new(BattleLocks::new()),
            )),
            Arc::new(BattleQueries::new(
                battle_repo.clone(),
                character_repo.clone(),
            )),
        );
        let character = CharacterUseCases::new(CharacterCrud::new(character_repo.clone()));

        Self {
            repositories: Repositories {
                battle: battle_repo,
                character: character_repo,
            },
            use_cases: UseCases { battle, character },
            connections,
        }
    }
}
