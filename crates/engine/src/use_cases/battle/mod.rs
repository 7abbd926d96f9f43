//! Battle use cases.
//!
//! Starting battles, submitting moves, and reading battle history. Every
//! write runs inside one unit of work that commits as a whole or not at all.

mod error;
#[cfg(test)]
mod fixtures;
mod locks;
mod queries;
mod resolver;
mod start_battle;
mod submit_move;
mod types;

use std::sync::Arc;

pub use error::BattleError;
pub use locks::BattleLocks;
pub use queries::BattleQueries;
pub use resolver::CombatResolver;
pub use start_battle::StartBattle;
pub use submit_move::SubmitMove;
pub use types::{battle_move_to_protocol, battle_to_protocol, BattleMoveResult};

use crate::infrastructure::ports::BattleUnitOfWork;

/// Container for battle use cases.
pub struct BattleUseCases {
    pub start: Arc<StartBattle>,
    pub submit_move: Arc<SubmitMove>,
    pub queries: Arc<BattleQueries>,
}

impl BattleUseCases {
    pub fn new(
        start: Arc<StartBattle>,
        submit_move: Arc<SubmitMove>,
        queries: Arc<BattleQueries>,
    ) -> Self {
        Self {
            start,
            submit_move,
            queries,
        }
    }
}

/// Commit `uow` if `outcome` succeeded, otherwise roll it back.
async fn settle<T>(
    mut uow: Box<dyn BattleUnitOfWork>,
    outcome: Result<T, BattleError>,
) -> Result<T, BattleError> {
    match outcome {
        Ok(value) => {
            uow.commit().await.map_err(|e| {
                tracing::error!(error = %e, "Failed to commit battle changes");
                BattleError::Repo(e)
            })?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = uow.rollback().await {
                tracing::warn!(error = %rollback_err, "Rollback failed; transaction dropped");
            }
            if let BattleError::Repo(repo_err) = &e {
                tracing::error!(error = %repo_err, "Battle changes rolled back after store failure");
            }
            Err(e)
        }
    }
}
