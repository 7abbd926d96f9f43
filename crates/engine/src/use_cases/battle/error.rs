//! Battle operation errors.

use arena_domain::combat::MoveRejection;
use arena_domain::{BattleId, BattleMoveId, CharacterId, Move, UnknownMove};

use crate::infrastructure::ports::RepoError;

/// Errors that can occur while starting battles or submitting moves.
#[derive(Debug, thiserror::Error)]
pub enum BattleError {
    #[error("Battle - ({0}) not found")]
    BattleNotFound(BattleId),

    #[error("Character - ({0}) not found")]
    CharacterNotFound(CharacterId),

    #[error("Move - ({0}) not found")]
    MoveNotFound(BattleMoveId),

    /// The move name matched none of the seven moves
    #[error("Invalid Move - {name} Valid Moves: {}", valid.join(","))]
    UnknownMove {
        name: String,
        valid: Vec<&'static str>,
    },

    #[error("It's not your turn")]
    NotYourTurn,

    /// The move is not a legal successor of the last recorded move
    #[error(transparent)]
    IllegalMove(MoveRejection),

    #[error("Character ({0}) is already in battle")]
    AlreadyInBattle(CharacterId),

    #[error("A character cannot battle itself")]
    SameCombatant,

    #[error("Battle ({0}) is over")]
    BattleOver(BattleId),

    #[error("Character ({character_id}) is not part of battle ({battle_id})")]
    NotParticipant {
        battle_id: BattleId,
        character_id: CharacterId,
    },

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl BattleError {
    /// Caller mistakes that leave all state untouched (HTTP 400).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownMove { .. }
                | Self::NotYourTurn
                | Self::IllegalMove(_)
                | Self::AlreadyInBattle(_)
                | Self::SameCombatant
                | Self::BattleOver(_)
                | Self::NotParticipant { .. }
        )
    }

    /// Missing battle, character, or move (HTTP 404).
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::BattleNotFound(_) | Self::CharacterNotFound(_) | Self::MoveNotFound(_) => true,
            Self::Repo(e) => e.is_not_found(),
            _ => false,
        }
    }
}

impl From<UnknownMove> for BattleError {
    fn from(e: UnknownMove) -> Self {
        Self::UnknownMove {
            name: e.name,
            valid: Move::names(),
        }
    }
}

impl From<MoveRejection> for BattleError {
    fn from(e: MoveRejection) -> Self {
        match e {
            MoveRejection::NotYourTurn => Self::NotYourTurn,
            other => Self::IllegalMove(other),
        }
    }
}
