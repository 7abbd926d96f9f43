//! Character use cases.
//!
//! The engine only stores the combat view of a character. These operations
//! seed and inspect that view; full character management lives elsewhere.

mod crud;
mod types;

pub use crud::CharacterCrud;
pub use types::{character_to_protocol, item_to_protocol};

use arena_domain::{CharacterId, DomainError};

use crate::infrastructure::ports::RepoError;

/// Errors from character operations.
#[derive(Debug, thiserror::Error)]
pub enum CharacterError {
    #[error("Character - ({0}) not found")]
    NotFound(CharacterId),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Character ({0}) is in battle and cannot be changed")]
    InBattle(CharacterId),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl From<DomainError> for CharacterError {
    fn from(e: DomainError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

/// Container for character use cases.
pub struct CharacterUseCases {
    pub crud: CharacterCrud,
}

impl CharacterUseCases {
    pub fn new(crud: CharacterCrud) -> Self {
        Self { crud }
    }
}
