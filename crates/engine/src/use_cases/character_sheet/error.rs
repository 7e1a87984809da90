//! Character sheet operation errors.

use crate::infrastructure::ports::RepoError;
use charsheet_domain::{CalculationError, CharacterId, DomainError};

/// Errors that can occur during character sheet operations.
#[derive(Debug, thiserror::Error)]
pub enum CharacterSheetError {
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),

    #[error("Unknown ability: {0}")]
    UnknownAbility(String),

    #[error("Character references unknown {entity_type}: {id}")]
    UnknownReference {
        entity_type: &'static str,
        id: String,
    },

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Calculation error: {0}")]
    Calculation(#[from] CalculationError),

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
