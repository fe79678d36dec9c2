use thiserror::Error;
use uuid::Uuid;

use crate::models::keyword::Category;

/// Engine-level error type.
/// Every variant is a caller input error or a collaborator failure; nothing is retried internally.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Keyword '{text}' is already tracked as {category}")]
    DuplicateKeyword { text: String, category: Category },

    #[error("Invalid weight {0}: weights must be finite and greater than zero")]
    InvalidWeight(f64),

    #[error("Keyword text is empty after normalization")]
    EmptyKeyword,

    #[error("Not found: keyword {0}")]
    NotFound(Uuid),

    #[error("Retrain plan is stale: computed at revision {planned}, store is at revision {current}")]
    StaleSnapshot { planned: u64, current: u64 },

    #[error("Repository error: {0}")]
    Repository(#[from] anyhow::Error),
}

impl EngineError {
    /// Stable machine-readable code for the API layer sitting above the engine.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::DuplicateKeyword { .. } => "DUPLICATE_KEYWORD",
            EngineError::InvalidWeight(_) => "INVALID_WEIGHT",
            EngineError::EmptyKeyword => "EMPTY_KEYWORD",
            EngineError::NotFound(_) => "NOT_FOUND",
            EngineError::StaleSnapshot { .. } => "STALE_SNAPSHOT",
            EngineError::Repository(_) => "REPOSITORY_ERROR",
        }
    }

    /// Caller input errors, as opposed to collaborator or concurrency failures.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            EngineError::DuplicateKeyword { .. }
                | EngineError::InvalidWeight(_)
                | EngineError::EmptyKeyword
                | EngineError::NotFound(_)
        )
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
