//! Question source error types.

use adaptify_core::DifficultyTier;
use thiserror::Error;

/// Errors that can occur when asking a source for a question.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The bank has no questions at all.
    #[error("question bank '{0}' is empty")]
    EmptyBank(String),

    /// No question exists for the tier or any tier near it.
    #[error("no questions available for tier {0}")]
    NoQuestionsForTier(DifficultyTier),

    /// A question in the bank is malformed.
    #[error("invalid question {id}: {message}")]
    InvalidQuestion { id: String, message: String },
}

impl SourceError {
    /// Returns `true` if asking again cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            SourceError::EmptyBank(_) | SourceError::InvalidQuestion { .. }
        )
    }
}
