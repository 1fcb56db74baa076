//! Assessment error types.
//!
//! The analytics themselves are total functions, so these errors only cover
//! contract violations: malformed histories handed back by a caller and
//! configurations that break the controller's thresholds.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::DifficultyTier;

/// Errors surfaced by the assessment core.
#[derive(Debug, Error, PartialEq)]
pub enum AssessmentError {
    /// An event is older than the one before it.
    #[error("history is not chronological at event {index}: {current} precedes {previous}")]
    NonChronological {
        index: usize,
        previous: DateTime<Utc>,
        current: DateTime<Utc>,
    },

    /// Two consecutive events jump more than one tier.
    #[error("history skips a tier at event {index}: {from} -> {to}")]
    TierSkip {
        index: usize,
        from: DifficultyTier,
        to: DifficultyTier,
    },

    /// An event was asked at a tier the controller would not have chosen.
    #[error("history diverges at event {index}: asked at {found}, controller chose {expected}")]
    TransitionMismatch {
        index: usize,
        expected: DifficultyTier,
        found: DifficultyTier,
    },

    /// The stored current tier is not the one the history leads to.
    #[error("current tier {current} does not follow from the history (expected {expected})")]
    UnreachableTier {
        expected: DifficultyTier,
        current: DifficultyTier,
    },

    /// A configuration value is out of range.
    #[error("invalid assessment config: {0}")]
    InvalidConfig(String),
}

impl AssessmentError {
    /// Returns `true` if the error comes from a malformed history rather than
    /// from configuration.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            AssessmentError::NonChronological { .. }
                | AssessmentError::TierSkip { .. }
                | AssessmentError::TransitionMismatch { .. }
                | AssessmentError::UnreachableTier { .. }
        )
    }

    /// Index of the offending event, if the error points at one.
    pub fn event_index(&self) -> Option<usize> {
        match self {
            AssessmentError::NonChronological { index, .. }
            | AssessmentError::TierSkip { index, .. }
            | AssessmentError::TransitionMismatch { index, .. } => Some(*index),
            _ => None,
        }
    }
}
