//! Difficulty controller.
//!
//! Two rules live here. [`DifficultyController::next_tier`] is applied after
//! every answered question and looks at a short window with a majority rule.
//! [`DifficultyController::should_adjust`] is an advisory query over a longer
//! window with accuracy thresholds; it never changes the tier itself.
//!
//! The controller holds no mutable state. Callers own the current tier and
//! apply whatever the controller returns.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::AssessmentConfig;
use crate::error::AssessmentError;
use crate::model::{accuracy_of, recent_window, AnswerEvent, DifficultyTier};

/// Number of latest events the per-question transition looks at.
pub const TRANSITION_WINDOW: usize = 3;

/// Correct answers in the transition window needed to move up.
const PROMOTE_AT: usize = 2;

/// Correct answers in the transition window at or below which we move down.
const DEMOTE_AT: usize = 1;

/// Why `should_adjust` answered the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentReason {
    Upgrade,
    Downgrade,
    Maintain,
    InsufficientHistory,
}

impl AdjustmentReason {
    pub fn as_str(self) -> &'static str {
        match self {
            AdjustmentReason::Upgrade => "upgrade",
            AdjustmentReason::Downgrade => "downgrade",
            AdjustmentReason::Maintain => "maintain",
            AdjustmentReason::InsufficientHistory => "insufficient_history",
        }
    }
}

impl fmt::Display for AdjustmentReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an advisory `should_adjust` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentAdvice {
    pub adjust: bool,
    pub reason: AdjustmentReason,
}

impl From<AdjustmentAdvice> for (bool, AdjustmentReason) {
    fn from(advice: AdjustmentAdvice) -> Self {
        (advice.adjust, advice.reason)
    }
}

/// Decides the tier of the next question.
#[derive(Debug, Clone, Default)]
pub struct DifficultyController {
    config: AssessmentConfig,
}

impl DifficultyController {
    /// Fails if `config` does not pass [`AssessmentConfig::validate`].
    pub fn new(config: AssessmentConfig) -> Result<Self, AssessmentError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AssessmentConfig {
        &self.config
    }

    /// Tier to use after the latest answer in `history`.
    ///
    /// Counts correct answers among the last three events (fewer if the
    /// history is shorter). Two or more move one tier up, one or fewer move one
    /// tier down, and a missing neighbour leaves the tier where it is.
    pub fn next_tier(&self, current: DifficultyTier, history: &[AnswerEvent]) -> DifficultyTier {
        let next = transition(current, history);
        if next != current {
            tracing::debug!(from = %current, to = %next, "tier transition");
        }
        next
    }

    /// Advisory check over the metrics window.
    ///
    /// Below `minimum_questions` events the answer is always
    /// `(false, insufficient_history)`, whatever the answers were.
    pub fn should_adjust(&self, history: &[AnswerEvent]) -> AdjustmentAdvice {
        if history.len() < self.config.minimum_questions {
            return AdjustmentAdvice {
                adjust: false,
                reason: AdjustmentReason::InsufficientHistory,
            };
        }

        let accuracy = accuracy_of(recent_window(history, self.config.metrics_window));
        if accuracy >= self.config.upgrade_threshold {
            AdjustmentAdvice {
                adjust: true,
                reason: AdjustmentReason::Upgrade,
            }
        } else if accuracy <= self.config.downgrade_threshold {
            AdjustmentAdvice {
                adjust: true,
                reason: AdjustmentReason::Downgrade,
            }
        } else {
            AdjustmentAdvice {
                adjust: false,
                reason: AdjustmentReason::Maintain,
            }
        }
    }
}

/// The per-question transition rule, without logging. Independent of the
/// config, so a stored history can be replayed with it.
pub fn transition(current: DifficultyTier, history: &[AnswerEvent]) -> DifficultyTier {
    let recent_correct = recent_window(history, TRANSITION_WINDOW)
        .iter()
        .filter(|e| e.correct)
        .count();

    if recent_correct >= PROMOTE_AT {
        current.higher()
    } else if recent_correct <= DEMOTE_AT {
        current.lower()
    } else {
        None
    }
    .unwrap_or(current)
}
