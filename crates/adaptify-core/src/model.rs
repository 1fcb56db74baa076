//! Core data model types for adaptify.
//!
//! These are the fundamental types the whole system uses to represent
//! difficulty tiers, answered questions, and the derived session state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of three ordered difficulty levels.
///
/// Tiers are adjacent in declaration order; transitions never skip a tier.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl DifficultyTier {
    /// All tiers, easiest first.
    pub const ALL: [DifficultyTier; 3] = [
        DifficultyTier::Beginner,
        DifficultyTier::Intermediate,
        DifficultyTier::Advanced,
    ];

    /// The next harder tier, if any.
    pub fn higher(self) -> Option<DifficultyTier> {
        match self {
            DifficultyTier::Beginner => Some(DifficultyTier::Intermediate),
            DifficultyTier::Intermediate => Some(DifficultyTier::Advanced),
            DifficultyTier::Advanced => None,
        }
    }

    /// The next easier tier, if any.
    pub fn lower(self) -> Option<DifficultyTier> {
        match self {
            DifficultyTier::Beginner => None,
            DifficultyTier::Intermediate => Some(DifficultyTier::Beginner),
            DifficultyTier::Advanced => Some(DifficultyTier::Intermediate),
        }
    }

    /// Number of adjacency steps between two tiers.
    pub fn distance(self, other: DifficultyTier) -> usize {
        (self as usize).abs_diff(other as usize)
    }

    /// Title-cased label for display ("Beginner").
    pub fn title(self) -> &'static str {
        match self {
            DifficultyTier::Beginner => "Beginner",
            DifficultyTier::Intermediate => "Intermediate",
            DifficultyTier::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifficultyTier::Beginner => write!(f, "beginner"),
            DifficultyTier::Intermediate => write!(f, "intermediate"),
            DifficultyTier::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for DifficultyTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "easy" => Ok(DifficultyTier::Beginner),
            "intermediate" | "medium" => Ok(DifficultyTier::Intermediate),
            "advanced" | "hard" => Ok(DifficultyTier::Advanced),
            other => Err(format!("unknown difficulty tier: {other}")),
        }
    }
}

/// A single answered question. Created once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEvent {
    /// When the answer was submitted.
    pub timestamp: DateTime<Utc>,
    /// The tier the question was asked at.
    pub tier_at_time: DifficultyTier,
    /// Whether the answer was correct.
    pub correct: bool,
}

impl AnswerEvent {
    pub fn new(timestamp: DateTime<Utc>, tier_at_time: DifficultyTier, correct: bool) -> Self {
        Self {
            timestamp,
            tier_at_time,
            correct,
        }
    }
}

/// Session state derived from the full history after every answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssessmentState {
    /// Tier the next question should be asked at.
    pub current_tier: DifficultyTier,
    /// Cumulative number of correct answers.
    pub score: u32,
    /// Cumulative number of answered questions.
    pub questions_asked: u32,
    /// `score / questions_asked` since the start of the session, 0 when empty.
    pub running_accuracy: f64,
}

impl AssessmentState {
    /// Derive the state from a tier and the history that led to it.
    pub fn derive(current_tier: DifficultyTier, history: &[AnswerEvent]) -> Self {
        let questions_asked = history.len() as u32;
        let score = history.iter().filter(|e| e.correct).count() as u32;
        let running_accuracy = if questions_asked == 0 {
            0.0
        } else {
            score as f64 / questions_asked as f64
        };
        Self {
            current_tier,
            score,
            questions_asked,
            running_accuracy,
        }
    }
}

/// Rolling performance summary. Derived from history, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Accuracy over the recent window.
    pub accuracy: f64,
    /// Consecutive correct answers ending at the latest event.
    pub streak: u32,
    /// Length of the full history.
    pub total_questions: u32,
    /// Whether recent accuracy sits inside the comfortable band.
    pub level_appropriate: bool,
}

impl PerformanceMetrics {
    /// Metrics of an empty history.
    pub fn empty() -> Self {
        Self {
            accuracy: 0.0,
            streak: 0,
            total_questions: 0,
            level_appropriate: true,
        }
    }
}

/// Fraction of correct answers in a slice, 0 for an empty slice.
pub fn accuracy_of(events: &[AnswerEvent]) -> f64 {
    if events.is_empty() {
        return 0.0;
    }
    let correct = events.iter().filter(|e| e.correct).count();
    correct as f64 / events.len() as f64
}

/// The last `n` events, or all of them when the history is shorter.
pub fn recent_window(history: &[AnswerEvent], n: usize) -> &[AnswerEvent] {
    &history[history.len().saturating_sub(n)..]
}
