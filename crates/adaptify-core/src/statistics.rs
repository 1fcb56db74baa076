//! Progress series and per-tier breakdowns for reporting.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::{AnswerEvent, DifficultyTier};

/// One point on the learning-progress curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressPoint {
    /// 1-based question number.
    pub question_number: u32,
    /// Tier the question was asked at.
    pub tier: DifficultyTier,
    /// Whether the answer was correct.
    pub correct: bool,
    /// Cumulative accuracy after this question.
    pub accuracy: f64,
}

/// Cumulative accuracy after every answered question.
pub fn progress_series(history: &[AnswerEvent]) -> Vec<ProgressPoint> {
    let mut correct = 0u32;
    history
        .iter()
        .enumerate()
        .map(|(i, event)| {
            if event.correct {
                correct += 1;
            }
            let question_number = i as u32 + 1;
            ProgressPoint {
                question_number,
                tier: event.tier_at_time,
                correct: event.correct,
                accuracy: correct as f64 / question_number as f64,
            }
        })
        .collect()
}

/// Totals for questions asked at one tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierStats {
    pub tier: DifficultyTier,
    pub asked: u32,
    pub correct: u32,
    /// `correct / asked`, 0 when nothing was asked at this tier.
    pub accuracy: f64,
}

/// Per-tier totals, easiest tier first. Every tier is listed, even unused ones.
pub fn tier_breakdown(history: &[AnswerEvent]) -> Vec<TierStats> {
    DifficultyTier::ALL
        .iter()
        .map(|&tier| {
            let (asked, correct) = history
                .iter()
                .filter(|e| e.tier_at_time == tier)
                .fold((0u32, 0u32), |(asked, correct), e| {
                    (asked + 1, correct + u32::from(e.correct))
                });
            TierStats {
                tier,
                asked,
                correct,
                accuracy: if asked == 0 {
                    0.0
                } else {
                    correct as f64 / asked as f64
                },
            }
        })
        .collect()
}

/// Format how long a question took as `"{m}m {s}s"`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}m {}s", secs / 60, secs % 60)
}
