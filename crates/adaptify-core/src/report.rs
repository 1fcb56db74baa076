//! Assessment report snapshot handed to presentation layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::controller::AdjustmentAdvice;
use crate::model::{AssessmentState, DifficultyTier, PerformanceMetrics};
use crate::statistics::{ProgressPoint, TierStats};

/// Everything a renderer needs about one session at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    /// Session the report was taken from.
    pub session_id: Uuid,
    /// When the report was created.
    pub generated_at: DateTime<Utc>,
    /// When the session started.
    pub started_at: DateTime<Utc>,
    /// Cumulative state.
    pub state: AssessmentState,
    /// Recent-window metrics.
    pub metrics: PerformanceMetrics,
    /// Guidance, in display order.
    pub recommendations: Vec<String>,
    /// Advisory threshold check.
    pub advice: AdjustmentAdvice,
    /// Cumulative accuracy after every question.
    pub progress: Vec<ProgressPoint>,
    /// Per-tier totals.
    pub tiers: Vec<TierStats>,
}

impl AssessmentReport {
    /// Highest tier any question was asked at.
    pub fn peak_tier(&self) -> Option<DifficultyTier> {
        self.progress.iter().map(|p| p.tier).max()
    }

    /// One-line summary, e.g. `"7/10 correct (70.0%), now at Advanced"`.
    pub fn summary_line(&self) -> String {
        format!(
            "{}/{} correct ({:.1}%), now at {}",
            self.state.score,
            self.state.questions_asked,
            self.state.running_accuracy * 100.0,
            self.state.current_tier.title()
        )
    }
}
