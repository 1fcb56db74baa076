//! Thresholds and window sizes shared by the controller and the analyzer.

use serde::{Deserialize, Serialize};

use crate::error::AssessmentError;
use crate::model::DifficultyTier;

/// Tuning knobs for an assessment run.
///
/// The defaults reproduce the stock heuristic. The transition rule in
/// [`DifficultyController::next_tier`](crate::controller::DifficultyController::next_tier)
/// is not configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentConfig {
    /// Tier a fresh session starts at.
    #[serde(default)]
    pub starting_tier: DifficultyTier,
    /// Events needed before `should_adjust` gives advice, and before the
    /// level-appropriateness band is checked.
    #[serde(default = "default_minimum_questions")]
    pub minimum_questions: usize,
    /// Size of the recent window used for accuracy.
    #[serde(default = "default_metrics_window")]
    pub metrics_window: usize,
    /// Recent accuracy at or above this advises an upgrade.
    #[serde(default = "default_upgrade_threshold")]
    pub upgrade_threshold: f64,
    /// Recent accuracy at or below this advises a downgrade.
    #[serde(default = "default_downgrade_threshold")]
    pub downgrade_threshold: f64,
}

fn default_minimum_questions() -> usize {
    3
}

fn default_metrics_window() -> usize {
    5
}

fn default_upgrade_threshold() -> f64 {
    0.75
}

fn default_downgrade_threshold() -> f64 {
    0.40
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            starting_tier: DifficultyTier::default(),
            minimum_questions: default_minimum_questions(),
            metrics_window: default_metrics_window(),
            upgrade_threshold: default_upgrade_threshold(),
            downgrade_threshold: default_downgrade_threshold(),
        }
    }
}

impl AssessmentConfig {
    /// Check that thresholds and windows are usable.
    pub fn validate(&self) -> Result<(), AssessmentError> {
        for (name, value) in [
            ("upgrade_threshold", self.upgrade_threshold),
            ("downgrade_threshold", self.downgrade_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AssessmentError::InvalidConfig(format!(
                    "{name} must be between 0.0 and 1.0, got {value}"
                )));
            }
        }
        if self.downgrade_threshold >= self.upgrade_threshold {
            return Err(AssessmentError::InvalidConfig(format!(
                "downgrade_threshold ({}) must be below upgrade_threshold ({})",
                self.downgrade_threshold, self.upgrade_threshold
            )));
        }
        if self.metrics_window == 0 {
            return Err(AssessmentError::InvalidConfig(
                "metrics_window must be at least 1".into(),
            ));
        }
        if self.minimum_questions == 0 {
            return Err(AssessmentError::InvalidConfig(
                "minimum_questions must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
