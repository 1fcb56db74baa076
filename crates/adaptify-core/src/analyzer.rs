//! Performance analytics over an answer history.
//!
//! Window sizes are deliberately asymmetric: accuracy and appropriateness use
//! the recent metrics window, `total_questions` uses the whole history.

use crate::config::AssessmentConfig;
use crate::error::AssessmentError;
use crate::model::{accuracy_of, recent_window, AnswerEvent, PerformanceMetrics};

/// Fewer answered questions than this yields only the "answer more" message.
const RECOMMENDATION_MINIMUM: u32 = 3;

/// Below this recent accuracy we suggest remedial work.
const STRUGGLING_BELOW: f64 = 0.4;

/// Below this (and at or above [`STRUGGLING_BELOW`]) we encourage.
const PROGRESSING_BELOW: f64 = 0.7;

pub const MORE_QUESTIONS_MESSAGE: &str =
    "Complete more questions to get personalized recommendations.";

pub const STRUGGLING_MESSAGES: [&str; 3] = [
    "Review fundamental concepts before proceeding",
    "Focus on understanding basic principles",
    "Consider moving to an easier difficulty level",
];

pub const PROGRESSING_MESSAGES: [&str; 3] = [
    "You're making steady progress",
    "Pay attention to detailed explanations",
    "Practice similar questions to reinforce learning",
];

pub const EXCELLING_MESSAGES: [&str; 3] = [
    "Excellent performance!",
    "Ready for more challenging questions",
    "Consider helping peers to reinforce your understanding",
];

/// Turns raw history into summary statistics and guidance.
#[derive(Debug, Clone, Default)]
pub struct PerformanceAnalyzer {
    config: AssessmentConfig,
}

impl PerformanceAnalyzer {
    /// Fails if `config` does not pass [`AssessmentConfig::validate`].
    pub fn new(config: AssessmentConfig) -> Result<Self, AssessmentError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Compute metrics for the whole history.
    pub fn calculate_metrics(&self, history: &[AnswerEvent]) -> PerformanceMetrics {
        if history.is_empty() {
            return PerformanceMetrics::empty();
        }

        let recent = recent_window(history, self.config.metrics_window);
        PerformanceMetrics {
            accuracy: accuracy_of(recent),
            streak: streak(history),
            total_questions: history.len() as u32,
            level_appropriate: self.is_level_appropriate(recent),
        }
    }

    /// Whether `recent` accuracy sits inside the comfortable band.
    ///
    /// Too few events to judge counts as appropriate. Both band edges are
    /// inclusive.
    pub fn is_level_appropriate(&self, recent: &[AnswerEvent]) -> bool {
        if recent.len() < self.config.minimum_questions {
            return true;
        }
        let accuracy = accuracy_of(recent);
        self.config.downgrade_threshold <= accuracy && accuracy <= self.config.upgrade_threshold
    }

    /// Guidance for the learner, in display order.
    pub fn generate_recommendations(&self, metrics: &PerformanceMetrics) -> Vec<String> {
        if metrics.total_questions < RECOMMENDATION_MINIMUM {
            return vec![MORE_QUESTIONS_MESSAGE.to_string()];
        }

        let messages = if metrics.accuracy < STRUGGLING_BELOW {
            &STRUGGLING_MESSAGES
        } else if metrics.accuracy < PROGRESSING_BELOW {
            &PROGRESSING_MESSAGES
        } else {
            &EXCELLING_MESSAGES
        };
        messages.iter().map(|m| m.to_string()).collect()
    }
}

/// Consecutive correct answers ending at the most recent event.
pub fn streak(history: &[AnswerEvent]) -> u32 {
    history.iter().rev().take_while(|e| e.correct).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DifficultyTier;
    use chrono::Utc;

    fn history(answers: &[bool]) -> Vec<AnswerEvent> {
        answers
            .iter()
            .map(|&c| AnswerEvent::new(Utc::now(), DifficultyTier::Intermediate, c))
            .collect()
    }

    fn metrics(accuracy: f64, total_questions: u32) -> PerformanceMetrics {
        PerformanceMetrics {
            accuracy,
            streak: 0,
            total_questions,
            level_appropriate: true,
        }
    }

    #[test]
    fn new_rejects_zero_window() {
        let config = AssessmentConfig {
            metrics_window: 0,
            ..Default::default()
        };
        assert!(matches!(
            PerformanceAnalyzer::new(config),
            Err(AssessmentError::InvalidConfig(_))
        ));
    }

    #[test]
    fn streak_cases() {
        assert_eq!(streak(&[]), 0);
        assert_eq!(streak(&history(&[true; 7])), 7);
        assert_eq!(streak(&history(&[true, true, false])), 0);
        assert_eq!(streak(&history(&[true, false, true, true])), 2);
    }

    #[test]
    fn empty_history_metrics() {
        let m = PerformanceAnalyzer::default().calculate_metrics(&[]);
        assert_eq!(m, PerformanceMetrics::empty());
        assert_eq!(m.accuracy, 0.0);
        assert!(m.level_appropriate);
    }

    #[test]
    fn accuracy_is_windowed_but_total_is_not() {
        let analyzer = PerformanceAnalyzer::default();
        let h = history(&[false, false, false, true, true, true, false, true]);
        let m = analyzer.calculate_metrics(&h);
        assert_eq!(m.total_questions, 8);
        // last five: T T T F T
        assert!((m.accuracy - 0.8).abs() < f64::EPSILON);
        assert_eq!(m.streak, 1);
        assert!(!m.level_appropriate);
    }

    #[test]
    fn appropriateness_short_window_is_true() {
        let analyzer = PerformanceAnalyzer::default();
        assert!(analyzer.is_level_appropriate(&history(&[false, false])));
        assert!(analyzer.is_level_appropriate(&[]));
    }

    #[test]
    fn appropriateness_boundaries_inclusive() {
        let analyzer = PerformanceAnalyzer::default();
        // 2 / 5 = 0.40
        assert!(analyzer.is_level_appropriate(&history(&[true, true, false, false, false])));
        // 3 / 4 = 0.75
        assert!(analyzer.is_level_appropriate(&history(&[true, true, true, false])));
        // 1 / 3 and 4 / 5 fall outside
        assert!(!analyzer.is_level_appropriate(&history(&[true, false, false])));
        assert!(!analyzer.is_level_appropriate(&history(&[true, true, true, true, false])));
    }

    #[test]
    fn too_few_questions_single_message() {
        let analyzer = PerformanceAnalyzer::default();
        for accuracy in [0.0, 0.5, 1.0] {
            let recs = analyzer.generate_recommendations(&metrics(accuracy, 2));
            assert_eq!(recs, vec![MORE_QUESTIONS_MESSAGE.to_string()]);
        }
    }

    #[test]
    fn steady_progress_for_sixty_percent() {
        let analyzer = PerformanceAnalyzer::default();
        let m = analyzer.calculate_metrics(&history(&[true, true, true, false, false]));
        assert!((m.accuracy - 0.6).abs() < f64::EPSILON);
        assert_eq!(
            analyzer.generate_recommendations(&m),
            vec![
                "You're making steady progress",
                "Pay attention to detailed explanations",
                "Practice similar questions to reinforce learning",
            ]
        );
    }

    #[test]
    fn recommendation_branches() {
        let analyzer = PerformanceAnalyzer::default();
        assert_eq!(
            analyzer.generate_recommendations(&metrics(0.2, 5)),
            STRUGGLING_MESSAGES.to_vec()
        );
        // 0.4 is not below 0.4
        assert_eq!(
            analyzer.generate_recommendations(&metrics(0.4, 5)),
            PROGRESSING_MESSAGES.to_vec()
        );
        assert_eq!(
            analyzer.generate_recommendations(&metrics(0.7, 5)),
            EXCELLING_MESSAGES.to_vec()
        );
        assert_eq!(analyzer.generate_recommendations(&metrics(1.0, 3)).len(), 3);
    }
}
