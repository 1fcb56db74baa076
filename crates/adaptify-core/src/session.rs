//! One learner's assessment run.
//!
//! A [`Session`] owns the append-only history and the current tier. Every
//! operation takes the session explicitly; nothing is shared between sessions,
//! so a host serving many learners keeps one `Session` per learner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analyzer::PerformanceAnalyzer;
use crate::config::AssessmentConfig;
use crate::controller::{transition, AdjustmentAdvice, DifficultyController};
use crate::error::AssessmentError;
use crate::model::{AnswerEvent, AssessmentState, DifficultyTier, PerformanceMetrics};
use crate::report::AssessmentReport;
use crate::statistics::{progress_series, tier_breakdown};

/// Serialized form of a session. Only the config, history and tier are
/// stored; everything else is derived again on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub current_tier: DifficultyTier,
    #[serde(default)]
    pub config: AssessmentConfig,
    #[serde(default)]
    pub history: Vec<AnswerEvent>,
}

/// An assessment session.
///
/// Deserializing re-validates the history, so a tampered or hand-edited
/// session fails to load instead of producing bogus metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SessionRecord", into = "SessionRecord")]
pub struct Session {
    id: Uuid,
    started_at: DateTime<Utc>,
    current_tier: DifficultyTier,
    history: Vec<AnswerEvent>,
    controller: DifficultyController,
    analyzer: PerformanceAnalyzer,
}

impl Session {
    /// Start an empty session with the default thresholds.
    pub fn new() -> Self {
        Self::start(DifficultyController::default(), PerformanceAnalyzer::default())
    }

    /// Start an empty session at `config.starting_tier`.
    ///
    /// Fails if `config` is out of range.
    pub fn with_config(config: AssessmentConfig) -> Result<Self, AssessmentError> {
        Ok(Self::start(
            DifficultyController::new(config.clone())?,
            PerformanceAnalyzer::new(config)?,
        ))
    }

    fn start(controller: DifficultyController, analyzer: PerformanceAnalyzer) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            current_tier: controller.config().starting_tier,
            history: Vec::new(),
            controller,
            analyzer,
        }
    }

    /// Rebuild a session from a history supplied by the host.
    ///
    /// The history is replayed through the transition rule: it must be in
    /// order, every event after the first must sit at the tier the controller
    /// chose, and `current_tier` must be the tier the last event leads to. The
    /// first event and an empty history accept any tier, since the starting
    /// tier may have been configured differently when the session began.
    pub fn restore(
        id: Uuid,
        started_at: DateTime<Utc>,
        current_tier: DifficultyTier,
        history: Vec<AnswerEvent>,
        config: AssessmentConfig,
    ) -> Result<Self, AssessmentError> {
        let controller = DifficultyController::new(config.clone())?;
        let analyzer = PerformanceAnalyzer::new(config)?;
        validate_history(&history)?;
        if let Some(last) = history.last() {
            let expected = transition(last.tier_at_time, &history);
            if expected != current_tier {
                return Err(AssessmentError::UnreachableTier {
                    expected,
                    current: current_tier,
                });
            }
        }
        Ok(Self {
            id,
            started_at,
            current_tier,
            history,
            controller,
            analyzer,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn current_tier(&self) -> DifficultyTier {
        self.current_tier
    }

    pub fn history(&self) -> &[AnswerEvent] {
        &self.history
    }

    pub fn config(&self) -> &AssessmentConfig {
        self.controller.config()
    }

    /// Record an answer stamped with the wall clock.
    ///
    /// A clock that went backwards is clamped to the previous event's time so
    /// the history stays ordered.
    pub fn record_answer(&mut self, correct: bool) -> AssessmentState {
        let now = Utc::now();
        let timestamp = match self.history.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };
        self.push(timestamp, correct)
    }

    /// Record an answer with an explicit timestamp.
    pub fn record_answer_at(
        &mut self,
        correct: bool,
        timestamp: DateTime<Utc>,
    ) -> Result<AssessmentState, AssessmentError> {
        if let Some(last) = self.history.last() {
            if timestamp < last.timestamp {
                return Err(AssessmentError::NonChronological {
                    index: self.history.len(),
                    previous: last.timestamp,
                    current: timestamp,
                });
            }
        }
        Ok(self.push(timestamp, correct))
    }

    fn push(&mut self, timestamp: DateTime<Utc>, correct: bool) -> AssessmentState {
        let asked_at = self.current_tier;
        self.history.push(AnswerEvent::new(timestamp, asked_at, correct));
        self.current_tier = self.controller.next_tier(asked_at, &self.history);

        let state = self.state();
        tracing::debug!(
            session = %self.id,
            correct,
            tier = %asked_at,
            next_tier = %state.current_tier,
            score = state.score,
            questions_asked = state.questions_asked,
            "answer recorded"
        );
        state
    }

    /// Current derived state.
    pub fn state(&self) -> AssessmentState {
        AssessmentState::derive(self.current_tier, &self.history)
    }

    pub fn metrics(&self) -> PerformanceMetrics {
        self.analyzer.calculate_metrics(&self.history)
    }

    pub fn recommendations(&self) -> Vec<String> {
        self.analyzer.generate_recommendations(&self.metrics())
    }

    /// Advisory threshold check; does not change the tier.
    pub fn advice(&self) -> AdjustmentAdvice {
        self.controller.should_adjust(&self.history)
    }

    /// Snapshot everything a presentation layer needs.
    pub fn report(&self) -> AssessmentReport {
        AssessmentReport {
            session_id: self.id,
            generated_at: Utc::now(),
            started_at: self.started_at,
            state: self.state(),
            metrics: self.metrics(),
            recommendations: self.recommendations(),
            advice: self.advice(),
            progress: progress_series(&self.history),
            tiers: tier_breakdown(&self.history),
        }
    }

    /// Throw away the history and start over under a fresh id.
    pub fn restart(&mut self) {
        *self = Self::start(self.controller.clone(), self.analyzer.clone());
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<SessionRecord> for Session {
    type Error = AssessmentError;

    fn try_from(stored: SessionRecord) -> Result<Self, Self::Error> {
        Session::restore(
            stored.id,
            stored.started_at,
            stored.current_tier,
            stored.history,
            stored.config,
        )
    }
}

impl From<Session> for SessionRecord {
    fn from(session: Session) -> Self {
        SessionRecord {
            id: session.id,
            started_at: session.started_at,
            current_tier: session.current_tier,
            config: session.controller.config().clone(),
            history: session.history,
        }
    }
}

/// Check that a history could have been produced by a session: timestamps in
/// order, no tier skipped, and every event after the first asked at the tier
/// the transition rule picked from the events before it.
pub fn validate_history(history: &[AnswerEvent]) -> Result<(), AssessmentError> {
    for (i, pair) in history.windows(2).enumerate() {
        let index = i + 1;
        let (previous, current) = (&pair[0], &pair[1]);
        if current.timestamp < previous.timestamp {
            return Err(AssessmentError::NonChronological {
                index,
                previous: previous.timestamp,
                current: current.timestamp,
            });
        }
        if previous.tier_at_time.distance(current.tier_at_time) > 1 {
            return Err(AssessmentError::TierSkip {
                index,
                from: previous.tier_at_time,
                to: current.tier_at_time,
            });
        }
        let expected = transition(previous.tier_at_time, &history[..index]);
        if current.tier_at_time != expected {
            return Err(AssessmentError::TransitionMismatch {
                index,
                expected,
                found: current.tier_at_time,
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Function-call boundary for presentation layers
// ---------------------------------------------------------------------------

/// Append an answer to `session` and return the updated state.
pub fn record_answer(session: &mut Session, correct: bool) -> AssessmentState {
    session.record_answer(correct)
}

/// Read-only metrics for `session`.
pub fn get_metrics(session: &Session) -> PerformanceMetrics {
    session.metrics()
}

/// Read-only recommendations for `session`.
pub fn get_recommendations(session: &Session) -> Vec<String> {
    session.recommendations()
}
