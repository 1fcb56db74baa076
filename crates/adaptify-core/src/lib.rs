//! adaptify-core: Difficulty controller, performance analytics, and sessions.
//!
//! This crate holds all decision logic: the tier transition rule, the rolling
//! metrics and recommendations, and the `Session` that ties them together.
//! It performs no I/O.

pub mod analyzer;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod report;
pub mod session;
pub mod statistics;
pub mod traits;

pub use analyzer::PerformanceAnalyzer;
pub use config::AssessmentConfig;
pub use controller::{AdjustmentAdvice, AdjustmentReason, DifficultyController};
pub use error::AssessmentError;
pub use model::{AnswerEvent, AssessmentState, DifficultyTier, PerformanceMetrics};
pub use session::{get_metrics, get_recommendations, record_answer, Session};
