//! JSON report output.
//!
//! Two shapes: the full serialized report, or a compact summary document for
//! dashboards that only need the headline numbers.

use anyhow::{Context, Result};
use serde_json::json;

use adaptify_core::report::AssessmentReport;
use adaptify_core::traits::ReportRenderer;

/// Renders a report as pretty-printed JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonRenderer {
    /// Emit only the summary document.
    pub compact: bool,
}

/// Build the compact summary document.
pub fn generate_summary(report: &AssessmentReport) -> serde_json::Value {
    json!({
        "session_id": report.session_id,
        "generated_at": report.generated_at.to_rfc3339(),
        "level": report.state.current_tier,
        "score": report.state.score,
        "questions_asked": report.state.questions_asked,
        "running_accuracy": report.state.running_accuracy,
        "recent_accuracy": report.metrics.accuracy,
        "streak": report.metrics.streak,
        "level_appropriate": report.metrics.level_appropriate,
        "advice": {
            "adjust": report.advice.adjust,
            "reason": report.advice.reason.as_str(),
        },
        "recommendations": report.recommendations,
    })
}

impl ReportRenderer for JsonRenderer {
    fn format(&self) -> &str {
        "json"
    }

    fn render(&self, report: &AssessmentReport) -> Result<String> {
        let out = if self.compact {
            serde_json::to_string_pretty(&generate_summary(report))
        } else {
            serde_json::to_string_pretty(report)
        };
        out.context("failed to serialize report")
    }
}
