//! Markdown report renderer.

use anyhow::Result;

use adaptify_core::report::AssessmentReport;
use adaptify_core::traits::ReportRenderer;

/// Renders a report as GitHub-flavoured Markdown.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    /// Include the per-question progress table.
    pub include_progress: bool,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self {
            include_progress: true,
        }
    }
}

/// Keep free text on one line and out of table syntax.
fn md_escape(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

fn pct(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Generate a Markdown document from an assessment report.
pub fn generate_markdown(report: &AssessmentReport, include_progress: bool) -> String {
    let mut md = String::new();

    md.push_str("# Assessment report\n\n");
    md.push_str(&format!(
        "Session `{}` | started {} | generated {}\n\n",
        report.session_id,
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
    ));

    // Summary
    md.push_str("## Summary\n\n");
    md.push_str("| Metric | Value |\n|---|---|\n");
    md.push_str(&format!(
        "| Current level | {} |\n",
        report.state.current_tier.title()
    ));
    md.push_str(&format!(
        "| Score | {}/{} |\n",
        report.state.score, report.state.questions_asked
    ));
    md.push_str(&format!(
        "| Overall accuracy | {} |\n",
        pct(report.state.running_accuracy)
    ));
    md.push_str(&format!(
        "| Recent accuracy | {} |\n",
        pct(report.metrics.accuracy)
    ));
    md.push_str(&format!("| Streak | {} |\n", report.metrics.streak));
    md.push_str(&format!(
        "| Level appropriate | {} |\n",
        if report.metrics.level_appropriate {
            "yes"
        } else {
            "no"
        }
    ));
    md.push_str(&format!(
        "| Adjustment advice | {} |\n",
        report.advice.reason
    ));
    if let Some(peak) = report.peak_tier() {
        md.push_str(&format!("| Peak level | {} |\n", peak.title()));
    }
    md.push('\n');

    // Recommendations
    md.push_str("## Recommendations\n\n");
    for rec in &report.recommendations {
        md.push_str(&format!("- {}\n", md_escape(rec)));
    }
    md.push('\n');

    // Per-tier breakdown
    md.push_str("## By level\n\n");
    md.push_str("| Level | Asked | Correct | Accuracy |\n|---|---|---|---|\n");
    for t in &report.tiers {
        let accuracy = if t.asked == 0 {
            "-".to_string()
        } else {
            pct(t.accuracy)
        };
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            t.tier.title(),
            t.asked,
            t.correct,
            accuracy
        ));
    }

    if include_progress && !report.progress.is_empty() {
        md.push_str("\n## Progress\n\n");
        md.push_str("| # | Level | Result | Accuracy |\n|---|---|---|---|\n");
        for p in &report.progress {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                p.question_number,
                p.tier.title(),
                if p.correct { "correct" } else { "incorrect" },
                pct(p.accuracy)
            ));
        }
    }

    md
}

impl ReportRenderer for MarkdownRenderer {
    fn format(&self) -> &str {
        "markdown"
    }

    fn render(&self, report: &AssessmentReport) -> Result<String> {
        Ok(generate_markdown(report, self.include_progress))
    }
}
