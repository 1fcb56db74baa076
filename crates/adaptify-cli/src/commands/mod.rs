pub mod init;
pub mod quiz;
pub mod replay;
pub mod validate;

use anyhow::Result;
use comfy_table::{Cell, Table};

use adaptify_core::report::AssessmentReport;

/// Print `report` to stdout in the requested format.
pub fn print_report(report: &AssessmentReport, format: &str) -> Result<()> {
    if format == "text" {
        print_summary(report);
        return Ok(());
    }
    let renderer = adaptify_report::renderer_for(format)
        .ok_or_else(|| anyhow::anyhow!("unknown format '{format}' (text, markdown, json)"))?;
    println!("{}", renderer.render(report)?);
    Ok(())
}

fn print_summary(report: &AssessmentReport) {
    let mut table = Table::new();
    table.set_header(vec!["Level", "Asked", "Correct", "Accuracy"]);
    for t in &report.tiers {
        let accuracy = if t.asked == 0 {
            "-".to_string()
        } else {
            format!("{:.1}%", t.accuracy * 100.0)
        };
        table.add_row(vec![
            Cell::new(t.tier.title()),
            Cell::new(t.asked),
            Cell::new(t.correct),
            Cell::new(accuracy),
        ]);
    }

    println!("{}", report.summary_line());
    println!(
        "Recent accuracy {:.1}%, streak {}, {}",
        report.metrics.accuracy * 100.0,
        report.metrics.streak,
        if report.metrics.level_appropriate {
            "level appropriate"
        } else {
            "level needs adjusting"
        }
    );
    println!("Adjustment advice: {}", report.advice.reason);
    println!("\n{table}");
    println!("\nRecommendations:");
    for rec in &report.recommendations {
        println!("  - {rec}");
    }
}
