//! The `adaptify replay` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use adaptify_core::{DifficultyTier, Session};
use adaptify_sources::load_config_from;

pub fn execute(
    answers: String,
    starting_tier: Option<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(tier) = starting_tier {
        config.assessment.starting_tier = tier
            .parse::<DifficultyTier>()
            .map_err(|e| anyhow::anyhow!("--starting-tier: {e}"))?;
    }

    let answers = parse_answers(&answers)?;
    anyhow::ensure!(!answers.is_empty(), "no answers given");

    let mut session = Session::with_config(config.assessment)?;
    let mut table = Table::new();
    table.set_header(vec!["#", "Level", "Result", "Score", "Next level"]);

    for (i, &correct) in answers.iter().enumerate() {
        let asked_at = session.current_tier();
        let state = session.record_answer(correct);
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(asked_at.title()),
            Cell::new(if correct { "correct" } else { "incorrect" }),
            Cell::new(format!("{}/{}", state.score, state.questions_asked)),
            Cell::new(state.current_tier.title()),
        ]);
    }

    if format == "text" {
        println!("{table}\n");
    }
    super::print_report(&session.report(), &format)
}

/// Parse a comma-separated answer list.
fn parse_answers(s: &str) -> Result<Vec<bool>> {
    s.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(|a| parse_answer(a).with_context(|| format!("invalid answer '{a}'")))
        .collect()
}

fn parse_answer(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "y" | "yes" | "c" | "correct" => Some(true),
        "0" | "f" | "false" | "n" | "no" | "x" | "incorrect" => Some(false),
        _ => None,
    }
}
