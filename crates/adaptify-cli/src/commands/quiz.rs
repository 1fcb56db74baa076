//! The `adaptify quiz` command.
//!
//! The transcript goes to stderr so stdout carries only the final report.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use adaptify_core::statistics::format_elapsed;
use adaptify_core::traits::{Question, QuestionRequest, QuestionSource};
use adaptify_core::Session;
use adaptify_sources::{load_bank, load_config_from, BankSource, SourceError};

pub async fn execute(
    bank_path: Option<PathBuf>,
    content_path: Option<PathBuf>,
    questions: u32,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(questions >= 1, "questions must be at least 1");

    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(path) = content_path {
        config.content = Some(path);
    }
    let bank_path = bank_path
        .or_else(|| config.bank.clone())
        .context("no question bank given (use --bank or set `bank` in adaptify.toml)")?;

    let bank = load_bank(&bank_path)?;
    let content = config.read_content()?;
    eprintln!(
        "adaptify v{} | {} ({} questions in bank)\n",
        env!("CARGO_PKG_VERSION"),
        bank.name,
        bank.questions.len()
    );

    let source = BankSource::new(bank);
    let mut session = Session::with_config(config.assessment.clone())?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    for n in 1..=questions {
        let request = QuestionRequest::new(
            session.current_tier(),
            content.as_deref(),
            config.max_content_chars,
        );
        let question = match source.next_question(&request).await {
            Ok(q) => q,
            Err(e) => match e.downcast_ref::<SourceError>() {
                Some(se) if !se.is_permanent() => {
                    tracing::warn!(source = source.name(), "stopping quiz early: {se}");
                    break;
                }
                _ => return Err(e),
            },
        };

        print_question(n, questions, &question);
        let started = Instant::now();
        let Some(line) = lines.next_line().await? else {
            eprintln!("\nInput closed, ending quiz.");
            break;
        };
        let answer = question.option_for(&line).unwrap_or(line.trim());
        let correct = question.is_correct(answer);
        let state = session.record_answer(correct);

        if correct {
            eprintln!("Correct! ({})", format_elapsed(started.elapsed()));
        } else {
            eprintln!(
                "Incorrect, the answer is: {} ({})",
                question.correct_answer,
                format_elapsed(started.elapsed())
            );
        }
        if !question.explanation.is_empty() {
            eprintln!("  {}", question.explanation);
        }
        if state.current_tier != request.tier {
            eprintln!("  Level is now {}", state.current_tier.title());
        }
        eprintln!();
    }

    if session.history().is_empty() {
        eprintln!("No questions answered.");
        return Ok(());
    }
    super::print_report(&session.report(), &format)
}

fn print_question(n: u32, total: u32, question: &Question) {
    eprintln!(
        "Question {n}/{total} [{} / {}]",
        question.tier.title(),
        question.kind
    );
    eprintln!("{}", question.prompt);
    let lettered = question.options.len() <= 26;
    for (i, option) in question.options.iter().enumerate() {
        eprintln!("  {}) {option}", option_label(i, lettered));
    }
    eprint!("> ");
}

/// "A".."Z" when every option fits a letter, otherwise 1-based numbers.
/// Both forms are accepted back by `Question::option_for`.
fn option_label(index: usize, lettered: bool) -> String {
    match u8::try_from(index) {
        Ok(i) if lettered && i < 26 => char::from(b'A' + i).to_string(),
        _ => (index + 1).to_string(),
    }
}
