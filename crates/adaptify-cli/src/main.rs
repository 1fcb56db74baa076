//! adaptify CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "adaptify", version, about = "Adaptive assessment engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a sequence of answers and print the resulting assessment
    Replay {
        /// Answers in order, comma-separated (1/0, t/f, y/n, correct/incorrect)
        #[arg(long)]
        answers: String,

        /// Override the configured starting level
        #[arg(long)]
        starting_tier: Option<String>,

        /// Output format: text, markdown, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run an interactive quiz from a question bank
    Quiz {
        /// Question bank file or directory (defaults to `bank` in config)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Study material forwarded with each question request
        #[arg(long)]
        content: Option<PathBuf>,

        /// Number of questions to ask
        #[arg(long, default_value = "10")]
        questions: u32,

        /// Report format printed at the end: text, markdown, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to a bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// Create starter config and example question bank
    Init,
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("adaptify=info,adaptify_core=info,adaptify_sources=info")
    });
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Replay {
            answers,
            starting_tier,
            format,
            config,
        } => commands::replay::execute(answers, starting_tier, format, config),
        Commands::Quiz {
            bank,
            content,
            questions,
            format,
            config,
        } => commands::quiz::execute(bank, content, questions, format, config).await,
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
