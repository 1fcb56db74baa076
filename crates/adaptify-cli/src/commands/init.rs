//! The `adaptify init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("adaptify.toml").exists() {
        println!("adaptify.toml already exists, skipping.");
    } else {
        std::fs::write("adaptify.toml", SAMPLE_CONFIG)?;
        println!("Created adaptify.toml");
    }

    std::fs::create_dir_all("question-banks")?;
    let example_path = Path::new("question-banks/example.toml");
    if example_path.exists() {
        println!("question-banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created question-banks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Add your own questions under question-banks/");
    println!("  2. Run: adaptify validate --bank question-banks");
    println!("  3. Run: adaptify quiz");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# adaptify configuration

bank = "question-banks"
# content = "notes.txt"
max_content_chars = 4000

[assessment]
starting_tier = "intermediate"
minimum_questions = 3
metrics_window = 5
upgrade_threshold = 0.75
downgrade_threshold = 0.40
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example Bank"
description = "A small general-science bank to get started"

[[questions]]
id = "water_formula"
tier = "beginner"
kind = "concept_recall"
prompt = "What is the chemical formula for water?"
options = ["H2O", "CO2", "O2", "NaCl"]
correct_answer = "H2O"
explanation = "A water molecule has two hydrogen atoms and one oxygen atom."

[[questions]]
id = "boiling_point"
tier = "beginner"
kind = "application"
prompt = "At sea level, which temperature boils water?"
options = ["50 C", "75 C", "100 C", "150 C"]
correct_answer = "100 C"
explanation = "Water boils at 100 degrees Celsius under one atmosphere of pressure."

[[questions]]
id = "photosynthesis_output"
tier = "intermediate"
kind = "concept_recall"
prompt = "Which gas do plants release during photosynthesis?"
options = ["Nitrogen", "Oxygen", "Carbon dioxide", "Helium"]
correct_answer = "Oxygen"
explanation = "Photosynthesis splits water and releases oxygen as a by-product."

[[questions]]
id = "ice_floats"
tier = "intermediate"
kind = "application"
prompt = "Why does ice float on liquid water?"
options = [
    "Ice is less dense than liquid water",
    "Ice contains trapped air only",
    "Water pushes cold objects upward",
    "Ice has a lower mass than water",
]
correct_answer = "Ice is less dense than liquid water"
explanation = "Hydrogen bonds hold ice in an open lattice, lowering its density."

[[questions]]
id = "enzyme_temperature"
tier = "advanced"
kind = "analysis"
prompt = "An enzyme's activity drops sharply above 45 C. What best explains this?"
options = [
    "The substrate evaporates",
    "The enzyme denatures and loses its active-site shape",
    "Reaction products stop forming at high temperature",
    "The enzyme is used up faster",
]
correct_answer = "The enzyme denatures and loses its active-site shape"
explanation = "Heat disrupts the bonds that hold the protein's shape, so the active site no longer fits the substrate."

[[questions]]
id = "half_life"
tier = "advanced"
kind = "application"
prompt = "A sample has a half-life of 5 days. What fraction remains after 15 days?"
options = ["1/2", "1/4", "1/8", "1/16"]
correct_answer = "1/8"
explanation = "Fifteen days is three half-lives, and (1/2)^3 = 1/8."
"#;
