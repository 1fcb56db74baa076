//! TOML question banks.
//!
//! Loads banks from files and directories, validates them, and serves their
//! questions through [`BankSource`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use adaptify_core::traits::{
    Question, QuestionBlueprint, QuestionKind, QuestionRequest, QuestionSource, OPTION_COUNT,
};
use adaptify_core::DifficultyTier;

use crate::error::SourceError;

/// A named collection of questions.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    /// Unique identifier for this bank.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of what the bank covers.
    pub description: String,
    /// Questions in file order.
    pub questions: Vec<Question>,
}

impl QuestionBank {
    /// Questions written for `tier`.
    pub fn for_tier(&self, tier: DifficultyTier) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(move |q| q.tier == tier)
    }

    /// Number of questions per tier, easiest first.
    pub fn tier_counts(&self) -> Vec<(DifficultyTier, usize)> {
        DifficultyTier::ALL
            .iter()
            .map(|&t| (t, self.for_tier(t).count()))
            .collect()
    }
}

/// Intermediate TOML structure for parsing bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    tier: String,
    #[serde(default = "default_kind")]
    kind: String,
    prompt: String,
    #[serde(default)]
    options: Vec<String>,
    correct_answer: String,
    #[serde(default)]
    explanation: String,
}

fn default_kind() -> String {
    "concept_recall".to_string()
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let invalid = |message: String| SourceError::InvalidQuestion {
                id: q.id.clone(),
                message,
            };
            let tier: DifficultyTier = q.tier.parse().map_err(invalid)?;
            let kind: QuestionKind = q.kind.parse().map_err(invalid)?;

            Ok(Question {
                id: Some(q.id),
                tier,
                kind,
                prompt: q.prompt,
                options: q.options,
                correct_answer: q.correct_answer,
                explanation: q.explanation,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(QuestionBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        description: parsed.bank.description,
        questions,
    })
}

/// Recursively load all `.toml` bank files from a directory.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<QuestionBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// Load a bank file, or merge every bank in a directory into one.
pub fn load_bank(path: &Path) -> Result<QuestionBank> {
    if !path.is_dir() {
        return parse_bank(path);
    }
    let banks = load_bank_directory(path)?;
    anyhow::ensure!(
        !banks.is_empty(),
        "no question banks found in {}",
        path.display()
    );
    let name = banks
        .iter()
        .map(|b| b.name.as_str())
        .collect::<Vec<_>>()
        .join(" + ");
    Ok(QuestionBank {
        id: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "merged".into()),
        name,
        description: format!("{} banks merged", banks.len()),
        questions: banks.into_iter().flat_map(|b| b.questions).collect(),
    })
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a bank for common authoring mistakes.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Duplicate question IDs
    let mut seen_ids = std::collections::HashSet::new();
    for q in &bank.questions {
        if let Some(id) = &q.id {
            if !seen_ids.insert(id) {
                warnings.push(ValidationWarning {
                    question_id: Some(id.clone()),
                    message: format!("duplicate question ID: {id}"),
                });
            }
        }
    }

    for q in &bank.questions {
        let question_id = q.id.clone();

        if q.prompt.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: question_id.clone(),
                message: "prompt is empty".into(),
            });
        }

        if q.options.len() != OPTION_COUNT {
            warnings.push(ValidationWarning {
                question_id: question_id.clone(),
                message: format!(
                    "expected {OPTION_COUNT} options, found {}",
                    q.options.len()
                ),
            });
        }

        if !q.options.iter().any(|o| q.is_correct(o)) {
            warnings.push(ValidationWarning {
                question_id: question_id.clone(),
                message: "correct_answer is not one of the options".into(),
            });
        }

        if q.explanation.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id,
                message: "explanation is empty".into(),
            });
        }
    }

    // Tiers the controller may move to but the bank cannot serve
    for (tier, count) in bank.tier_counts() {
        if count == 0 {
            warnings.push(ValidationWarning {
                question_id: None,
                message: format!("no questions for tier {tier}"),
            });
        }
    }

    warnings
}

// ---------------------------------------------------------------------------
// Bank-backed question source
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Selection {
    served: HashMap<(DifficultyTier, QuestionKind), u32>,
    cursor: HashMap<(DifficultyTier, QuestionKind), usize>,
}

/// Serves questions from a [`QuestionBank`].
///
/// Within a tier the kind is chosen so the served mix tracks the request's
/// blueprint; within a kind questions are cycled in file order. Selection is
/// deterministic.
pub struct BankSource {
    bank: QuestionBank,
    fallback: bool,
    selection: Mutex<Selection>,
}

impl BankSource {
    /// Serve from `bank`, falling back to the nearest tier with questions.
    pub fn new(bank: QuestionBank) -> Self {
        Self {
            bank,
            fallback: true,
            selection: Mutex::new(Selection::default()),
        }
    }

    /// Disable the nearest-tier fallback.
    pub fn strict(mut self) -> Self {
        self.fallback = false;
        self
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Tier to serve for `requested`, honouring the fallback setting.
    fn resolve_tier(&self, requested: DifficultyTier) -> Result<DifficultyTier, SourceError> {
        if self.bank.questions.is_empty() {
            return Err(SourceError::EmptyBank(self.bank.id.clone()));
        }
        if self.bank.for_tier(requested).next().is_some() {
            return Ok(requested);
        }
        if !self.fallback {
            return Err(SourceError::NoQuestionsForTier(requested));
        }

        // Nearest tier first; on a tie the easier one wins.
        let mut candidates: Vec<DifficultyTier> = DifficultyTier::ALL
            .into_iter()
            .filter(|&t| self.bank.for_tier(t).next().is_some())
            .collect();
        candidates.sort_by_key(|&t| (t.distance(requested), t));
        let tier = candidates
            .first()
            .copied()
            .ok_or(SourceError::NoQuestionsForTier(requested))?;
        tracing::warn!(
            bank = %self.bank.id,
            requested = %requested,
            serving = %tier,
            "no questions at requested tier, falling back"
        );
        Ok(tier)
    }

    fn pick(&self, tier: DifficultyTier, blueprint: &QuestionBlueprint) -> Question {
        let mut selection = self
            .selection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let available: Vec<QuestionKind> = QuestionKind::ALL
            .into_iter()
            .filter(|&k| self.bank.for_tier(tier).any(|q| q.kind == k))
            .collect();
        let total: u32 = available
            .iter()
            .map(|&k| selection.served.get(&(tier, k)).copied().unwrap_or(0))
            .sum();

        // Largest shortfall against the blueprint wins; ties go to ALL order.
        let mut kind = available[0];
        let mut best = f64::NEG_INFINITY;
        for &k in &available {
            let served = selection.served.get(&(tier, k)).copied().unwrap_or(0);
            let deficit = blueprint.weight(k) * f64::from(total + 1) - f64::from(served);
            if deficit > best {
                best = deficit;
                kind = k;
            }
        }

        let pool: Vec<&Question> = self
            .bank
            .for_tier(tier)
            .filter(|q| q.kind == kind)
            .collect();
        let cursor = selection.cursor.entry((tier, kind)).or_insert(0);
        let question = pool[*cursor % pool.len()].clone();
        *cursor += 1;
        *selection.served.entry((tier, kind)).or_insert(0) += 1;
        question
    }
}

#[async_trait]
impl QuestionSource for BankSource {
    fn name(&self) -> &str {
        "bank"
    }

    async fn next_question(&self, request: &QuestionRequest) -> anyhow::Result<Question> {
        let tier = self.resolve_tier(request.tier)?;
        Ok(self.pick(tier, &request.blueprint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[bank]
id = "arith"
name = "Arithmetic"
description = "Small arithmetic bank"

[[questions]]
id = "b1"
tier = "beginner"
kind = "concept_recall"
prompt = "What is 2 + 2?"
options = ["3", "4", "5", "6"]
correct_answer = "4"
explanation = "Two plus two is four."

[[questions]]
id = "b2"
tier = "beginner"
kind = "analysis"
prompt = "Which is larger, 7 x 8 or 6 x 9?"
options = ["7 x 8", "6 x 9", "equal", "cannot tell"]
correct_answer = "7 x 8"
explanation = "56 is larger than 54."

[[questions]]
id = "b3"
tier = "beginner"
prompt = "What is 10 - 3?"
options = ["6", "7", "8", "13"]
correct_answer = "7"
explanation = "Ten minus three is seven."

[[questions]]
id = "a1"
tier = "advanced"
kind = "application"
prompt = "A train travels 120 km in 1.5 h. Average speed?"
options = ["60 km/h", "80 km/h", "90 km/h", "180 km/h"]
correct_answer = "80 km/h"
explanation = "120 / 1.5 = 80."
"#;

    fn bank() -> QuestionBank {
        parse_bank_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap()
    }

    #[test]
    fn parse_valid_toml() {
        let bank = bank();
        assert_eq!(bank.id, "arith");
        assert_eq!(bank.questions.len(), 4);
        assert_eq!(bank.questions[0].tier, DifficultyTier::Beginner);
        assert_eq!(bank.questions[1].kind, QuestionKind::Analysis);
        // kind defaults to concept recall
        assert_eq!(bank.questions[2].kind, QuestionKind::ConceptRecall);
        assert_eq!(
            bank.tier_counts(),
            vec![
                (DifficultyTier::Beginner, 3),
                (DifficultyTier::Intermediate, 0),
                (DifficultyTier::Advanced, 1),
            ]
        );
    }

    #[test]
    fn parse_unknown_tier_fails() {
        let toml = r#"
[bank]
id = "bad"
name = "Bad"

[[questions]]
id = "q"
tier = "expert"
prompt = "?"
correct_answer = "x"
"#;
        let err = parse_bank_str(toml, &PathBuf::from("bad.toml")).unwrap_err();
        assert!(err.to_string().contains("unknown difficulty tier"));
        let source_err = err.downcast_ref::<SourceError>().unwrap();
        assert!(matches!(source_err, SourceError::InvalidQuestion { id, .. } if id == "q"));
        assert!(source_err.is_permanent());
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_bank_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn validate_reports_authoring_mistakes() {
        let toml = r#"
[bank]
id = "sloppy"
name = "Sloppy"

[[questions]]
id = "same"
tier = "beginner"
prompt = "Pick one"
options = ["a", "b"]
correct_answer = "c"

[[questions]]
id = "same"
tier = "beginner"
prompt = "  "
options = ["a", "b", "c", "d"]
correct_answer = "a"
explanation = "because"
"#;
        let bank = parse_bank_str(toml, &PathBuf::from("sloppy.toml")).unwrap();
        let warnings = validate_bank(&bank);
        let has = |needle: &str| warnings.iter().any(|w| w.message.contains(needle));
        assert!(has("duplicate question ID"));
        assert!(has("expected 4 options, found 2"));
        assert!(has("not one of the options"));
        assert!(has("prompt is empty"));
        assert!(has("explanation is empty"));
        assert!(has("no questions for tier intermediate"));
        assert!(has("no questions for tier advanced"));
    }

    #[test]
    fn valid_bank_only_warns_about_missing_tier() {
        let warnings = validate_bank(&bank());
        assert_eq!(warnings.len(), 1, "{warnings:?}");
        assert!(warnings[0].message.contains("intermediate"));
    }

    #[test]
    fn load_directory_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "not [valid").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let banks = load_bank_directory(dir.path()).unwrap();
        assert_eq!(banks.len(), 1);
        assert_eq!(banks[0].id, "arith");

        let merged = load_bank(dir.path()).unwrap();
        assert_eq!(merged.questions.len(), 4);
    }

    #[tokio::test]
    async fn serves_requested_tier_following_blueprint() {
        let source = BankSource::new(bank());
        let request = QuestionRequest::new(DifficultyTier::Beginner, None, 4000);

        let mut recall = 0;
        let mut analysis = 0;
        for _ in 0..10 {
            let q = source.next_question(&request).await.unwrap();
            assert_eq!(q.tier, DifficultyTier::Beginner);
            match q.kind {
                QuestionKind::ConceptRecall => recall += 1,
                QuestionKind::Analysis => analysis += 1,
                QuestionKind::Application => unreachable!("no application questions"),
            }
        }
        assert_eq!(recall, 8);
        assert_eq!(analysis, 2);
    }

    #[tokio::test]
    async fn cycles_within_kind() {
        let source = BankSource::new(bank());
        let request = QuestionRequest::new(DifficultyTier::Beginner, None, 4000);
        let first = source.next_question(&request).await.unwrap();
        let second = source.next_question(&request).await.unwrap();
        assert_eq!(first.id.as_deref(), Some("b1"));
        assert_eq!(second.id.as_deref(), Some("b3"));
    }

    #[tokio::test]
    async fn falls_back_to_nearest_easier_tier() {
        let source = BankSource::new(bank());
        let request = QuestionRequest::new(DifficultyTier::Intermediate, None, 4000);
        let q = source.next_question(&request).await.unwrap();
        assert_eq!(q.tier, DifficultyTier::Beginner);
    }

    #[tokio::test]
    async fn strict_source_reports_missing_tier() {
        let source = BankSource::new(bank()).strict();
        let request = QuestionRequest::new(DifficultyTier::Intermediate, None, 4000);
        let err = source.next_question(&request).await.unwrap_err();
        let source_err = err.downcast_ref::<SourceError>().unwrap();
        assert!(matches!(
            source_err,
            SourceError::NoQuestionsForTier(DifficultyTier::Intermediate)
        ));
        assert!(!source_err.is_permanent());
    }

    #[tokio::test]
    async fn empty_bank_is_permanent_error() {
        let source = BankSource::new(QuestionBank {
            id: "empty".into(),
            name: "Empty".into(),
            description: String::new(),
            questions: vec![],
        });
        let request = QuestionRequest::new(DifficultyTier::Beginner, None, 4000);
        let err = source.next_question(&request).await.unwrap_err();
        assert!(err.downcast_ref::<SourceError>().unwrap().is_permanent());
    }
}
