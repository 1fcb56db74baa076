//! Seams to external collaborators.
//!
//! The core never talks to a document parser, a language model, or a chart
//! library directly. Question generation comes in through [`QuestionSource`]
//! and report output goes out through [`ReportRenderer`].

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::DifficultyTier;
use crate::report::AssessmentReport;

// ---------------------------------------------------------------------------
// Question source trait
// ---------------------------------------------------------------------------

/// Anything that can hand out a question for a tier: a local bank, a
/// language-model client, a human author.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Human-readable source name (e.g. "bank").
    fn name(&self) -> &str;

    /// Produce the next question for the requested tier.
    async fn next_question(&self, request: &QuestionRequest) -> anyhow::Result<Question>;
}

/// Request for one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRequest {
    /// Tier the question should target.
    pub tier: DifficultyTier,
    /// Mix of question kinds for this tier.
    pub blueprint: QuestionBlueprint,
    /// Source material, already truncated. Opaque to the core.
    #[serde(default)]
    pub content: Option<String>,
}

impl QuestionRequest {
    /// Build a request for `tier`, truncating `content` to `max_chars`
    /// characters.
    pub fn new(tier: DifficultyTier, content: Option<&str>, max_chars: usize) -> Self {
        Self {
            tier,
            blueprint: QuestionBlueprint::for_tier(tier),
            content: content.map(|c| truncate_chars(c, max_chars)),
        }
    }
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Kind of thinking a question asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    ConceptRecall,
    Application,
    Analysis,
}

impl QuestionKind {
    pub const ALL: [QuestionKind; 3] = [
        QuestionKind::ConceptRecall,
        QuestionKind::Application,
        QuestionKind::Analysis,
    ];
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::ConceptRecall => write!(f, "concept_recall"),
            QuestionKind::Application => write!(f, "application"),
            QuestionKind::Analysis => write!(f, "analysis"),
        }
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "concept_recall" | "recall" => Ok(QuestionKind::ConceptRecall),
            "application" => Ok(QuestionKind::Application),
            "analysis" | "synthesis" => Ok(QuestionKind::Analysis),
            other => Err(format!("unknown question kind: {other}")),
        }
    }
}

/// Share of each question kind at a tier. Weights sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuestionBlueprint {
    pub concept_recall: f64,
    pub application: f64,
    pub analysis: f64,
}

impl QuestionBlueprint {
    /// Stock mix: easy tiers lean on recall, hard tiers on analysis.
    pub fn for_tier(tier: DifficultyTier) -> Self {
        match tier {
            DifficultyTier::Beginner => Self {
                concept_recall: 0.7,
                application: 0.2,
                analysis: 0.1,
            },
            DifficultyTier::Intermediate => Self {
                concept_recall: 0.3,
                application: 0.5,
                analysis: 0.2,
            },
            DifficultyTier::Advanced => Self {
                concept_recall: 0.1,
                application: 0.4,
                analysis: 0.5,
            },
        }
    }

    pub fn weight(&self, kind: QuestionKind) -> f64 {
        match kind {
            QuestionKind::ConceptRecall => self.concept_recall,
            QuestionKind::Application => self.application,
            QuestionKind::Analysis => self.analysis,
        }
    }
}

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier, if the source has one.
    #[serde(default)]
    pub id: Option<String>,
    /// Tier the question was written for.
    pub tier: DifficultyTier,
    /// What the question exercises.
    pub kind: QuestionKind,
    /// The question text.
    pub prompt: String,
    /// Answer options, normally four.
    pub options: Vec<String>,
    /// The option text that is correct.
    pub correct_answer: String,
    /// Shown after answering, right or wrong.
    #[serde(default)]
    pub explanation: String,
}

/// Number of options a well-formed question offers.
pub const OPTION_COUNT: usize = 4;

impl Question {
    /// Whether `answer` is exactly the correct option. Only surrounding
    /// whitespace is ignored; options may differ by case alone.
    pub fn is_correct(&self, answer: &str) -> bool {
        answer.trim() == self.correct_answer.trim()
    }

    /// Resolve a 1-based option number or an option letter ("b") to its text.
    pub fn option_for(&self, choice: &str) -> Option<&str> {
        let choice = choice.trim();
        let index = if let Ok(n) = choice.parse::<usize>() {
            n.checked_sub(1)?
        } else {
            let mut chars = choice.chars();
            let c = chars.next()?.to_ascii_lowercase();
            if chars.next().is_some() || !c.is_ascii_lowercase() {
                return None;
            }
            (c as u8 - b'a') as usize
        };
        self.options.get(index).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Report renderer trait
// ---------------------------------------------------------------------------

/// Turns a report into text for some presentation layer.
pub trait ReportRenderer {
    /// Short format name (e.g. "markdown").
    fn format(&self) -> &str;

    /// Render the report.
    fn render(&self, report: &AssessmentReport) -> anyhow::Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> Question {
        Question {
            id: Some("q1".into()),
            tier: DifficultyTier::Beginner,
            kind: QuestionKind::ConceptRecall,
            prompt: "What is 2 + 2?".into(),
            options: vec!["3".into(), "4".into(), "5".into(), "22".into()],
            correct_answer: "4".into(),
            explanation: "Basic addition.".into(),
        }
    }

    #[test]
    fn blueprints_sum_to_one() {
        for tier in DifficultyTier::ALL {
            let bp = QuestionBlueprint::for_tier(tier);
            let total: f64 = QuestionKind::ALL.iter().map(|&k| bp.weight(k)).sum();
            assert!((total - 1.0).abs() < 1e-9, "{tier}: {total}");
        }
        let advanced = QuestionBlueprint::for_tier(DifficultyTier::Advanced);
        assert_eq!(advanced.weight(QuestionKind::Analysis), 0.5);
    }

    #[test]
    fn kind_parse_and_display() {
        assert_eq!(
            "concept-recall".parse::<QuestionKind>().unwrap(),
            QuestionKind::ConceptRecall
        );
        assert_eq!(
            "Analysis".parse::<QuestionKind>().unwrap(),
            QuestionKind::Analysis
        );
        assert!("trivia".parse::<QuestionKind>().is_err());
        assert_eq!(QuestionKind::Application.to_string(), "application");
    }

    #[test]
    fn request_truncates_content_on_char_boundary() {
        let req = QuestionRequest::new(DifficultyTier::Advanced, Some("héllo world"), 4);
        assert_eq!(req.content.as_deref(), Some("héll"));
        assert_eq!(req.blueprint, QuestionBlueprint::for_tier(DifficultyTier::Advanced));

        let req = QuestionRequest::new(DifficultyTier::Beginner, Some("short"), 4000);
        assert_eq!(req.content.as_deref(), Some("short"));
        assert!(QuestionRequest::new(DifficultyTier::Beginner, None, 10)
            .content
            .is_none());
    }

    #[test]
    fn answer_checking() {
        let q = question();
        assert!(q.is_correct("4"));
        assert!(q.is_correct(" 4 "));
        assert!(!q.is_correct("22"));

        let formula = Question {
            options: vec!["NaCl".into(), "NACL".into(), "KCl".into(), "HCl".into()],
            correct_answer: "NaCl".into(),
            ..question()
        };
        assert!(formula.is_correct("NaCl"));
        assert!(!formula.is_correct("NACL"));
        assert!(!formula.is_correct("nacl"));
    }

    #[test]
    fn option_lookup_by_number_and_letter() {
        let q = question();
        assert_eq!(q.option_for("2"), Some("4"));
        assert_eq!(q.option_for("B"), Some("4"));
        assert_eq!(q.option_for("d"), Some("22"));
        assert_eq!(q.option_for("0"), None);
        assert_eq!(q.option_for("e"), None);
        assert_eq!(q.option_for("ab"), None);
        assert_eq!(q.option_for(""), None);
    }
}
