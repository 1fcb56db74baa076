//! Mock question source for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use adaptify_core::traits::{Question, QuestionKind, QuestionRequest, QuestionSource};

/// A mock source for exercising sessions without a bank.
///
/// Returns the same question every time, re-tagged with the requested tier.
pub struct MockQuestionSource {
    question: Question,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<QuestionRequest>>,
}

impl MockQuestionSource {
    /// Create a mock that always returns `question`.
    pub fn with_fixed_question(question: Question) -> Self {
        Self {
            question,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock with a trivial placeholder question whose answer is "yes".
    pub fn placeholder() -> Self {
        Self::with_fixed_question(Question {
            id: Some("placeholder".into()),
            tier: Default::default(),
            kind: QuestionKind::ConceptRecall,
            prompt: "Is this a placeholder question?".into(),
            options: vec!["yes".into(), "no".into(), "maybe".into(), "unsure".into()],
            correct_answer: "yes".into(),
            explanation: "It is.".into(),
        })
    }

    /// Get the number of calls made to this source.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this source.
    pub fn last_request(&self) -> Option<QuestionRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl QuestionSource for MockQuestionSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn next_question(&self, request: &QuestionRequest) -> anyhow::Result<Question> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(request.clone());

        Ok(Question {
            tier: request.tier,
            ..self.question.clone()
        })
    }
}
