// src/catalog.rs

use crate::error::{Result, TriviaError};
use crate::models::{JsonQuestion, Question};
use crate::policy::{is_themed_topic, PoolSource};
use log::debug;

const BUILTIN_QUESTIONS: &str = include_str!("data/questions.json");
const BUILTIN_IQ_QUESTIONS: &str = include_str!("data/iq_questions.json");

/// Read-only question content: the general catalog plus the IQ bank.
#[derive(Debug, Clone, Default)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
    iq_bank: Vec<Question>,
}

impl QuestionCatalog {
    pub fn new(questions: Vec<Question>, iq_bank: Vec<Question>) -> Self {
        QuestionCatalog { questions, iq_bank }
    }

    /// The content shipped with the app.
    pub fn builtin() -> Result<Self> {
        let questions = parse_questions(BUILTIN_QUESTIONS)?;
        let iq_bank = parse_questions(BUILTIN_IQ_QUESTIONS)?;
        debug!(
            "[Catalog] Loaded {} questions and {} IQ questions",
            questions.len(),
            iq_bank.len()
        );
        Ok(QuestionCatalog { questions, iq_bank })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn iq_bank(&self) -> &[Question] {
        &self.iq_bank
    }

    pub fn pool(&self, source: PoolSource) -> Vec<&Question> {
        match source {
            PoolSource::General => self
                .questions
                .iter()
                .filter(|q| !is_themed_topic(q.topic()))
                .collect(),
            PoolSource::Themed => self
                .questions
                .iter()
                .filter(|q| is_themed_topic(q.topic()))
                .collect(),
            PoolSource::IqBank => self.iq_bank.iter().collect(),
        }
    }
}

/// Parses a JSON array of questions, validating each one.
pub fn parse_questions(json: &str) -> Result<Vec<Question>> {
    let raw: Vec<JsonQuestion> = serde_json::from_str(json)?;
    raw.into_iter()
        .map(|q| {
            let text = q.text.clone();
            Question::new(q.text, q.answers, q.correct_answer, q.difficulty, q.topic)
                .map_err(|source| TriviaError::InvalidQuestion { text, source })
        })
        .collect()
}
