//! Question bank loading and validation
//!
//! The bank is parsed in two steps: first into a loose form where option
//! languages are plain strings, then validated into [`Question`]s. An unknown
//! language is reported once, with the offending question id, instead of being
//! skipped silently while scoring.

use crate::error::{Error, Result};
use crate::types::{Category, Context, Question, QuestionKind, QuestionOption};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

const BUNDLED_QUESTIONNAIRE: &str = include_str!("../data/questionnaire.json");

#[derive(Debug, Deserialize)]
struct RawBank {
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    id: u32,
    text: String,
    #[serde(default)]
    category: Option<QuestionKind>,
    context: Context,
    options: Vec<RawOption>,
}

#[derive(Debug, Deserialize)]
struct RawOption {
    text: String,
    language: String,
    weight: u32,
}

impl RawQuestion {
    fn into_question(self) -> Result<Question> {
        let id = self.id;
        let options = self
            .options
            .into_iter()
            .enumerate()
            .map(|(i, opt)| {
                let language = opt.language.parse::<Category>().map_err(|_| {
                    Error::QuestionBank(format!(
                        "question {} option {} has unknown language {:?}",
                        id,
                        i + 1,
                        opt.language
                    ))
                })?;
                Ok(QuestionOption {
                    text: opt.text,
                    language,
                    weight: opt.weight,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Question {
            id,
            text: self.text,
            kind: self.category,
            context: self.context,
            options,
        })
    }
}

/// The ordered list of questions for a session.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Parse and validate a question bank document (`{"questions": [...]}`).
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawBank = serde_json::from_str(json)
            .map_err(|e| Error::QuestionBank(format!("failed to parse: {}", e)))?;

        let questions = raw
            .questions
            .into_iter()
            .map(RawQuestion::into_question)
            .collect::<Result<Vec<_>>>()?;

        Self::new(questions)
    }

    /// Build a bank from already-typed questions, validating structure.
    pub fn new(questions: Vec<Question>) -> Result<Self> {
        validate_questions(&questions)?;
        Ok(Self { questions })
    }

    /// Load a question bank from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let bank = Self::from_json(&json)?;
        tracing::debug!(
            path = %path.display(),
            questions = bank.len(),
            "Loaded question bank"
        );
        Ok(bank)
    }

    /// The bank shipped with the library.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_QUESTIONNAIRE)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// A copy of the questions in a fresh random order.
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Question> {
        let mut questions = self.questions.clone();
        shuffle(&mut questions, rng);
        questions
    }

    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }
}

/// Uniform in-place shuffle (Fisher–Yates).
pub fn shuffle<R: Rng + ?Sized>(questions: &mut [Question], rng: &mut R) {
    questions.shuffle(rng);
}

/// Structural checks shared by the bank loader and snapshot import:
/// at least one question, unique ids, and no question without options.
pub fn validate_questions(questions: &[Question]) -> Result<()> {
    if questions.is_empty() {
        return Err(Error::QuestionBank("no questions".to_string()));
    }

    let mut seen = HashSet::new();
    for question in questions {
        if !seen.insert(question.id) {
            return Err(Error::QuestionBank(format!(
                "duplicate question id {}",
                question.id
            )));
        }
        if question.options.is_empty() {
            return Err(Error::QuestionBank(format!(
                "question {} has no options",
                question.id
            )));
        }
    }

    Ok(())
}
