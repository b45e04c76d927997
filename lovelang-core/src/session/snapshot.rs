//! Session snapshots and portable `.love` save files
//!
//! A snapshot holds everything needed to continue an assessment elsewhere:
//! the question order, recorded answers and current position. The JSON shape
//! is shared by the persisted auto-save and by save files.

use crate::bank::validate_questions;
use crate::error::{Error, Result};
use crate::types::{AnswerSet, Question};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Repository key for the auto-saved session.
pub const SNAPSHOT_KEY: &str = "love-language-progress";

/// Extension of portable save files (without the dot).
pub const SAVE_FILE_EXTENSION: &str = "love";

/// Name given to snapshots written by auto-save.
pub const AUTOSAVE_NAME: &str = "Auto-save";

/// Resumable state of an in-progress assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// Label chosen on save, or [`AUTOSAVE_NAME`]
    pub name: String,
    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,
    /// Position of the question being answered
    pub current_question_index: usize,
    /// One slot per entry in `questions`
    pub answers: AnswerSet,
    /// Full question list in presentation order
    pub questions: Vec<Question>,
}

impl SessionSnapshot {
    /// Parse and validate a snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: SessionSnapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that answers and position fit the question list.
    pub fn validate(&self) -> Result<()> {
        validate_questions(&self.questions)?;

        if self.answers.len() != self.questions.len() {
            return Err(Error::InvalidAnswer(format!(
                "{} answers for {} questions",
                self.answers.len(),
                self.questions.len()
            )));
        }
        if self.current_question_index >= self.questions.len() {
            return Err(Error::InvalidAnswer(format!(
                "position {} out of range for {} questions",
                self.current_question_index,
                self.questions.len()
            )));
        }
        for (question, answer) in self.questions.iter().zip(self.answers.iter()) {
            if let Some(index) = answer {
                if index >= question.options.len() {
                    return Err(Error::InvalidAnswer(format!(
                        "option {} out of range for question {}",
                        index, question.id
                    )));
                }
            }
        }

        Ok(())
    }

    /// Time since the snapshot was taken.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.timestamp)
    }

    /// Whether the snapshot is younger than `window`.
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.age(now) < window
    }

    /// Fraction of answered questions, 0.0..=1.0.
    pub fn completion(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        self.answers.answered_count() as f64 / self.questions.len() as f64
    }
}

/// File name for a save: non-alphanumerics become `_`, lowercased, `.love` appended.
pub fn save_file_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidSaveFile(
            "a name is required to save progress".to_string(),
        ));
    }

    let stem: String = trimmed
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    Ok(format!("{}.{}", stem, SAVE_FILE_EXTENSION))
}

/// Write `snapshot` into `dir` as a pretty-printed `.love` file.
///
/// The content goes to a temporary file in `dir` first and is renamed into
/// place, so an existing save is never left half-written.
pub fn write_save_file(dir: &Path, snapshot: &SessionSnapshot) -> Result<PathBuf> {
    let path = dir.join(save_file_name(&snapshot.name)?);
    let json = snapshot.to_json_pretty()?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.flush()?;
    tmp.persist(&path).map_err(|e| Error::Io(e.error))?;

    tracing::info!(path = %path.display(), "Wrote save file");
    Ok(path)
}

/// Read a `.love` file.
///
/// The extension is checked before the file is opened; content that does not
/// parse or does not validate is rejected as [`Error::InvalidSaveFile`].
pub fn read_save_file(path: &Path) -> Result<SessionSnapshot> {
    let has_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == SAVE_FILE_EXTENSION);
    if !has_extension {
        return Err(Error::InvalidSaveFile(format!(
            "{} is not a .{} file",
            path.display(),
            SAVE_FILE_EXTENSION
        )));
    }

    let content = std::fs::read_to_string(path)?;
    SessionSnapshot::from_json(&content).map_err(|e| {
        Error::InvalidSaveFile(format!("{} could not be loaded: {}", path.display(), e))
    })
}
