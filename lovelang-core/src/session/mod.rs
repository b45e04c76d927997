//! Session controller
//!
//! Drives one assessment through `Intro -> Questions -> Results`. The
//! controller owns the question order, recorded answers and position, and
//! writes a snapshot through the injected [`SessionRepository`] after every
//! change while questions are being answered.
//!
//! Persistence is best-effort: a failing repository is logged and the state
//! transition goes ahead regardless.

mod snapshot;

pub use snapshot::{
    read_save_file, save_file_name, write_save_file, SessionSnapshot, AUTOSAVE_NAME,
    SAVE_FILE_EXTENSION, SNAPSHOT_KEY,
};

use crate::bank::{self, QuestionBank};
use crate::error::{Error, Result};
use crate::scoring::{compute_scores, Scores};
use crate::store::SessionRepository;
use crate::types::{AnswerSet, Question};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};

/// Which screen the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Intro,
    Questions,
    Results,
}

/// Result of [`SessionController::answer_and_advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved on to the next question
    Next,
    /// That was the last question; scores are ready
    Completed,
}

/// What [`SessionController::resume`] found in the repository.
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeOutcome {
    /// Nothing stored
    NoSnapshot,
    /// Stored content could not be read or did not validate
    Unreadable,
    /// Stored snapshot is older than the resume window
    Stale { saved_at: DateTime<Utc> },
    /// State restored; `screen` is `Questions` only when `position > 0`
    Restored {
        saved_at: DateTime<Utc>,
        position: usize,
        screen: Screen,
    },
}

/// Single owner of an assessment's mutable state.
pub struct SessionController<S: SessionRepository, R: Rng = StdRng> {
    store: S,
    rng: R,
    questions: Vec<Question>,
    answers: AnswerSet,
    position: usize,
    screen: Screen,
    scores: Option<Scores>,
}

impl<S: SessionRepository> SessionController<S, StdRng> {
    /// Start a session with a freshly shuffled copy of `bank`.
    pub fn new(bank: &QuestionBank, store: S) -> Self {
        Self::with_rng(bank, store, StdRng::from_entropy())
    }
}

impl<S: SessionRepository, R: Rng> SessionController<S, R> {
    /// Start a session using `rng` for every shuffle.
    pub fn with_rng(bank: &QuestionBank, store: S, mut rng: R) -> Self {
        let questions = bank.shuffled(&mut rng);
        let answers = AnswerSet::new(questions.len());
        Self {
            store,
            rng,
            questions,
            answers,
            position: 0,
            screen: Screen::Intro,
            scores: None,
        }
    }

    // ============================================
    // Accessors
    // ============================================

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.position)
    }

    /// Answer previously recorded at the current position.
    pub fn selected_answer(&self) -> Option<usize> {
        self.answers.get(self.position)
    }

    pub fn is_last_question(&self) -> bool {
        self.position + 1 == self.questions.len()
    }

    pub fn can_retreat(&self) -> bool {
        self.screen == Screen::Questions && self.position > 0
    }

    /// `(position + 1) / count` as a percentage.
    pub fn progress_percent(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        (self.position + 1) as f64 / self.questions.len() as f64 * 100.0
    }

    /// Scores of the completed assessment.
    pub fn scores(&self) -> Option<&Scores> {
        self.scores.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ============================================
    // Transitions
    // ============================================

    /// Restore a persisted snapshot younger than `window`.
    ///
    /// Meant to be called once, right after construction. Unreadable or stale
    /// snapshots are left alone and the fresh session proceeds.
    pub fn resume(&mut self, now: DateTime<Utc>, window: Duration) -> ResumeOutcome {
        let snapshot = match self.store.load() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return ResumeOutcome::NoSnapshot,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable session snapshot");
                return ResumeOutcome::Unreadable;
            }
        };

        if !snapshot.is_fresh(now, window) {
            tracing::info!(
                saved_at = %snapshot.timestamp,
                "Ignoring stale session snapshot"
            );
            return ResumeOutcome::Stale {
                saved_at: snapshot.timestamp,
            };
        }

        let saved_at = snapshot.timestamp;
        self.load_snapshot(snapshot);
        if self.position > 0 {
            self.screen = Screen::Questions;
            // Restart the freshness window from this visit
            self.persist();
        }

        tracing::info!(
            position = self.position,
            answered = self.answers.answered_count(),
            "Resumed session"
        );

        ResumeOutcome::Restored {
            saved_at,
            position: self.position,
            screen: self.screen,
        }
    }

    /// Leave the intro and show the first (or restored) question.
    pub fn start(&mut self) -> Result<()> {
        if self.screen != Screen::Intro {
            return Err(Error::InvalidState(format!(
                "cannot start from {:?}",
                self.screen
            )));
        }
        self.screen = Screen::Questions;
        self.persist();
        Ok(())
    }

    /// Record `option` for the current question and move on.
    ///
    /// On the last question this computes scores, switches to `Results` and
    /// clears the persisted snapshot. An out-of-range option changes nothing.
    pub fn answer_and_advance(&mut self, option: usize) -> Result<Advance> {
        self.require_questions("answer")?;

        let question = self
            .current_question()
            .ok_or_else(|| Error::InvalidState("no current question".to_string()))?;
        if option >= question.options.len() {
            return Err(Error::InvalidAnswer(format!(
                "option {} out of range for question {} ({} options)",
                option + 1,
                question.id,
                question.options.len()
            )));
        }

        self.answers.record(self.position, option);

        if !self.is_last_question() {
            self.position += 1;
            self.persist();
            return Ok(Advance::Next);
        }

        let scores = compute_scores(&self.questions, &self.answers)?;
        self.scores = Some(scores);
        self.screen = Screen::Results;
        self.clear_persisted();

        tracing::info!(
            primary_receiving = %scores.primary(crate::types::Context::Receiving),
            primary_giving = %scores.primary(crate::types::Context::Giving),
            "Assessment completed"
        );

        Ok(Advance::Completed)
    }

    /// Step back one question, keeping recorded answers.
    ///
    /// Returns `false` when already at the first question.
    pub fn retreat(&mut self) -> Result<bool> {
        self.require_questions("go back")?;
        if self.position == 0 {
            return Ok(false);
        }
        self.position -= 1;
        self.persist();
        Ok(true)
    }

    /// Back to the intro with no answers and a new question order.
    pub fn restart(&mut self) {
        bank::shuffle(&mut self.questions, &mut self.rng);
        self.answers = AnswerSet::new(self.questions.len());
        self.position = 0;
        self.scores = None;
        self.screen = Screen::Intro;
        self.clear_persisted();
        tracing::info!("Session restarted");
    }

    /// Snapshot of the current state.
    pub fn snapshot(&self, name: &str, now: DateTime<Utc>) -> SessionSnapshot {
        SessionSnapshot {
            name: name.to_string(),
            timestamp: now,
            current_question_index: self.position,
            answers: self.answers.clone(),
            questions: self.questions.clone(),
        }
    }

    /// Write a `.love` save file into `dir` and refresh the persisted snapshot.
    pub fn save_to(&self, dir: &Path, name: &str) -> Result<PathBuf> {
        self.require_questions("save")?;
        let snapshot = self.snapshot(name, Utc::now());
        let path = write_save_file(dir, &snapshot)?;
        if let Err(e) = self.store.save(&snapshot) {
            tracing::warn!(error = %e, "Failed to persist session snapshot");
        }
        Ok(path)
    }

    /// Load a `.love` file and continue from it.
    ///
    /// On any error the current state is left untouched.
    pub fn import(&mut self, path: &Path) -> Result<()> {
        let snapshot = read_save_file(path)?;
        self.restore(snapshot);
        Ok(())
    }

    /// Replace the current state with a validated snapshot and show questions.
    pub fn restore(&mut self, snapshot: SessionSnapshot) {
        self.load_snapshot(snapshot);
        self.screen = Screen::Questions;
        self.persist();
        tracing::info!(position = self.position, "Restored session from snapshot");
    }

    // ============================================
    // Internals
    // ============================================

    fn load_snapshot(&mut self, snapshot: SessionSnapshot) {
        self.questions = snapshot.questions;
        self.answers = snapshot.answers;
        self.position = snapshot.current_question_index;
        self.scores = None;
    }

    fn require_questions(&self, action: &str) -> Result<()> {
        if self.screen != Screen::Questions {
            return Err(Error::InvalidState(format!(
                "cannot {} on {:?} screen",
                action, self.screen
            )));
        }
        Ok(())
    }

    fn persist(&self) {
        let snapshot = self.snapshot(AUTOSAVE_NAME, Utc::now());
        if let Err(e) = self.store.save(&snapshot) {
            tracing::warn!(error = %e, "Failed to persist session snapshot");
        }
    }

    fn clear_persisted(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Failed to clear session snapshot");
        }
    }
}
