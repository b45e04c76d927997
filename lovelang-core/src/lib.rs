//! # lovelang-core
//!
//! Core library for lovelang - a love-language self-assessment.
//!
//! This library provides:
//! - Domain types for questions, answers and categories
//! - The scoring engine and partner-compatibility resolver
//! - The session state machine with resumable snapshots
//! - Session storage in SQLite
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through three layers:
//! - **Reference data:** The question bank and conclusions documents (read-only)
//! - **Session:** Answers recorded by [`SessionController`], persisted after every change
//! - **Derived:** [`Scores`] and the [`ProfileReport`], recomputed from answers on demand
//!
//! ## Example
//!
//! ```rust,no_run
//! use lovelang_core::{Config, SessionController, SqliteSessionStore};
//! use chrono::Utc;
//!
//! // Load configuration and reference data
//! let config = Config::load().expect("failed to load config");
//! let bank = config.data.question_bank().expect("failed to load questions");
//!
//! // Open the session store and resume where the respondent left off
//! let store = SqliteSessionStore::open(&Config::database_path()).expect("failed to open store");
//! let mut session = SessionController::new(&bank, store);
//! session.resume(Utc::now(), config.quiz.resume_window());
//! ```

// Re-export commonly used items at the crate root
pub use bank::QuestionBank;
pub use compat::{classify, CompatibilityResult, MatchType, Pairing};
pub use conclusions::Conclusions;
pub use config::Config;
pub use error::{Error, Result};
pub use report::{PartnerLanguages, ProfileReport, ReportSettings};
pub use scoring::{compute_scores, Intensity, Scores};
pub use session::{Advance, ResumeOutcome, Screen, SessionController, SessionSnapshot};
pub use store::{MemorySessionStore, SessionRepository, SqliteSessionStore};
pub use types::*;

// Public modules
pub mod bank;
pub mod compat;
pub mod conclusions;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod report;
pub mod scoring;
pub mod session;
pub mod store;
pub mod types;
