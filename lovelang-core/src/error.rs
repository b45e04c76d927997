//! Error types for lovelang-core

use thiserror::Error;

/// Main error type for the lovelang-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Question bank failed validation
    #[error("invalid question bank: {0}")]
    QuestionBank(String),

    /// Conclusions document failed validation
    #[error("invalid conclusions document: {0}")]
    Conclusions(String),

    /// Answer set does not fit the question list
    #[error("invalid answer: {0}")]
    InvalidAnswer(String),

    /// Operation not allowed in the current session state
    #[error("invalid session state: {0}")]
    InvalidState(String),

    /// Save file rejected on import or export
    #[error("invalid save file: {0}")]
    InvalidSaveFile(String),

    /// Session repository failure
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type alias for lovelang-core
pub type Result<T> = std::result::Result<T, Error>;
