//! Participant quiz flow
//!
//! Sign-in, location, one screen per question, results. The session machine in
//! [`session`] is synchronous and owns no I/O; [`crate::state`] wraps it with
//! locking, countdown lifetimes and broadcasting.

mod catalog;
pub mod drawing;
pub mod score;
mod session;

use crate::types::Screen;
use std::path::PathBuf;
use std::time::Duration;

pub use catalog::{CatalogError, QuestionCatalog};
pub use session::{
    is_valid_email, Advance, AnswerDraft, Identity, QuizSession, SessionView, CODE_LENGTH,
};

/// Errors from quiz flow operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuizError {
    #[error("Session not found")]
    SessionNotFound,

    #[error("Action not available on the {0:?} screen")]
    WrongScreen(Screen),

    #[error("Enter a valid email and all 5 code digits to continue")]
    SignInIncomplete,

    #[error("Code position {0} is out of range")]
    CodeIndexOutOfRange(usize),

    #[error("Each code position takes a single digit")]
    InvalidCodeDigit,

    #[error("There is no question to answer")]
    NoCurrentQuestion,

    #[error("The current question is {actual}, not {expected}")]
    WrongQuestionKind {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("'{0}' is not one of the options")]
    UnknownOption(String),

    #[error("Drawing must be a base64 image data URI")]
    InvalidDrawing,

    #[error("Answer the question before continuing")]
    AnswerMissing,
}

impl QuizError {
    /// Stable code for the wire protocol
    pub fn code(&self) -> &'static str {
        match self {
            QuizError::SessionNotFound => "SESSION_NOT_FOUND",
            QuizError::WrongScreen(_) => "WRONG_SCREEN",
            QuizError::SignInIncomplete => "SIGN_IN_INCOMPLETE",
            QuizError::CodeIndexOutOfRange(_) => "CODE_INDEX_OUT_OF_RANGE",
            QuizError::InvalidCodeDigit => "INVALID_CODE_DIGIT",
            QuizError::NoCurrentQuestion => "NO_CURRENT_QUESTION",
            QuizError::WrongQuestionKind { .. } => "WRONG_QUESTION_KIND",
            QuizError::UnknownOption(_) => "UNKNOWN_OPTION",
            QuizError::InvalidDrawing => "INVALID_DRAWING",
            QuizError::AnswerMissing => "ANSWER_MISSING",
        }
    }
}

/// Quiz configuration
#[derive(Debug, Clone)]
pub struct QuizConfig {
    /// Countdown start value for every session
    pub countdown_seconds: u32,
    /// Countdown tick period
    pub tick: Duration,
    /// Optional JSON catalog replacing the built-in questions
    pub catalog_path: Option<PathBuf>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            countdown_seconds: 600,
            tick: Duration::from_secs(1),
            catalog_path: None,
        }
    }
}

impl QuizConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let countdown_seconds = std::env::var("QUIZ_COUNTDOWN_SECONDS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(600);

        let catalog_path = std::env::var("QUIZ_CATALOG")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Self {
            countdown_seconds,
            tick: Duration::from_secs(1),
            catalog_path,
        }
    }

    /// Load the configured catalog, or the built-in one
    pub fn load_catalog(&self) -> Result<QuestionCatalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => QuestionCatalog::load_from_file(path),
            None => Ok(QuestionCatalog::seed()),
        }
    }
}
