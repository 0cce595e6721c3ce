//! Error taxonomy for the assessment core.
//!
//! Four failure classes cross the module boundaries: question loading,
//! question data integrity, submission transport, and report resolution.
//! Transport-level detail stays in `anyhow` at the `api` seam; by the time
//! an error reaches a session it has been classified into one of these.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Question fetch or validation failed. Blocks entry into an active
    /// traversal; recoverable by reloading.
    #[error("failed to load questions: {0}")]
    Load(String),

    /// A question option has no corresponding value tag. Never papered over
    /// with a fabricated letter — the answer is refused.
    #[error("question {question_id} has no value tag for option {option}")]
    Integrity { question_id: u32, option: usize },

    /// Caller passed an option index the current question does not have.
    #[error("option {index} out of range for question {question_id}")]
    OptionOutOfRange { question_id: u32, index: usize },

    /// Submission transport or validation failure. The traversal rolls back
    /// to its last question with the ledger intact, so retry is free.
    #[error("submission failed: {0}")]
    Submission(String),

    /// A report identity did not resolve. Fatal for that navigation.
    #[error("report {0} not found")]
    NotFound(String),
}

impl CoreError {
    /// Whether retrying the same operation can succeed without any state
    /// change on our side.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::Load(_) | CoreError::Submission(_))
    }
}
