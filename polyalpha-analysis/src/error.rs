//! Error types for the cryptanalysis pipeline

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Text of length {length} is too short for an index of coincidence (needs at least 2 characters)")]
    EmptyText { length: usize },

    #[error("No key length below {max_tested} produced a natural index of coincidence")]
    KeyLengthNotFound { max_tested: usize },

    #[error("Letter '{0}' is not part of the frequency table")]
    UnknownLetter(char),

    #[error("Operator input rejected: {0}")]
    OperatorInputRejected(String),

    #[error("Rank assignment has {found} letters, expected {expected}")]
    InvalidAssignment { expected: usize, found: usize },

    #[error("Key length {key_length} is outside 1..{alphabet_size}")]
    InvalidKeyLength { key_length: usize, alphabet_size: usize },

    #[error("Tolerance {0} must be a finite, non-negative number")]
    InvalidTolerance(f64),

    #[error("Invalid language definition: {0}")]
    InvalidLanguage(String),

    #[error("Pipeline step requires stage {expected}, but the analysis is at {found}")]
    InvalidStage {
        expected: &'static str,
        found: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
