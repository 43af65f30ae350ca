use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex character {found:?} at offset {offset}")]
    InvalidHex { offset: usize, found: char },

    #[error("invalid identifier length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("display filename must not be empty")]
    EmptyFilename,
}
