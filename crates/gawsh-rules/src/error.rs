//! Error types for rule generation.

use gawsh_types::TypeError;

/// Why a listing line could not be decoded.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MalformedReason {
    #[error("line is {actual} bytes, need at least {minimum}")]
    TooShort { minimum: usize, actual: usize },

    #[error("expected a single space after the identifier, found {found:?}")]
    MissingSeparator { found: char },

    #[error("identifier is not valid: {0}")]
    BadIdentifier(#[from] TypeError),

    #[error("filename is empty")]
    EmptyFilename,

    #[error("line is not valid UTF-8")]
    NotUtf8,
}

/// Errors that abort a generation pass.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// An input line violates the listing protocol.
    #[error("malformed record on line {line}: {reason} (line: {content:?})")]
    MalformedRecord {
        line: usize,
        content: String,
        reason: MalformedReason,
    },

    /// A filename cannot be embedded in rule syntax.
    #[error("unsafe filename {name:?} on line {line}: {reason}")]
    UnsafeFilename {
        line: usize,
        name: String,
        reason: String,
    },

    /// A filename or composed rule is over its configured size.
    #[error("{what} on line {line} is {actual} bytes, limit is {limit}")]
    CapacityExceeded {
        line: usize,
        what: &'static str,
        limit: usize,
        actual: usize,
    },

    /// The generation configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error reading the listing or writing the rule file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RuleError {
    /// Attach the 1-based listing line number to an input error.
    ///
    /// The synthesizer works on records and leaves the line at 0; the
    /// driver stamps it before surfacing the error.
    pub fn at_line(mut self, n: usize) -> Self {
        match &mut self {
            RuleError::MalformedRecord { line, .. }
            | RuleError::UnsafeFilename { line, .. }
            | RuleError::CapacityExceeded { line, .. } => *line = n,
            RuleError::Config(_) | RuleError::Io(_) => {}
        }
        self
    }

    /// Whether this error came from the content of the listing, as opposed
    /// to configuration or I/O.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            RuleError::MalformedRecord { .. }
                | RuleError::UnsafeFilename { .. }
                | RuleError::CapacityExceeded { .. }
        )
    }
}

/// Convenience alias for rule generation results.
pub type RuleResult<T> = Result<T, RuleError>;
