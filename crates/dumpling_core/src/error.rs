//! Format errors for frame dumps.

/// Result type for decoding a frame dump
pub type TraceResult<T> = Result<T, FormatError>;

/// A dump that does not follow the frame grammar.
///
/// Every variant carries the 1-based line number of the offending line in
/// the input text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// Block does not start with one of the five header tokens
    #[error("line {line}: unknown frame header {token:?}")]
    UnknownHeader {
        /// Line number
        line: usize,
        /// The line found where a header was expected
        token: String,
    },

    /// Field value is not an integer
    #[error("line {line}: field {field:?} has non-integer value {value:?}")]
    InvalidInteger {
        /// Line number
        line: usize,
        /// Field prefix, e.g. `b:`
        field: &'static str,
        /// Raw value text
        value: String,
    },

    /// Argument or register count below zero
    #[error("line {line}: field {field:?} has negative count {value}")]
    NegativeCount {
        /// Line number
        line: usize,
        /// Field prefix, `n:` or `m:`
        field: &'static str,
        /// Parsed value
        value: i64,
    },

    /// Count or slot index larger than any real frame could hold
    #[error("line {line}: slot count {value} exceeds limit {limit}")]
    SlotLimitExceeded {
        /// Line number
        line: usize,
        /// Requested count or index
        value: u64,
        /// Largest accepted value
        limit: usize,
    },

    /// Frames of one dump expose more slots in total than the decoder allows
    #[error("line {line}: trace exposes {total} slots, exceeding limit {limit}")]
    TraceSlotLimitExceeded {
        /// Header line of the frame that crossed the limit
        line: usize,
        /// Slots exposed up to and including that frame
        total: u64,
        /// Largest accepted total
        limit: usize,
    },

    /// `a<i>:`/`r<i>:` line without a separator or with a bad index
    #[error("line {line}: malformed indexed value {content:?}")]
    MalformedIndexedLine {
        /// Line number
        line: usize,
        /// Full line text
        content: String,
    },

    /// Line left over after the fields and indexed values of a block
    #[error("line {line}: unexpected line {content:?}")]
    UnexpectedLine {
        /// Line number
        line: usize,
        /// Full line text
        content: String,
    },
}

impl FormatError {
    /// Line number the error points at
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::UnknownHeader { line, .. }
            | Self::InvalidInteger { line, .. }
            | Self::NegativeCount { line, .. }
            | Self::SlotLimitExceeded { line, .. }
            | Self::TraceSlotLimitExceeded { line, .. }
            | Self::MalformedIndexedLine { line, .. }
            | Self::UnexpectedLine { line, .. } => *line,
        }
    }
}
