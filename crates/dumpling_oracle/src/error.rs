//! Oracle error types.

use dumpling_core::FormatError;
use std::fmt;

/// Result type for oracle operations
pub type OracleResult<T> = Result<T, OracleError>;

/// Which of the two dumps an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceSide {
    /// Dump from the optimizing tiers
    Optimized,
    /// Dump from the interpreter/baseline tiers
    Reference,
}

impl fmt::Display for TraceSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Optimized => write!(f, "optimized"),
            Self::Reference => write!(f, "reference"),
        }
    }
}

/// Oracle error.
///
/// A mismatch between the dumps is not an error; it is a `false` verdict.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// One of the dumps does not follow the frame grammar
    #[error("malformed {side} trace")]
    Format {
        /// Dump that failed to decode
        side: TraceSide,
        /// Decoder error
        #[source]
        source: FormatError,
    },

    /// Configuration payload could not be read
    #[error("invalid oracle config")]
    Config(#[from] serde_json::Error),
}

impl OracleError {
    /// Decoder error, if this is a format error
    #[must_use]
    pub fn format_error(&self) -> Option<&FormatError> {
        match self {
            Self::Format { source, .. } => Some(source),
            Self::Config(_) => None,
        }
    }
}
