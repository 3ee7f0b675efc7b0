//! Oracle entry points.

use crate::config::OracleConfig;
use crate::error::{OracleError, OracleResult, TraceSide};
use crate::matcher::{Matcher, Verdict};
use dumpling_core::Frame;
use dumpling_trace::decode_trace;
use tracing::{info, warn};

/// Differential oracle relating an optimized dump to a reference dump
#[derive(Debug, Clone, Default)]
pub struct DiffOracle {
    config: OracleConfig,
}

impl DiffOracle {
    /// Create an oracle with the default config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    #[must_use]
    pub fn with_config(mut self, config: OracleConfig) -> Self {
        self.config = config;
        self
    }

    /// Active config
    #[must_use]
    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    /// Decode both dumps and relate them.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Format`] if either dump is malformed. A
    /// mismatch is reported through the verdict, not as an error.
    pub fn relate(&self, optimized: &str, reference: &str) -> OracleResult<Verdict> {
        let optimized = decode_trace(optimized).map_err(|source| OracleError::Format {
            side: TraceSide::Optimized,
            source,
        })?;
        let reference = decode_trace(reference).map_err(|source| OracleError::Format {
            side: TraceSide::Reference,
            source,
        })?;

        Ok(self.relate_traces(&optimized, &reference))
    }

    /// Relate two already decoded traces
    #[must_use]
    pub fn relate_traces(&self, optimized: &[Frame], reference: &[Frame]) -> Verdict {
        let verdict = Matcher::from_config(&self.config).relate(optimized, reference);

        info!(
            optimized = optimized.len(),
            reference = reference.len(),
            consistent = verdict.is_consistent(),
            "related traces"
        );

        let logged = verdict.mismatch.as_ref().filter(|_| self.config.log_mismatches);
        if let Some(mismatch) = logged {
            warn!("trace mismatch\n{mismatch}");
        }

        verdict
    }
}

/// Relate an optimized dump to a reference dump with the default config.
///
/// # Errors
///
/// Returns [`OracleError::Format`] if either dump is malformed
pub fn relate(optimized: &str, reference: &str) -> OracleResult<bool> {
    Ok(DiffOracle::new().relate(optimized, reference)?.is_consistent())
}
