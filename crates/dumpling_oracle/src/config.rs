//! Oracle configuration.

use crate::error::OracleResult;
use serde::{Deserialize, Serialize};

/// Oracle configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Also require both frames to come from the same tier.
    ///
    /// Off by default: an optimized frame legitimately matches an
    /// interpreter or Sparkplug frame at the same program point.
    pub compare_frame_type: bool,
    /// Emit the mismatch report through `tracing` at warn level
    pub log_mismatches: bool,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            compare_frame_type: false,
            log_mismatches: true,
        }
    }
}

impl OracleConfig {
    /// Parse a JSON config. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the payload is not valid JSON for this struct
    pub fn from_json(json: &str) -> OracleResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
