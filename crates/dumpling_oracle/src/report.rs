//! Diagnostic report for a frame that found no match.

use dumpling_core::Frame;
use serde::Serialize;
use std::fmt;

/// Reference frame at the same program point as the failing frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Position in the reference trace
    pub reference_index: usize,
    /// The reference frame
    pub frame: Frame,
}

/// Optimized frame with no match in the remaining reference trace.
///
/// Built only for display; it plays no part in the verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    /// Position of the failing frame in the optimized trace
    pub optimized_index: usize,
    /// Reference position the scan started from
    pub cursor: usize,
    /// The failing optimized frame
    pub frame: Frame,
    /// Every reference frame sharing the failing frame's offset and function id
    pub candidates: Vec<Candidate>,
}

impl Mismatch {
    /// Gather candidates for a failing frame from the whole reference trace
    #[must_use]
    pub fn collect(optimized_index: usize, cursor: usize, frame: &Frame, reference: &[Frame]) -> Self {
        let candidates = reference
            .iter()
            .enumerate()
            .filter(|(_, r)| r.location() == frame.location())
            .map(|(reference_index, r)| Candidate {
                reference_index,
                frame: r.clone(),
            })
            .collect();

        Self {
            optimized_index,
            cursor,
            frame: frame.clone(),
            candidates,
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "optimized frame #{} has no match at or after reference frame #{}",
            self.optimized_index, self.cursor
        )?;
        writeln!(f, "{}", self.frame)?;
        writeln!(f, "--------------------------")?;
        writeln!(f, "[")?;
        for candidate in &self.candidates {
            writeln!(f, "reference frame #{}", candidate.reference_index)?;
            writeln!(f, "{}", candidate.frame)?;
        }
        write!(f, "]")
    }
}
