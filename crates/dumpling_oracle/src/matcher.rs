//! Greedy subsequence matching of optimized frames against reference frames.

use crate::config::OracleConfig;
use crate::report::Mismatch;
use dumpling_core::{Frame, OPTIMIZED_OUT};
use serde::Serialize;
use tracing::debug;

/// Whether an optimized-side value is consistent with a reference value
#[must_use]
pub fn value_matches(optimized: &str, reference: &str) -> bool {
    optimized == OPTIMIZED_OUT || optimized == reference
}

fn slots_match(optimized: &[String], reference: &[String]) -> bool {
    optimized
        .iter()
        .zip(reference)
        .all(|(o, r)| value_matches(o, r))
}

/// Outcome of relating two traces
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// Reference index matched by each optimized frame, up to the first failure
    pub matched: Vec<usize>,
    /// First optimized frame without a match
    pub mismatch: Option<Mismatch>,
}

impl Verdict {
    /// Whether every optimized frame found a match
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.mismatch.is_none()
    }

    /// Index of the first optimized frame that found no match
    #[must_use]
    pub fn divergence_point(&self) -> Option<usize> {
        self.mismatch.as_ref().map(|m| m.optimized_index)
    }
}

/// Frame matcher
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Matcher {
    compare_frame_type: bool,
}

impl Matcher {
    /// Create a matcher that ignores frame types
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a matcher from oracle config
    #[must_use]
    pub fn from_config(config: &OracleConfig) -> Self {
        Self {
            compare_frame_type: config.compare_frame_type,
        }
    }

    /// Also require equal frame types
    #[must_use]
    pub fn with_frame_type(mut self, compare: bool) -> Self {
        self.compare_frame_type = compare;
        self
    }

    /// Whether `optimized` is consistent with `reference`.
    ///
    /// Offsets, function ids and slot counts must be equal; the accumulator
    /// and every slot must satisfy [`value_matches`].
    #[must_use]
    pub fn matches(&self, optimized: &Frame, reference: &Frame) -> bool {
        if optimized.bytecode_offset != reference.bytecode_offset
            || optimized.function_id != reference.function_id
            || optimized.arguments.len() != reference.arguments.len()
            || optimized.registers.len() != reference.registers.len()
        {
            return false;
        }

        if self.compare_frame_type && optimized.frame_type != reference.frame_type {
            return false;
        }

        value_matches(&optimized.accumulator, &reference.accumulator)
            && slots_match(&optimized.arguments, &reference.arguments)
            && slots_match(&optimized.registers, &reference.registers)
    }

    /// Match every optimized frame, in order, against the reference trace.
    ///
    /// The scan for each frame starts at the reference frame matched by the
    /// previous one, inclusive: several optimized frames may land on the same
    /// reference frame, but the scan never moves backwards.
    #[must_use]
    pub fn relate(&self, optimized: &[Frame], reference: &[Frame]) -> Verdict {
        let mut cursor = 0;
        let mut matched = Vec::with_capacity(optimized.len());

        for (index, frame) in optimized.iter().enumerate() {
            let found = reference[cursor..]
                .iter()
                .position(|candidate| self.matches(frame, candidate));

            let Some(skipped) = found else {
                debug!(index, cursor, "no matching reference frame");
                return Verdict {
                    matched,
                    mismatch: Some(Mismatch::collect(index, cursor, frame, reference)),
                };
            };

            cursor += skipped;
            debug!(index, reference = cursor, skipped, "matched frame");
            matched.push(cursor);
        }

        Verdict {
            matched,
            mismatch: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dumpling_core::FrameType;

    fn at(offset: i64) -> Frame {
        Frame::new(FrameType::Interpreter)
            .with_bytecode_offset(offset)
            .with_function_id(1)
    }

    #[test]
    fn test_value_matches() {
        assert!(value_matches("1", "1"));
        assert!(value_matches(OPTIMIZED_OUT, "anything"));
        assert!(value_matches(OPTIMIZED_OUT, ""));
        assert!(!value_matches("1", "2"));
        // The wildcard only works on the optimized side.
        assert!(!value_matches("1", OPTIMIZED_OUT));
    }

    #[test]
    fn test_matches_identical() {
        let frame = at(10).with_accumulator("x").with_arguments(["a"]).with_registers(["r"]);
        assert!(Matcher::new().matches(&frame, &frame));
    }

    #[test]
    fn test_matches_requires_location() {
        let matcher = Matcher::new();
        assert!(!matcher.matches(&at(10), &at(11)));
        assert!(!matcher.matches(&at(10), &at(10).with_function_id(2)));
    }

    #[test]
    fn test_matches_requires_counts() {
        let matcher = Matcher::new();
        let reference = at(10).with_arguments(["a", "b"]);

        // A wildcard cannot stand in for a missing slot.
        let optimized = at(10).with_arguments([OPTIMIZED_OUT]);
        assert!(!matcher.matches(&optimized, &reference));

        let optimized = at(10).with_arguments(["a", "b"]).with_registers([OPTIMIZED_OUT]);
        assert!(!matcher.matches(&optimized, &reference));
    }

    #[test]
    fn test_matches_wildcards() {
        let matcher = Matcher::new();
        let reference = at(10)
            .with_accumulator("SecretValue")
            .with_arguments(["RealVal", "OtherVal"])
            .with_registers(["r0"]);
        let optimized = at(10)
            .with_accumulator(OPTIMIZED_OUT)
            .with_arguments([OPTIMIZED_OUT, "OtherVal"])
            .with_registers([OPTIMIZED_OUT]);

        assert!(matcher.matches(&optimized, &reference));

        let optimized = optimized.with_arguments([OPTIMIZED_OUT, "Different"]);
        assert!(!matcher.matches(&optimized, &reference));
    }

    #[test]
    fn test_matches_frame_type() {
        let interpreter = at(10);
        let mut turbofan = at(10);
        turbofan.frame_type = FrameType::Turbofan;

        assert!(Matcher::new().matches(&turbofan, &interpreter));
        assert!(!Matcher::new().with_frame_type(true).matches(&turbofan, &interpreter));

        let config = OracleConfig {
            compare_frame_type: true,
            ..OracleConfig::default()
        };
        assert!(!Matcher::from_config(&config).matches(&turbofan, &interpreter));
    }

    #[test]
    fn test_relate_skips_reference_frames() {
        let reference = vec![at(10), at(20), at(30), at(40)];
        let verdict = Matcher::new().relate(&[at(10), at(40)], &reference);

        assert!(verdict.is_consistent());
        assert_eq!(verdict.matched, vec![0, 3]);
        assert_eq!(verdict.divergence_point(), None);
    }

    #[test]
    fn test_relate_order_matters() {
        let reference = vec![at(10), at(40)];
        let verdict = Matcher::new().relate(&[at(40), at(10)], &reference);

        assert!(!verdict.is_consistent());
        assert_eq!(verdict.matched, vec![1]);
        assert_eq!(verdict.divergence_point(), Some(1));

        let mismatch = verdict.mismatch.unwrap();
        assert_eq!(mismatch.cursor, 1);
        assert_eq!(mismatch.candidates.len(), 1);
        assert_eq!(mismatch.candidates[0].reference_index, 0);
    }

    #[test]
    fn test_relate_reuses_matched_frame() {
        // Two deopts at the same offset both land on one reference frame.
        let reference = vec![at(10), at(20)];
        let verdict = Matcher::new().relate(&[at(20), at(20), at(20)], &reference);

        assert!(verdict.is_consistent());
        assert_eq!(verdict.matched, vec![1, 1, 1]);
    }

    #[test]
    fn test_relate_picks_first_match() {
        let reference = vec![
            at(10).with_accumulator("a"),
            at(10).with_accumulator("b"),
            at(20),
        ];
        let optimized = vec![at(10).with_accumulator(OPTIMIZED_OUT), at(10).with_accumulator("b")];
        let verdict = Matcher::new().relate(&optimized, &reference);

        assert_eq!(verdict.matched, vec![0, 1]);
    }

    #[test]
    fn test_relate_no_backtracking() {
        // The greedy choice of reference #0 is final even though #1 also fits.
        let reference = vec![
            at(10).with_accumulator("a"),
            at(10).with_accumulator("b"),
        ];
        let optimized = vec![
            at(10).with_accumulator(OPTIMIZED_OUT),
            at(10).with_accumulator("b"),
            at(10).with_accumulator("a"),
        ];
        let verdict = Matcher::new().relate(&optimized, &reference);

        assert!(!verdict.is_consistent());
        assert_eq!(verdict.divergence_point(), Some(2));
    }

    #[test]
    fn test_relate_empty_traces() {
        let matcher = Matcher::new();
        assert!(matcher.relate(&[], &[]).is_consistent());
        assert!(matcher.relate(&[], &[at(10)]).is_consistent());

        let verdict = matcher.relate(&[at(10)], &[]);
        assert_eq!(verdict.divergence_point(), Some(0));
    }
}
