//! Frame snapshots and execution tiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value written by an optimizing tier for a slot it no longer tracks.
/// Matches any reference value at the same position.
pub const OPTIMIZED_OUT: &str = "<optimized_out>";

/// Filler for argument and register slots that were never written.
pub const MISSING: &str = "<missing>";

const RULE: &str = "══════════════════════════════════════";

/// Ordered frames decoded from one dump
pub type Trace = Vec<Frame>;

/// Execution tier that produced a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FrameType {
    /// Ignition bytecode interpreter (`---I`)
    Interpreter,
    /// Sparkplug baseline compiler (`---S`)
    Sparkplug,
    /// Maglev mid-tier compiler (`---M`)
    Maglev,
    /// Turbofan optimizing compiler (`---T`)
    Turbofan,
    /// Frame materialized by an actual Turbofan deopt (`---D`)
    DeoptTurbofan,
}

impl FrameType {
    /// All tiers, in header order
    pub const ALL: [FrameType; 5] = [
        FrameType::Interpreter,
        FrameType::Sparkplug,
        FrameType::Maglev,
        FrameType::Turbofan,
        FrameType::DeoptTurbofan,
    ];

    /// Parse a block header token. Only an exact token is accepted.
    #[must_use]
    pub fn from_header(token: &str) -> Option<Self> {
        match token {
            "---I" => Some(Self::Interpreter),
            "---S" => Some(Self::Sparkplug),
            "---M" => Some(Self::Maglev),
            "---T" => Some(Self::Turbofan),
            "---D" => Some(Self::DeoptTurbofan),
            _ => None,
        }
    }

    /// Header token that opens a block of this tier
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Interpreter => "---I",
            Self::Sparkplug => "---S",
            Self::Maglev => "---M",
            Self::Turbofan => "---T",
            Self::DeoptTurbofan => "---D",
        }
    }

    /// Display name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Interpreter => "interpreter",
            Self::Sparkplug => "sparkplug",
            Self::Maglev => "maglev",
            Self::Turbofan => "turbofan",
            Self::DeoptTurbofan => "deoptTurbofan",
        }
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One fully resolved stack-frame snapshot.
///
/// Values are kept as the raw strings the VM printed; no attempt is made to
/// interpret them. `-1` offsets and ids mean the dump never specified them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Bytecode offset within the function
    pub bytecode_offset: i64,
    /// JS function id
    pub function_id: i64,
    /// Accumulator register dump
    pub accumulator: String,
    /// Parameters, one per declared argument
    pub arguments: Vec<String>,
    /// Interpreter registers, one per declared register
    pub registers: Vec<String>,
    /// Tier that produced the frame
    pub frame_type: FrameType,
}

impl Frame {
    /// Create a frame with every field at its unspecified default
    #[must_use]
    pub fn new(frame_type: FrameType) -> Self {
        Self {
            bytecode_offset: -1,
            function_id: -1,
            accumulator: String::new(),
            arguments: Vec::new(),
            registers: Vec::new(),
            frame_type,
        }
    }

    /// Set the bytecode offset
    #[must_use]
    pub fn with_bytecode_offset(mut self, offset: i64) -> Self {
        self.bytecode_offset = offset;
        self
    }

    /// Set the function id
    #[must_use]
    pub fn with_function_id(mut self, id: i64) -> Self {
        self.function_id = id;
        self
    }

    /// Set the accumulator
    #[must_use]
    pub fn with_accumulator(mut self, value: impl Into<String>) -> Self {
        self.accumulator = value.into();
        self
    }

    /// Set the arguments
    #[must_use]
    pub fn with_arguments<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments = values.into_iter().map(Into::into).collect();
        self
    }

    /// Set the registers
    #[must_use]
    pub fn with_registers<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registers = values.into_iter().map(Into::into).collect();
        self
    }

    /// Program point of the frame: `(bytecode_offset, function_id)`
    #[must_use]
    pub fn location(&self) -> (i64, i64) {
        (self.bytecode_offset, self.function_id)
    }

    /// Whether any slot holds the optimized-out wildcard
    #[must_use]
    pub fn has_optimized_out(&self) -> bool {
        std::iter::once(&self.accumulator)
            .chain(&self.arguments)
            .chain(&self.registers)
            .any(|v| v == OPTIMIZED_OUT)
    }
}

fn write_slots(f: &mut fmt::Formatter<'_>, label: &str, values: &[String]) -> fmt::Result {
    if values.is_empty() {
        return writeln!(f, "║ {label}: []");
    }
    writeln!(f, "║ {label}:")?;
    for (index, value) in values.iter().enumerate() {
        writeln!(f, "║   [{index}] {value}")?;
    }
    Ok(())
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "╔{RULE}")?;
        writeln!(
            f,
            "║ Frame: {} (FuncID: {}, Offset: {})",
            self.frame_type, self.function_id, self.bytecode_offset
        )?;
        writeln!(f, "╠{RULE}")?;
        writeln!(f, "║ Accumulator: {}", self.accumulator)?;
        write_slots(f, "Arguments", &self.arguments)?;
        write_slots(f, "Registers", &self.registers)?;
        write!(f, "╚{RULE}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        for tier in FrameType::ALL {
            assert_eq!(FrameType::from_header(tier.header()), Some(tier));
        }
    }

    #[test]
    fn test_unknown_header() {
        assert_eq!(FrameType::from_header("---X"), None);
        assert_eq!(FrameType::from_header("---I "), None);
        assert_eq!(FrameType::from_header("--I"), None);
        assert_eq!(FrameType::from_header(""), None);
    }

    #[test]
    fn test_frame_type_names() {
        assert_eq!(FrameType::Maglev.to_string(), "maglev");
        assert_eq!(FrameType::DeoptTurbofan.to_string(), "deoptTurbofan");
    }

    #[test]
    fn test_frame_type_serialization() {
        let json = serde_json::to_string(&FrameType::DeoptTurbofan).unwrap();
        assert_eq!(json, "\"deoptTurbofan\"");
        let tier: FrameType = serde_json::from_str("\"sparkplug\"").unwrap();
        assert_eq!(tier, FrameType::Sparkplug);
    }

    #[test]
    fn test_frame_defaults() {
        let frame = Frame::new(FrameType::Interpreter);
        assert_eq!(frame.bytecode_offset, -1);
        assert_eq!(frame.function_id, -1);
        assert_eq!(frame.accumulator, "");
        assert!(frame.arguments.is_empty());
        assert!(frame.registers.is_empty());
    }

    #[test]
    fn test_frame_builder() {
        let frame = Frame::new(FrameType::Turbofan)
            .with_bytecode_offset(34)
            .with_function_id(500)
            .with_accumulator("40")
            .with_arguments(["1", "2"])
            .with_registers(["30"]);

        assert_eq!(frame.location(), (34, 500));
        assert_eq!(frame.arguments, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(frame.registers.len(), 1);
        assert!(!frame.has_optimized_out());
    }

    #[test]
    fn test_has_optimized_out() {
        let frame = Frame::new(FrameType::Maglev).with_registers(["a", OPTIMIZED_OUT]);
        assert!(frame.has_optimized_out());

        let frame = Frame::new(FrameType::Maglev).with_accumulator(OPTIMIZED_OUT);
        assert!(frame.has_optimized_out());
    }

    #[test]
    fn test_frame_display() {
        let frame = Frame::new(FrameType::Interpreter)
            .with_bytecode_offset(10)
            .with_function_id(1)
            .with_accumulator("100")
            .with_arguments(["a"]);

        let dump = frame.to_string();
        let lines: Vec<&str> = dump.lines().collect();
        assert!(lines[0].starts_with('╔'));
        assert_eq!(lines[1], "║ Frame: interpreter (FuncID: 1, Offset: 10)");
        assert_eq!(lines[3], "║ Accumulator: 100");
        assert_eq!(lines[4], "║ Arguments:");
        assert_eq!(lines[5], "║   [0] a");
        assert_eq!(lines[6], "║ Registers: []");
        assert!(lines[7].starts_with('╚'));
    }

    #[test]
    fn test_frame_serialization() {
        let frame = Frame::new(FrameType::Sparkplug)
            .with_bytecode_offset(3)
            .with_registers(["", MISSING]);
        let json = serde_json::to_string(&frame).unwrap();
        let back: Frame = serde_json::from_str(&json).unwrap();
        assert_eq!(frame, back);
    }
}
