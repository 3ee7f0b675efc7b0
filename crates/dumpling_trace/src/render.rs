//! Writing frames back out as a fully explicit dump.

use dumpling_core::Frame;
use std::fmt;

/// Display adapter that writes every field and slot of every frame, so no
/// block depends on the one before it.
#[derive(Debug, Clone, Copy)]
pub struct FullText<'a>(pub &'a [Frame]);

impl fmt::Display for FullText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in self.0 {
            writeln!(f, "{}", frame.frame_type.header())?;
            writeln!(f, "b:{}", frame.bytecode_offset)?;
            writeln!(f, "f:{}", frame.function_id)?;
            writeln!(f, "x:{}", frame.accumulator)?;
            writeln!(f, "n:{}", frame.arguments.len())?;
            writeln!(f, "m:{}", frame.registers.len())?;
            for (index, value) in frame.arguments.iter().enumerate() {
                writeln!(f, "a{index}:{value}")?;
            }
            for (index, value) in frame.registers.iter().enumerate() {
                writeln!(f, "r{index}:{value}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Render frames as a fully explicit dump
#[must_use]
pub fn render_full(frames: &[Frame]) -> String {
    FullText(frames).to_string()
}
