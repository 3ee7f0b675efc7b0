//! Splitting a dump into frame blocks.

use dumpling_core::{FormatError, FrameType, TraceResult};

/// A single line of input with its 1-based line number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Line number in the dump
    pub number: usize,
    /// Line text without the terminator
    pub text: &'a str,
}

/// Consecutive non-blank lines opened by a header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    /// Tier named by the header line
    pub frame_type: FrameType,
    /// Line number of the header
    pub header_line: usize,
    /// Lines after the header
    pub body: Vec<Line<'a>>,
}

/// Split a dump into blocks.
///
/// Blank lines separate blocks; runs of them, and blank lines at either end,
/// never produce an empty block. Both `\n` and `\r\n` terminators are
/// accepted.
///
/// # Errors
///
/// Returns [`FormatError::UnknownHeader`] if a block does not open with one
/// of the five header tokens.
pub fn segment(dump: &str) -> TraceResult<Vec<Block<'_>>> {
    let mut blocks = Vec::new();
    let mut current: Option<Block<'_>> = None;

    for (index, text) in dump.lines().enumerate() {
        let number = index + 1;

        if text.is_empty() {
            blocks.extend(current.take());
            continue;
        }

        match current.as_mut() {
            Some(block) => block.body.push(Line { number, text }),
            None => {
                let frame_type =
                    FrameType::from_header(text).ok_or_else(|| FormatError::UnknownHeader {
                        line: number,
                        token: text.to_string(),
                    })?;
                current = Some(Block {
                    frame_type,
                    header_line: number,
                    body: Vec::new(),
                });
            }
        }
    }

    blocks.extend(current);
    Ok(blocks)
}
